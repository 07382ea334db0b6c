use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List registered bundles:\n    bundlekit list\n\n\
                  Show include relationships:\n    bundlekit list --detailed")]
pub struct ListArgs {
    /// Show versions, local paths and include relationships
    #[arg(long)]
    pub detailed: bool,
}
