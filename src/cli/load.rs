use clap::Parser;

/// Arguments for the load command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Load a registered bundle:\n    bundlekit load base\n\n\
                  Load a local bundle as JSON:\n    bundlekit load ./bundles/mine --json\n\n\
                  Load without includes:\n    bundlekit load base --single")]
pub struct LoadArgs {
    /// Registered bundle name or source URI
    pub target: String,

    /// Print JSON instead of YAML
    #[arg(long)]
    pub json: bool,

    /// Load only this bundle, not its includes
    #[arg(long)]
    pub single: bool,
}
