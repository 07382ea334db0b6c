use clap::Parser;

/// Arguments for the mentions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Expand mentions in a prompt:\n    bundlekit mentions 'Follow @AGENTS.md and @docs/style'\n\n\
                  Read the text from stdin:\n    cat prompt.md | bundlekit mentions -\n\n\
                  Resolve @base:... against a registered bundle:\n    bundlekit mentions '@base:context/guide' --bundle base")]
pub struct MentionsArgs {
    /// Text to scan; '-' or nothing reads stdin
    pub text: Option<String>,

    /// Registered bundle to expose as an @name: namespace (repeatable)
    #[arg(long = "bundle", value_name = "NAME")]
    pub bundles: Vec<String>,

    /// How many levels of nested mentions to follow
    #[arg(long, default_value_t = 3)]
    pub max_depth: usize,

    /// Print the per-mention results as JSON instead of the context block
    #[arg(long)]
    pub json: bool,
}
