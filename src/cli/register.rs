use clap::Parser;

/// Arguments for the register command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Register a git bundle:\n    bundlekit register base git+https://github.com/org/base@main\n\n\
                  Register a sub-bundle of a repository:\n    bundlekit register recipes 'git+https://github.com/org/base@main#subdirectory=behaviors/recipes'\n\n\
                  Register a local bundle:\n    bundlekit register mine ./bundles/mine")]
pub struct RegisterArgs {
    /// Bundle name
    pub name: String,

    /// Source URI (path, file://, git+https://, ...)
    pub source: String,
}

/// Arguments for the unregister command
#[derive(Parser, Debug)]
pub struct UnregisterArgs {
    /// Bundle name
    pub name: String,
}
