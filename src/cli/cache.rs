use clap::{Parser, Subcommand};

/// Arguments for cache command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show cache statistics:\n    bundlekit cache\n\n\
                  List cached sources:\n    bundlekit cache list\n\n\
                  Clear all cached sources:\n    bundlekit cache clear\n\n\
                  Remove one entry:\n    bundlekit cache clear --only org-repo-0123456789ab")]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: Option<CacheSubcommand>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached sources
    List,

    /// Clear cached sources
    Clear(ClearCacheArgs),
}

/// Arguments for cache clear command
#[derive(Parser, Debug)]
pub struct ClearCacheArgs {
    /// Remove only one entry, by directory name as shown by 'cache list'
    #[arg(long)]
    pub only: Option<String>,
}
