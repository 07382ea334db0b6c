//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - register / unregister: Registry edits
//! - list: List command arguments
//! - load: Load command arguments
//! - mentions: Mentions command arguments
//! - cache: Cache command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod completions;
pub mod list;
pub mod load;
pub mod mentions;
pub mod register;

pub use cache::{CacheArgs, CacheSubcommand, ClearCacheArgs};
pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use load::LoadArgs;
pub use mentions::MentionsArgs;
pub use register::{RegisterArgs, UnregisterArgs};

/// Bundlekit - bundle resolution and @mention context loading
#[derive(Parser, Debug)]
#[command(
    name = "bundlekit",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Resolve, cache and compose agent bundles",
    long_about = "Bundlekit resolves bundles from local paths and git repositories, composes them \
                  with the bundles they include, and expands @mentions in text into attributed \
                  context blocks.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  bundlekit register base git+https://github.com/org/base@main  \x1b[90m# Register a bundle\x1b[0m\n   \
                  bundlekit load base                                          \x1b[90m# Load and compose it\x1b[0m\n   \
                  bundlekit load ./my-bundle --json                            \x1b[90m# Load a local bundle as JSON\x1b[0m\n   \
                  bundlekit mentions \"Follow @AGENTS.md\"                       \x1b[90m# Expand mentions\x1b[0m\n   \
                  bundlekit cache list                                         \x1b[90m# Show cached sources\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// State directory holding the registry and cache (defaults to ~/.bundlekit)
    #[arg(long, global = true, env = "BUNDLEKIT_HOME")]
    pub home: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log line format (text or json)
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a bundle name for a source
    Register(RegisterArgs),

    /// Remove a bundle from the registry
    Unregister(UnregisterArgs),

    /// List registered bundles
    List(ListArgs),

    /// Load a bundle with its includes and print the composed result
    Load(LoadArgs),

    /// Expand @mentions in text into a context block
    Mentions(MentionsArgs),

    /// Inspect or clear the source cache
    #[command(name = "cache")]
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
