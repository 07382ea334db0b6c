//! Bundlekit - bundle resolution and @mention context loading
//!
//! Command line front end over the `bundlekit` library: registers bundle
//! sources, loads and composes bundles, expands @mentions and manages the
//! source cache.

use std::future::Future;

use clap::Parser;

mod cli;
mod commands;

use bundlekit::Settings;
use bundlekit::error::{BundlekitError, Result};
use bundlekit::logging::{LogFormat, LoggingOptions, init_logging};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let options = LoggingOptions {
        verbose: cli.verbose,
        format: cli.log_format.parse().unwrap_or(LogFormat::Text),
        color: console::Term::stderr().features().colors_supported(),
    };
    if let Err(e) = init_logging(options) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.home)?;
    tracing::debug!(
        home = %settings.home.display(),
        cache = %settings.cache_dir.display(),
        "resolved settings"
    );

    match &cli.command {
        Commands::Register(args) => commands::register::run_register(&settings, args),
        Commands::Unregister(args) => commands::register::run_unregister(&settings, args),
        Commands::List(args) => commands::list::run(&settings, args),
        Commands::Load(args) => block_on(commands::load::run(&settings, args)),
        Commands::Mentions(args) => block_on(commands::mentions::run(&settings, args)),
        Commands::Cache(args) => commands::cache::run(&settings, args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| BundlekitError::IoError {
            message: format!("Failed to start async runtime: {e}"),
        })?;
    runtime.block_on(future)
}
