//! Mentions command

use std::io::Read;

use console::style;

use bundlekit::error::{BundlekitError, Result};
use bundlekit::mentions::mention_paths;
use bundlekit::{
    BaseMentionResolver, BundleRegistry, ContentDeduplicator, LoadOptions, Settings,
    format_context_block, load_mentions,
};

use crate::cli::MentionsArgs;

/// Expand mentions in the given text (or stdin) and print the context block
pub async fn run(settings: &Settings, args: &MentionsArgs) -> Result<()> {
    let text = match args.text.as_deref() {
        Some(text) if text != "-" => text.to_string(),
        _ => read_stdin()?,
    };
    let cwd = std::env::current_dir()?;

    let mut resolver = BaseMentionResolver::new().with_working_dir(&cwd);
    if !args.bundles.is_empty() {
        let mut registry = BundleRegistry::from_settings(settings)?;
        for name in &args.bundles {
            let bundle = registry.load(name).await?;
            resolver.register_bundle(name.clone(), bundle);
        }
    }

    let mut deduplicator = ContentDeduplicator::new();
    let options = LoadOptions {
        max_depth: args.max_depth,
    };
    let results = load_mentions(&text, &resolver, &mut deduplicator, &cwd, options).await;

    for result in &results {
        if !result.is_resolved() {
            eprintln!("{} {} did not resolve", style("warning:").yellow().bold(), result.mention);
        } else if let Some(error) = &result.error {
            eprintln!("{} {}: {error}", style("warning:").yellow().bold(), result.mention);
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&results).map_err(|e| BundlekitError::IoError {
            message: format!("Failed to render results: {e}"),
        })?;
        println!("{json}");
    } else {
        let block = format_context_block(&deduplicator, &mention_paths(&results));
        if !block.is_empty() {
            println!("{block}");
        }
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
