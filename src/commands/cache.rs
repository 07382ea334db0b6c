//! Cache command

use std::path::Path;

use console::style;

use crate::cli::{CacheArgs, CacheSubcommand};
use bundlekit::Settings;
use bundlekit::cache;
use bundlekit::error::Result;

pub fn run(settings: &Settings, args: &CacheArgs) -> Result<()> {
    let cache_dir = settings.cache_dir.as_path();
    match &args.command {
        Some(CacheSubcommand::List) => list_cached_sources(cache_dir),
        Some(CacheSubcommand::Clear(clear_args)) => match &clear_args.only {
            Some(name) => clean_entry(cache_dir, name),
            None => clean_all_cache(cache_dir),
        },
        None => show_cache_stats(cache_dir),
    }
}

fn print_stats(cache_dir: &Path) -> Result<cache::CacheStats> {
    let stats = cache::cache_stats(cache_dir)?;
    println!("Cache Statistics:");
    println!("  Location: {}", cache_dir.display());
    println!("  Entries: {}", stats.entries);
    println!("  Size: {}", stats.formatted_size());
    Ok(stats)
}

fn show_cache_stats(cache_dir: &Path) -> Result<()> {
    let stats = print_stats(cache_dir)?;

    if stats.entries == 0 {
        println!("\nCache is empty.");
    } else {
        println!("\nRun 'bundlekit cache list' to list cached sources.");
        println!("Run 'bundlekit cache clear' to remove everything from cache.");
        println!("Run 'bundlekit cache clear --only <entry>' to remove one entry.");
    }
    Ok(())
}

fn list_cached_sources(cache_dir: &Path) -> Result<()> {
    print_stats(cache_dir)?;
    println!();

    let entries = cache::list_entries(cache_dir)?;
    if entries.is_empty() {
        println!("No cached sources.");
        return Ok(());
    }

    println!("Cached sources ({}):", entries.len());
    for entry in &entries {
        println!("  {} ({})", style(&entry.name).cyan(), entry.formatted_size());
        if let Some(meta) = &entry.meta {
            println!("    URL: {}", meta.url);
            if let Some(git_ref) = &meta.git_ref {
                println!("    Ref: {git_ref}");
            }
            println!("    Commit: {}", meta.sha);
        }
    }
    Ok(())
}

fn clean_entry(cache_dir: &Path, name: &str) -> Result<()> {
    cache::remove_entry(cache_dir, name)?;
    println!("{} {name}", style("Removed").green().bold());
    Ok(())
}

fn clean_all_cache(cache_dir: &Path) -> Result<()> {
    let removed = cache::clear_cache(cache_dir)?;
    println!(
        "{} {removed} cache entr{}",
        style("Removed").green().bold(),
        if removed == 1 { "y" } else { "ies" }
    );
    Ok(())
}
