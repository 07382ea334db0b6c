//! List command

use console::style;

use crate::cli::ListArgs;
use bundlekit::error::Result;
use bundlekit::{BundleRegistry, BundleState, Settings};

/// List registered bundles
pub fn run(settings: &Settings, args: &ListArgs) -> Result<()> {
    let registry = BundleRegistry::from_settings(settings)?;
    let names = registry.list_registered();

    if names.is_empty() {
        println!("No bundles registered.");
        println!("\nRun 'bundlekit register <name> <source>' to add one.");
        return Ok(());
    }

    println!("Registered bundles ({}):", names.len());
    for name in &names {
        let Some(state) = registry.get_state(name) else {
            continue;
        };
        println!("  {}  {}", style(name).cyan().bold(), style(&state.source).dim());
        if args.detailed {
            print_details(state);
        }
    }
    Ok(())
}

fn print_details(state: &BundleState) {
    if let Some(version) = &state.version {
        println!("    Version: {version}");
    }
    if let Some(path) = &state.local_path {
        println!("    Path: {}", path.display());
    }
    if !state.is_root {
        match &state.root_name {
            Some(root) => println!("    Sub-bundle of: {root}"),
            None => println!("    Sub-bundle"),
        }
    }
    if !state.includes.is_empty() {
        println!("    Includes: {}", state.includes.join(", "));
    }
    if !state.included_by.is_empty() {
        println!("    Included by: {}", state.included_by.join(", "));
    }
}
