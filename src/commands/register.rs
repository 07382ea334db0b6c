//! Register and unregister commands

use console::style;

use crate::cli::{RegisterArgs, UnregisterArgs};
use bundlekit::error::{Result, registry as registry_err};
use bundlekit::{BundleRegistry, ParsedUri, Settings};

/// Register a name for a source and save the registry
pub fn run_register(settings: &Settings, args: &RegisterArgs) -> Result<()> {
    ParsedUri::parse(&args.source)?;

    let mut registry = BundleRegistry::from_settings(settings)?;
    let replaced = registry.find(&args.name).is_some();
    registry.register([(args.name.as_str(), args.source.as_str())]);
    registry.save()?;

    let verb = if replaced { "Updated" } else { "Registered" };
    println!("{} {} -> {}", style(verb).green().bold(), style(&args.name).bold(), args.source);
    Ok(())
}

/// Remove a name and save the registry
pub fn run_unregister(settings: &Settings, args: &UnregisterArgs) -> Result<()> {
    let mut registry = BundleRegistry::from_settings(settings)?;
    if !registry.unregister(&args.name) {
        return Err(registry_err::not_registered(&args.name));
    }
    registry.save()?;

    println!("{} {}", style("Unregistered").green().bold(), style(&args.name).bold());
    Ok(())
}
