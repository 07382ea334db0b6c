//! Load command

use bundlekit::error::{BundlekitError, Result};
use bundlekit::progress::FetchSpinner;
use bundlekit::{Bundle, BundleRegistry, Settings};

use crate::cli::LoadArgs;

/// Load a bundle (with its includes unless `--single`) and print it
pub async fn run(settings: &Settings, args: &LoadArgs) -> Result<()> {
    let mut registry = BundleRegistry::from_settings(settings)?;

    let spinner = FetchSpinner::start(format!("Loading {}", args.target));
    let loaded = if args.single {
        let source = registry.find(&args.target).unwrap_or(&args.target).to_string();
        registry.load_single(&source).await
    } else {
        registry.load(&args.target).await
    };
    let bundle = match loaded {
        Ok(bundle) => {
            spinner.finish();
            bundle
        }
        Err(err) => {
            spinner.abandon();
            return Err(err);
        }
    };

    if !args.single {
        registry.save()?;
    }

    print!("{}", render(&bundle, args.json)?);
    Ok(())
}

fn render(bundle: &Bundle, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(bundle).map_err(|e| BundlekitError::IoError {
            message: format!("Failed to render bundle: {e}"),
        })?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(serde_yaml::to_string(bundle)?)
    }
}
