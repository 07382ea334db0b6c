//! Registry file (`<home>/registry.json`)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BundleState;
use crate::error::{Result, registry as registry_err};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    #[serde(default)]
    bundles: BTreeMap<String, BundleState>,
}

/// Read persisted states; a missing file is an empty registry
pub fn load_states(path: &Path) -> Result<BTreeMap<String, BundleState>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| registry_err::read_failed(path.display().to_string(), e.to_string()))?;
    let file: RegistryFile = serde_json::from_str(&content)
        .map_err(|e| registry_err::read_failed(path.display().to_string(), e.to_string()))?;

    if file.version > FORMAT_VERSION {
        return Err(registry_err::read_failed(
            path.display().to_string(),
            format!("unsupported registry version {}", file.version),
        ));
    }
    Ok(file.bundles)
}

/// Write states atomically (temp file + rename)
pub fn save_states(path: &Path, states: &BTreeMap<String, BundleState>) -> Result<()> {
    let write_err = |p: &Path, e: &dyn std::fmt::Display| {
        registry_err::write_failed(p.display().to_string(), e.to_string())
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(parent, &e))?;
    }

    let file = RegistryFile {
        version: FORMAT_VERSION,
        bundles: states.clone(),
    };
    let content = serde_json::to_string_pretty(&file).map_err(|e| write_err(path, &e))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content).map_err(|e| write_err(&tmp_path, &e))?;
    fs::rename(&tmp_path, path).map_err(|e| write_err(path, &e))
}
