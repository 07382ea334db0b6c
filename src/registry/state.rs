//! Registry graph nodes

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A registered bundle and its position in the include graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleState {
    /// Source URI the bundle was registered or loaded from
    pub source: String,

    /// Names of bundles this bundle includes
    #[serde(default)]
    pub includes: Vec<String>,

    /// Names of bundles that include this bundle
    #[serde(default)]
    pub included_by: Vec<String>,

    /// Version declared by the last loaded definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Local directory or file the source last resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    /// False for a sub-bundle cut from a larger repository
    #[serde(default = "default_is_root")]
    pub is_root: bool,

    /// Name of the repository's root bundle, for sub-bundles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_name: Option<String>,
}

fn default_is_root() -> bool {
    true
}

impl BundleState {
    /// A state with no edges
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            includes: Vec::new(),
            included_by: Vec::new(),
            version: None,
            local_path: None,
            is_root: true,
            root_name: None,
        }
    }

    pub(crate) fn add_include(&mut self, name: &str) {
        if !self.includes.iter().any(|n| n == name) {
            self.includes.push(name.to_string());
        }
    }

    pub(crate) fn add_included_by(&mut self, name: &str) {
        if !self.included_by.iter().any(|n| n == name) {
            self.included_by.push(name.to_string());
        }
    }

    /// Drop every edge pointing at `name`
    pub(crate) fn forget(&mut self, name: &str) {
        self.includes.retain(|n| n != name);
        self.included_by.retain(|n| n != name);
    }
}
