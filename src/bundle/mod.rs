//! Bundles: named, versioned session configuration units
//!
//! A [`Bundle`] is produced from a definition file (see [`definition`]) and
//! combined with the bundles it includes through [`Bundle::compose`]. Provider,
//! tool, hook and agent payloads are carried as opaque YAML values.

pub mod definition;
pub mod frontmatter;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub use definition::{BUNDLE_MD, BUNDLE_YAML, definition_file_in, parse_bundle_file, read_bundle_name};

/// Key identifying an entry in a module list
const MODULE_KEY: &str = "module";

/// A loaded bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bundle {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub session: Mapping,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, Value>,
    /// Context files by the name they were declared under
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, PathBuf>,
    /// Sources this bundle includes, as written in its definition
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Directory relative references resolve against
    pub base_path: PathBuf,
    /// Sub-bundle name to the root of the repository it was loaded from
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub source_base_paths: BTreeMap<String, PathBuf>,
}

impl Bundle {
    /// Create an empty bundle rooted at `base_path`
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Merge `overlay` on top of this bundle.
    ///
    /// The overlay wins for scalars, `instruction` and `base_path`. `session`
    /// is merged recursively. Provider, tool and hook entries with the same
    /// `module` are merged in place and new ones are appended. Agents,
    /// context entries and `source_base_paths` are unioned with the overlay
    /// taking precedence.
    pub fn compose(&self, overlay: &Bundle) -> Bundle {
        let mut agents = self.agents.clone();
        agents.extend(overlay.agents.clone());

        let mut context = self.context.clone();
        context.extend(overlay.context.clone());

        let mut source_base_paths = self.source_base_paths.clone();
        source_base_paths.extend(overlay.source_base_paths.clone());

        let mut includes = self.includes.clone();
        for include in &overlay.includes {
            if !includes.contains(include) {
                includes.push(include.clone());
            }
        }

        Bundle {
            name: overlay.name.clone(),
            version: overlay.version.clone().or_else(|| self.version.clone()),
            description: overlay
                .description
                .clone()
                .or_else(|| self.description.clone()),
            session: merge_mappings(&self.session, &overlay.session),
            providers: merge_module_lists(&self.providers, &overlay.providers),
            tools: merge_module_lists(&self.tools, &overlay.tools),
            hooks: merge_module_lists(&self.hooks, &overlay.hooks),
            agents,
            context,
            includes,
            instruction: overlay
                .instruction
                .clone()
                .or_else(|| self.instruction.clone()),
            base_path: overlay.base_path.clone(),
            source_base_paths,
        }
    }

    /// Resolve a context name to an existing file.
    ///
    /// Looks at declared context entries, then under `base_path`, then under
    /// the repository roots in `source_base_paths` (this bundle's own root
    /// first). Each location is tried as written and with `.md` appended.
    pub fn resolve_context_path(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if !is_safe_relative(relative) {
            return None;
        }

        let declared = [name.to_string(), format!("{name}.md")]
            .into_iter()
            .filter_map(|key| self.context.get(&key).cloned());

        let own_root = self.source_base_paths.get(&self.name);
        let other_roots = self
            .source_base_paths
            .iter()
            .filter(|(bundle, _)| **bundle != self.name)
            .map(|(_, root)| root);
        let roots = std::iter::once(&self.base_path)
            .chain(own_root)
            .chain(other_roots);
        let under_roots = roots.flat_map(|root| with_md_fallback(&root.join(relative)));

        declared.chain(under_roots).find(|path| path.exists())
    }
}

fn with_md_fallback(path: &Path) -> [PathBuf; 2] {
    let mut md = path.as_os_str().to_owned();
    md.push(".md");
    [path.to_path_buf(), PathBuf::from(md)]
}

/// Relative path that cannot climb out of its root
fn is_safe_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().next().is_some()
}

/// Recursively merge two mappings, `overlay` winning on conflicts
pub fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let combined = match (merged.get(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                Value::Mapping(merge_mappings(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

fn module_id(entry: &Value) -> Option<&str> {
    entry.get(MODULE_KEY)?.as_str()
}

/// Merge module lists, pairing entries by their `module` key
fn merge_module_lists(base: &[Value], overlay: &[Value]) -> Vec<Value> {
    let mut merged = base.to_vec();
    for entry in overlay {
        let existing = module_id(entry).and_then(|id| {
            merged
                .iter()
                .position(|candidate| module_id(candidate) == Some(id))
        });
        match (existing, entry) {
            (Some(idx), Value::Mapping(incoming)) => {
                let combined = match &merged[idx] {
                    Value::Mapping(current) => merge_mappings(current, incoming),
                    _ => incoming.clone(),
                };
                merged[idx] = Value::Mapping(combined);
            }
            _ => merged.push(entry.clone()),
        }
    }
    merged
}
