//! Bundle definition files (`bundle.md`, `bundle.yaml`)
//!
//! ```yaml
//! bundle:
//!   name: my-bundle
//!   version: 1.0.0
//! includes:
//!   - git+https://github.com/org/repo@main
//!   - bundle: ./behaviors/review
//! providers: [...]
//! context:
//!   include: [context/guide.md]
//! ```
//!
//! A markdown definition carries the YAML as front matter and its body becomes
//! the bundle instruction. `name`, `version` and `description` are accepted at
//! the top level as well as under `bundle:`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::Bundle;
use super::frontmatter::{parse_frontmatter_and_body, scalar_to_string};
use crate::error::{Result, bundle as bundle_err, fs as fs_err};

/// Markdown bundle definition, preferred when both files exist
pub const BUNDLE_MD: &str = "bundle.md";

/// Plain YAML bundle definition
pub const BUNDLE_YAML: &str = "bundle.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BundleDefinition {
    bundle: Option<BundleMeta>,
    name: Option<String>,
    version: Option<Value>,
    description: Option<String>,
    includes: Option<Vec<IncludeEntry>>,
    session: Option<Mapping>,
    providers: Option<Vec<Value>>,
    tools: Option<Vec<Value>>,
    hooks: Option<Vec<Value>>,
    agents: Option<AgentsSection>,
    context: Option<ContextSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BundleMeta {
    name: Option<String>,
    version: Option<Value>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IncludeEntry {
    Source(String),
    Bundle { bundle: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AgentsSection {
    Include(AgentInclude),
    Inline(BTreeMap<String, Value>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentInclude {
    include: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContextSection {
    include: Vec<String>,
}

impl BundleDefinition {
    fn into_bundle(self, path: &Path, base_path: PathBuf, instruction: Option<String>) -> Result<Bundle> {
        let meta = self.bundle.unwrap_or_default();

        let name = meta
            .name
            .or(self.name)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                bundle_err::validation_failed(format!(
                    "{} does not declare a bundle name",
                    path.display()
                ))
            })?;

        let version = meta
            .version
            .or(self.version)
            .as_ref()
            .and_then(scalar_to_string);

        let includes = self
            .includes
            .unwrap_or_default()
            .into_iter()
            .map(|entry| match entry {
                IncludeEntry::Source(source) | IncludeEntry::Bundle { bundle: source } => source,
            })
            .collect();

        let agents = match self.agents {
            Some(AgentsSection::Include(AgentInclude { include })) => include
                .into_iter()
                .map(|agent| {
                    let mut config = Mapping::new();
                    config.insert("name".into(), agent.clone().into());
                    (agent, Value::Mapping(config))
                })
                .collect(),
            Some(AgentsSection::Inline(agents)) => agents,
            None => BTreeMap::new(),
        };

        let context = self
            .context
            .unwrap_or_default()
            .include
            .into_iter()
            .map(|entry| {
                let resolved = base_path.join(&entry);
                (entry, resolved)
            })
            .collect();

        Ok(Bundle {
            name,
            version,
            description: meta.description.or(self.description),
            session: self.session.unwrap_or_default(),
            providers: self.providers.unwrap_or_default(),
            tools: self.tools.unwrap_or_default(),
            hooks: self.hooks.unwrap_or_default(),
            agents,
            context,
            includes,
            instruction,
            base_path,
            source_base_paths: BTreeMap::new(),
        })
    }
}

/// Definition file inside `dir`, preferring `bundle.md` over `bundle.yaml`
pub fn definition_file_in(dir: &Path) -> Option<PathBuf> {
    [BUNDLE_MD, BUNDLE_YAML]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Parse definition text read from `path`
///
/// The bundle's `base_path` is the directory holding the file.
pub fn parse_bundle_str(content: &str, path: &Path) -> Result<Bundle> {
    let base_path = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

    let parse_err = |e: serde_yaml::Error| bundle_err::parse_failed(path.display().to_string(), e.to_string());

    let (definition, instruction) = if is_markdown {
        let (frontmatter, body) = parse_frontmatter_and_body(content).ok_or_else(|| {
            bundle_err::parse_failed(path.display().to_string(), "missing YAML front matter")
        })?;
        let definition: BundleDefinition = if frontmatter.is_null() {
            BundleDefinition::default()
        } else {
            serde_yaml::from_value(frontmatter).map_err(parse_err)?
        };
        let body = body.trim();
        (definition, (!body.is_empty()).then(|| body.to_string()))
    } else {
        let definition: Option<BundleDefinition> = serde_yaml::from_str(content).map_err(parse_err)?;
        (definition.unwrap_or_default(), None)
    };

    definition.into_bundle(path, base_path, instruction)
}

/// Read and parse a bundle definition file
pub async fn parse_bundle_file(path: &Path) -> Result<Bundle> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| fs_err::read_failed(path.display().to_string(), e.to_string()))?;
    parse_bundle_str(&content, path)
}

/// Bundle name declared in a definition file, if it parses
pub async fn read_bundle_name(path: &Path) -> Option<String> {
    match parse_bundle_file(path).await {
        Ok(bundle) => Some(bundle.name),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "could not read bundle name");
            None
        }
    }
}
