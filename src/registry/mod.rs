//! Bundle registry
//!
//! The registry maps bundle names to their sources and tracks the include
//! graph between them. Every state's `includes` and `included_by` lists are
//! kept as transposes of each other: registering, loading and unregistering
//! all preserve that relation.
//!
//! Loading resolves a source through the [`SourceHandlers`], parses its
//! definition file and then loads the bundles it includes, level by level.
//! Graph edits are applied only once the whole load has succeeded.

pub mod discovery;
pub mod persistence;
pub mod state;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;

pub use discovery::find_nearest_bundle_file;
pub use state::BundleState;

use crate::bundle::{BUNDLE_MD, Bundle, definition_file_in, parse_bundle_file, read_bundle_name};
use crate::cache::SourceCache;
use crate::config::Settings;
use crate::error::{Result, bundle as bundle_err, registry as registry_err};
use crate::path_utils::{is_within, normalize_lexically};
use crate::source::{ParsedUri, ResolvedSource, SourceHandlers};

/// A bundle loaded from one source, before composition
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub bundle: Bundle,
    pub resolved: ResolvedSource,
    /// Definition file the bundle was parsed from
    pub definition: PathBuf,
    /// Name of the enclosing repository's root bundle, for sub-bundles
    pub root_name: Option<String>,
}

impl LoadedBundle {
    /// Whether the bundle was cut from a larger repository
    pub fn is_sub_bundle(&self) -> bool {
        self.bundle.source_base_paths.contains_key(&self.bundle.name)
    }
}

/// Registry of named bundles and their include graph
#[derive(Debug)]
pub struct BundleRegistry {
    home: PathBuf,
    cache_dir: PathBuf,
    states: BTreeMap<String, BundleState>,
    handlers: SourceHandlers,
}

/// One node of an include tree being loaded
struct PendingLoad {
    key: Option<String>,
    source: String,
    parent: Option<usize>,
}

struct LoadNode {
    key: String,
    source: String,
    parent: Option<usize>,
    loaded: LoadedBundle,
    /// Normalised sources of every include, including skipped ones
    include_sources: Vec<String>,
}

impl BundleRegistry {
    /// Open the registry stored under `home`, with the cache at `<home>/cache`
    pub fn new(home: impl Into<PathBuf>) -> Result<Self> {
        Self::from_settings(&Settings::with_home(home))
    }

    /// Open the registry for resolved settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let states = persistence::load_states(&settings.registry_file())?;
        let handlers = SourceHandlers::with_defaults(
            std::env::current_dir()?,
            Arc::new(SourceCache::new()),
        );
        tracing::debug!(
            home = %settings.home.display(),
            bundles = states.len(),
            "opened registry"
        );
        Ok(Self {
            home: settings.home.clone(),
            cache_dir: settings.cache_dir.clone(),
            states,
            handlers,
        })
    }

    /// Replace the source handlers
    pub fn with_handlers(mut self, handlers: SourceHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn handlers(&self) -> &SourceHandlers {
        &self.handlers
    }

    /// Register bundles by name. Existing entries get the new source and keep
    /// their edges. Nothing is fetched or validated.
    pub fn register<I, N, S>(&mut self, bundles: I)
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        for (name, source) in bundles {
            let (name, source) = (name.into(), source.into());
            match self.states.get_mut(&name) {
                Some(state) => state.source = source,
                None => {
                    self.states.insert(name, BundleState::new(source));
                }
            }
        }
    }

    /// Remove a bundle and every edge that mentions it.
    ///
    /// Returns false if the name was not registered. The change is not saved.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(removed) = self.states.remove(name) else {
            return false;
        };

        for child in &removed.includes {
            if let Some(state) = self.states.get_mut(child) {
                state.forget(name);
            }
        }
        for parent in &removed.included_by {
            if let Some(state) = self.states.get_mut(parent) {
                state.forget(name);
            }
        }
        // One-sided edges are not reachable from the removed state.
        for state in self.states.values_mut() {
            state.forget(name);
        }

        tracing::debug!(name, "unregistered bundle");
        true
    }

    /// Registered names, sorted
    pub fn list_registered(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    pub fn get_state(&self, name: &str) -> Option<&BundleState> {
        self.states.get(name)
    }

    /// Mutable access to a state, for callers that edit graph edges directly
    pub fn get_state_mut(&mut self, name: &str) -> Option<&mut BundleState> {
        self.states.get_mut(name)
    }

    /// Registered source for a name
    pub fn find(&self, name: &str) -> Option<&str> {
        self.states.get(name).map(|s| s.source.as_str())
    }

    /// Persist all states to `<home>/registry.json`
    pub fn save(&self) -> Result<()> {
        let path = crate::config::registry_file_in(&self.home);
        persistence::save_states(&path, &self.states)?;
        tracing::debug!(path = %path.display(), bundles = self.states.len(), "saved registry");
        Ok(())
    }

    /// Load a single bundle from a source URI, without its includes
    pub async fn load_single(&self, uri: &str) -> Result<Bundle> {
        Ok(self.load_single_detailed(uri).await?.bundle)
    }

    /// Load a single bundle and report where it was found
    pub async fn load_single_detailed(&self, uri: &str) -> Result<LoadedBundle> {
        let parsed = ParsedUri::parse(uri)?;
        let resolved = self.handlers.resolve(&parsed, &self.cache_dir).await?;

        let definition = if resolved.active_path.is_file() {
            resolved.active_path.clone()
        } else {
            definition_file_in(&resolved.active_path).ok_or_else(|| {
                bundle_err::not_found(
                    uri,
                    resolved.active_path.join(BUNDLE_MD).display().to_string(),
                )
            })?
        };

        let mut bundle = parse_bundle_file(&definition)
            .await
            .map_err(|e| bundle_err::invalid_definition(uri, e))?;
        let root_name = detect_sub_bundle(&mut bundle, &definition, &resolved).await;

        Ok(LoadedBundle {
            bundle,
            resolved,
            definition,
            root_name,
        })
    }

    /// Source a bundle's include refers to: a registered name, a path
    /// relative to the including bundle, or a URI used as written.
    fn include_source(&self, include: &str, base_path: &Path) -> (Option<String>, String) {
        if let Some(source) = self.find(include) {
            return (Some(include.to_string()), source.to_string());
        }
        let is_dot_relative = include.starts_with("./") || include.starts_with("../");
        if is_dot_relative {
            let joined = normalize_lexically(&base_path.join(include));
            return (None, joined.to_string_lossy().into_owned());
        }
        (None, include.to_string())
    }

    /// Load a bundle with all of its includes and compose them.
    ///
    /// `name_or_uri` may be a registered name or a source URI. Includes are
    /// loaded level by level with each level fetched concurrently. An include
    /// that points back at one of its ancestors is skipped. The result is the
    /// includes composed in order with the including bundle applied last.
    ///
    /// On success every loaded bundle is recorded in the registry together
    /// with its include edges. On failure the registry is left unchanged.
    pub async fn load(&mut self, name_or_uri: &str) -> Result<Bundle> {
        let root = match self.find(name_or_uri) {
            Some(source) => PendingLoad {
                key: Some(name_or_uri.to_string()),
                source: source.to_string(),
                parent: None,
            },
            None => PendingLoad {
                key: None,
                source: name_or_uri.to_string(),
                parent: None,
            },
        };

        let nodes = self.load_tree(root).await?;
        self.check_names(&nodes)?;
        let composed = compose_tree(&nodes);
        self.commit(&nodes);
        composed
    }

    async fn load_tree(&self, root: PendingLoad) -> Result<Vec<LoadNode>> {
        let mut nodes: Vec<LoadNode> = Vec::new();
        let mut scheduled = HashSet::from([root.source.clone()]);
        let mut frontier = vec![root];

        while !frontier.is_empty() {
            let loaded = try_join_all(
                frontier
                    .iter()
                    .map(|pending| self.load_single_detailed(&pending.source)),
            )
            .await?;

            let mut next = Vec::new();
            for (pending, loaded) in frontier.into_iter().zip(loaded) {
                let idx = nodes.len();
                let mut include_sources = Vec::new();

                for include in &loaded.bundle.includes {
                    let (key, source) = self.include_source(include, &loaded.bundle.base_path);
                    include_sources.push(source.clone());

                    if scheduled.contains(&source) {
                        if is_ancestor(&nodes, pending.parent, &pending.source, &source) {
                            tracing::warn!(
                                bundle = %loaded.bundle.name,
                                include = %include,
                                "skipping include cycle"
                            );
                        } else {
                            tracing::debug!(include = %include, "include already loaded");
                        }
                        continue;
                    }

                    scheduled.insert(source.clone());
                    next.push(PendingLoad {
                        key,
                        source,
                        parent: Some(idx),
                    });
                }

                nodes.push(LoadNode {
                    key: pending.key.unwrap_or_else(|| loaded.bundle.name.clone()),
                    source: pending.source,
                    parent: pending.parent,
                    loaded,
                    include_sources,
                });
            }
            frontier = next;
        }

        Ok(nodes)
    }

    /// Refuse a load whose bundles would share a name with a different
    /// source, either in the registry or within the loaded tree.
    ///
    /// A registered entry counts as the same bundle when its source matches
    /// or when it was last loaded from the same directory.
    fn check_names(&self, nodes: &[LoadNode]) -> Result<()> {
        let mut claimed: HashMap<&str, &LoadNode> = HashMap::new();
        for node in nodes {
            let active_path = node.loaded.resolved.active_path.as_path();

            let sibling = claimed
                .insert(node.key.as_str(), node)
                .filter(|other| other.loaded.resolved.active_path != active_path);
            if let Some(other) = sibling {
                return Err(registry_err::name_conflict(
                    &node.key,
                    &other.source,
                    &node.source,
                ));
            }

            let registered = self.states.get(&node.key).filter(|state| {
                state.source != node.source && state.local_path.as_deref() != Some(active_path)
            });
            if let Some(state) = registered {
                return Err(registry_err::name_conflict(
                    &node.key,
                    &state.source,
                    &node.source,
                ));
            }
        }
        Ok(())
    }

    /// Record loaded bundles and their include edges
    fn commit(&mut self, nodes: &[LoadNode]) {
        let key_by_source: HashMap<&str, &str> = nodes
            .iter()
            .map(|n| (n.source.as_str(), n.key.as_str()))
            .collect();

        for node in nodes {
            let state = self
                .states
                .entry(node.key.clone())
                .or_insert_with(|| BundleState::new(&node.source));
            state.version = node.loaded.bundle.version.clone();
            state.local_path = Some(node.loaded.resolved.active_path.clone());
            state.is_root = !node.loaded.is_sub_bundle();
            state.root_name = node.loaded.root_name.clone();
        }

        for node in nodes {
            for source in &node.include_sources {
                let Some(child) = key_by_source.get(source.as_str()).copied() else {
                    continue;
                };
                if child == node.key {
                    continue;
                }
                if let Some(state) = self.states.get_mut(&node.key) {
                    state.add_include(child);
                }
                if let Some(state) = self.states.get_mut(child) {
                    state.add_included_by(&node.key);
                }
            }
        }

        tracing::debug!(bundles = nodes.len(), "recorded loaded bundles");
    }
}

/// Record the repository root of a bundle loaded from inside a larger
/// source, when that root has its own definition.
async fn detect_sub_bundle(
    bundle: &mut Bundle,
    definition: &Path,
    resolved: &ResolvedSource,
) -> Option<String> {
    if !resolved.is_subpath() {
        return None;
    }
    let definition_dir = definition.parent()?;
    if definition_dir == resolved.source_root
        || !is_within(definition_dir, &resolved.source_root)
    {
        return None;
    }

    let root_file = find_nearest_bundle_file(definition_dir.parent()?, &resolved.source_root)?;
    bundle
        .source_base_paths
        .insert(bundle.name.clone(), resolved.source_root.clone());
    let root_name = read_bundle_name(&root_file).await;

    tracing::debug!(
        bundle = %bundle.name,
        root = %resolved.source_root.display(),
        root_bundle = ?root_name,
        "detected sub-bundle"
    );
    root_name
}

/// Whether `source` is the node being expanded or one of its ancestors
fn is_ancestor(nodes: &[LoadNode], parent: Option<usize>, own: &str, source: &str) -> bool {
    if own == source {
        return true;
    }
    let mut current = parent;
    while let Some(idx) = current {
        let node = &nodes[idx];
        if node.source == source {
            return true;
        }
        current = node.parent;
    }
    false
}

/// Compose each node's includes (in order) under the node itself.
///
/// Children always come after their parent in `nodes`, so a reverse pass sees
/// every subtree before the node that includes it.
fn compose_tree(nodes: &[LoadNode]) -> Result<Bundle> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (idx, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent {
            children[parent].push(idx);
        }
    }

    let mut composed: Vec<Option<Bundle>> = vec![None; nodes.len()];
    for idx in (0..nodes.len()).rev() {
        let own = &nodes[idx].loaded.bundle;
        let merged = children[idx]
            .iter()
            .filter_map(|&child| composed[child].take())
            .reduce(|acc, next| acc.compose(&next));
        composed[idx] = Some(match merged {
            Some(base) => base.compose(own),
            None => own.clone(),
        });
    }

    composed
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| bundle_err::validation_failed("nothing was loaded"))
}
