//! Mapping mentions to files

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::bundle::Bundle;
use crate::path_utils::expand_home;

/// Resolves a mention token (including the `@`) to a path
pub trait MentionResolver: Send + Sync {
    fn resolve(&self, mention: &str) -> Option<PathBuf>;
}

/// Standard mention patterns:
///
/// - `@bundle:name`: a context file of a registered bundle
/// - `@~/path`, `@~user/path`: relative to a home directory
/// - `@path`: relative to the working directory
///
/// Paths are tried as written and then with `.md` appended. Applications can
/// wrap this resolver to add their own namespaces.
#[derive(Debug, Clone, Default)]
pub struct BaseMentionResolver {
    bundles: HashMap<String, Bundle>,
    working_dir: Option<PathBuf>,
}

impl BaseMentionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve plain paths against `dir` instead of the process working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Make a bundle's context available as `@name:...`
    pub fn register_bundle(&mut self, name: impl Into<String>, bundle: Bundle) {
        self.bundles.insert(name.into(), bundle);
    }

    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.get(name)
    }

    fn working_dir(&self) -> Option<PathBuf> {
        self.working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    /// The path a plain mention names, then the same path with `.md` appended
    fn candidates(&self, body: &str) -> Option<[PathBuf; 2]> {
        let path = if body.starts_with('~') {
            expand_home(body)
        } else {
            self.working_dir()?.join(body)
        };
        let path_md = with_md_suffix(&path);
        Some([path, path_md])
    }
}

impl MentionResolver for BaseMentionResolver {
    fn resolve(&self, mention: &str) -> Option<PathBuf> {
        let body = mention.strip_prefix('@')?;
        if body.is_empty() {
            return None;
        }

        if let Some((namespace, name)) = body.split_once(':') {
            let Some(bundle) = self.bundles.get(namespace) else {
                tracing::debug!(mention, namespace, "unknown mention namespace");
                return None;
            };
            return bundle.resolve_context_path(name);
        }

        first_existing(&self.candidates(body)?)
    }
}

fn with_md_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".md");
    PathBuf::from(name)
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.exists()).cloned()
}

/// Resolve a path relative to `base`, with the `.md` fallback
pub(crate) fn resolve_relative(base: &Path, body: &str) -> Option<PathBuf> {
    first_existing(&[base.join(body), base.join(format!("{body}.md"))])
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver_in(temp: &TempDir) -> BaseMentionResolver {
        BaseMentionResolver::new().with_working_dir(temp.path())
    }

    #[test]
    fn test_exact_path_wins() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("notes"), "plain").expect("write");
        fs::write(temp.path().join("notes.md"), "markdown").expect("write");

        assert_eq!(
            resolver_in(&temp).resolve("@notes"),
            Some(temp.path().join("notes"))
        );
    }

    #[test]
    fn test_md_fallback() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("notes.md"), "markdown").expect("write");

        assert_eq!(
            resolver_in(&temp).resolve("@notes"),
            Some(temp.path().join("notes.md"))
        );
    }

    #[test]
    fn test_missing_is_none() {
        let temp = TempDir::new().expect("tempdir");
        let resolver = resolver_in(&temp);
        assert_eq!(resolver.resolve("@nothing/here"), None);
        assert_eq!(resolver.resolve("no-at-sign"), None);
        assert_eq!(resolver.resolve("@"), None);
    }

    #[test]
    fn test_bundle_namespace() {
        let temp = TempDir::new().expect("tempdir");
        fs::create_dir(temp.path().join("context")).expect("mkdir");
        fs::write(temp.path().join("context/shared.md"), "shared").expect("write");

        let mut resolver = BaseMentionResolver::new();
        resolver.register_bundle("foundation", Bundle::new("foundation", temp.path()));

        assert_eq!(
            resolver.resolve("@foundation:context/shared"),
            Some(temp.path().join("context/shared.md"))
        );
        assert_eq!(resolver.resolve("@foundation:context/missing"), None);
    }

    #[test]
    fn test_unknown_namespace_does_not_fall_back_to_files() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("other:file.md"), "x").expect("write");

        assert_eq!(resolver_in(&temp).resolve("@other:file"), None);
    }

    #[test]
    fn test_home_expansion() {
        let home = dirs::home_dir().expect("home");
        let resolver = BaseMentionResolver::new();
        assert_eq!(resolver.resolve("@~"), Some(home));
        assert_eq!(resolver.resolve("@~/no-such-bundlekit-file"), None);
    }

    #[test]
    fn test_home_md_candidate_is_built_after_expansion() {
        let home = dirs::home_dir().expect("home");
        let [path, path_md] = BaseMentionResolver::new()
            .candidates("~")
            .expect("candidates");
        assert_eq!(path, home);
        assert_eq!(path_md, PathBuf::from(format!("{}.md", home.display())));
    }
}
