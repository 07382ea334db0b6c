//! Runtime settings
//!
//! Bundlekit keeps its persistent state (the registry file and the source
//! cache) under a single home directory:
//!
//! ```text
//! ~/.bundlekit/
//! ├── registry.json
//! └── cache/
//!     └── <repo-slug>-<key-hash>/
//! ```
//!
//! The home directory can be overridden with `--home` or `BUNDLEKIT_HOME`,
//! and the cache directory independently with `BUNDLEKIT_CACHE_DIR`.

use std::path::{Path, PathBuf};

use crate::error::{BundlekitError, Result};

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "BUNDLEKIT_HOME";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "BUNDLEKIT_CACHE_DIR";

/// Home directory name under the user's home
const HOME_DIR: &str = ".bundlekit";

/// Cache subdirectory within the home directory
const CACHE_DIR: &str = "cache";

/// Registry file name within the home directory
pub const REGISTRY_FILE: &str = "registry.json";

/// Resolved locations for bundlekit state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Home directory holding the registry file
    pub home: PathBuf,
    /// Directory for cached git sources
    pub cache_dir: PathBuf,
}

impl Settings {
    /// Settings rooted at an explicit home, with the cache at `<home>/cache`
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let cache_dir = home.join(CACHE_DIR);
        Self { home, cache_dir }
    }

    /// Resolve settings from an optional explicit home plus the environment
    ///
    /// Precedence for the home directory: `home` argument, `BUNDLEKIT_HOME`,
    /// then `~/.bundlekit`. The cache directory comes from
    /// `BUNDLEKIT_CACHE_DIR` when set, otherwise `<home>/cache`.
    pub fn resolve(home: Option<PathBuf>) -> Result<Self> {
        let home = match home {
            Some(path) => path,
            None => match non_empty_env(HOME_ENV) {
                Some(path) => PathBuf::from(path),
                None => default_home()?,
            },
        };

        let mut settings = Self::with_home(home);
        if let Some(cache_dir) = non_empty_env(CACHE_DIR_ENV) {
            settings.cache_dir = PathBuf::from(cache_dir);
        }
        Ok(settings)
    }

    /// Path of the persisted registry file
    pub fn registry_file(&self) -> PathBuf {
        registry_file_in(&self.home)
    }
}

/// Path of the registry file for a given home directory
pub fn registry_file_in(home: &Path) -> PathBuf {
    home.join(REGISTRY_FILE)
}

fn default_home() -> Result<PathBuf> {
    let base = dirs::home_dir().ok_or_else(|| BundlekitError::ConfigInvalid {
        message: "Could not determine home directory".to_string(),
    })?;
    Ok(base.join(HOME_DIR))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
