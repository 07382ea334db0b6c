//! Path helpers shared by source handlers, the cache and mention resolution

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Characters that are unsafe in filesystem paths
/// Replaced with hyphens and collapsed: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a name safe for use as a single path component.
///
/// Unsafe characters become hyphens, runs of hyphens collapse and leading or
/// trailing hyphens are dropped. Returns "unknown" if nothing is left.
///
/// ```
/// use bundlekit::path_utils::make_path_safe;
///
/// assert_eq!(make_path_safe("github.com/org/repo"), "github.com-org-repo");
/// assert_eq!(make_path_safe(":::"), "unknown");
/// ```
pub fn make_path_safe(name: &str) -> String {
    let key: String = name
        .trim_start_matches('@')
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the parent.
///
/// Does not touch the filesystem, so it works for paths that do not exist yet.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize a path that may not exist yet.
///
/// The longest existing ancestor is resolved (so symlinks such as
/// `/var -> /private/var` on macOS agree) and the missing tail is appended.
/// Uses `dunce` so Windows paths do not gain a `\\?\` prefix.
pub fn canonical_or_normalized(path: &Path) -> PathBuf {
    let path = normalize_lexically(path);
    if let Ok(canonical) = dunce::canonicalize(&path) {
        return canonical;
    }

    let mut existing = path.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return path.clone(),
        }
    }

    let mut out = existing
        .normalize()
        .map(|p| dunce::simplified(p.as_path()).to_path_buf())
        .unwrap_or_else(|_| existing.to_path_buf());
    for name in missing.iter().rev() {
        out.push(name);
    }
    out
}

/// Expand a leading `~` or `~user` in a path.
///
/// `~` maps to the current user's home. `~user` maps to that user's home
/// directory, looked up in `/etc/passwd` on Unix and otherwise guessed as a
/// sibling of the current home. Paths without a leading tilde, or whose user
/// cannot be found, are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };

    let (user, tail) = match rest.find(['/', '\\']) {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    let home = if user.is_empty() {
        dirs::home_dir()
    } else {
        home_dir_of(user)
    };

    match home {
        Some(home) if tail.is_empty() => home,
        Some(home) => home.join(tail),
        None => PathBuf::from(path),
    }
}

fn home_dir_of(user: &str) -> Option<PathBuf> {
    #[cfg(unix)]
    if let Some(home) = passwd_home(user) {
        return Some(home);
    }

    let own_home = dirs::home_dir()?;
    let parent = own_home.parent()?;
    let candidate = parent.join(user);
    candidate.is_dir().then_some(candidate)
}

#[cfg(unix)]
fn passwd_home(user: &str) -> Option<PathBuf> {
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    passwd_home_from(&passwd, user)
}

/// Find a user's home field (6th) in passwd-formatted text
#[cfg(unix)]
fn passwd_home_from(passwd: &str, user: &str) -> Option<PathBuf> {
    passwd.lines().find_map(|line| {
        let fields: Vec<&str> = line.split(':').collect();
        (fields.len() >= 7 && fields[0] == user && !fields[5].is_empty())
            .then(|| PathBuf::from(fields[5]))
    })
}

/// Whether `path` equals `base` or lies beneath it (component-wise)
pub fn is_within(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}
