//! URL helpers for git operations
//!
//! This module handles:
//! - Turning a `git+<transport>` source into the URL libgit2 clones
//! - Normalizing SCP-style SSH URLs to ssh:// format
//! - Normalizing file:// URLs for libgit2 compatibility

use std::borrow::Cow;
use std::path::Path;

/// Build the clone URL for a `git+<transport>` scheme and its path.
///
/// `git+https` with `github.com/org/repo` becomes `https://github.com/org/repo`,
/// `git+file` with `/srv/repo` becomes `file:///srv/repo`. Returns `None` when
/// the scheme is not a git scheme.
pub fn remote_url(scheme: &str, path: &str) -> Option<String> {
    let transport = scheme.strip_prefix("git+")?;
    if transport.is_empty() {
        return None;
    }
    if transport == "file" {
        let path = path.trim_start_matches('/');
        return Some(format!("file:///{path}"));
    }
    Some(format!("{transport}://{path}"))
}

/// Whether a clone URL points at the local filesystem
pub fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute()
}

/// Normalize SSH URLs from SCP-style (git@host:path) to ssh:// format.
///
/// libgit2 handles the explicit ssh:// form more reliably.
pub fn normalize_ssh_url_for_clone(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host_part, path_part)) => {
            let path_part = path_part.trim_start_matches('/');
            Cow::Owned(format!("ssh://{host_part}/{path_part}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Normalize file:// URLs so libgit2 can resolve them on Unix.
///
/// `file://relative` and backslash paths become `file:///...`.
pub fn normalize_file_url_for_clone(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    #[cfg(not(windows))]
    {
        if after.contains('\\') {
            let path = after.replace('\\', "/");
            return Cow::Owned(format!("file:///{}", path.trim_start_matches('/')));
        }
        if !after.is_empty() && !after.starts_with('/') {
            return Cow::Owned(format!("file:///{after}"));
        }
    }
    #[cfg(windows)]
    let _ = after;
    Cow::Borrowed(url)
}
