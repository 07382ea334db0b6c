//! Repository cloning

use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use super::auth::setup_auth_callbacks;
use super::error::interpret_git_error;
use super::url::{is_local_url, normalize_file_url_for_clone, normalize_ssh_url_for_clone};
use crate::error::{Result, git as git_err};

/// Clone a git repository into `target`.
///
/// `shallow` requests depth 1 and is ignored for local repositories, which
/// libgit2 cannot clone shallow.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    #[cfg(windows)]
    if url.starts_with("file://") {
        return clone_local_copy(url, target);
    }

    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if shallow && !is_local_url(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let url_to_clone = normalize_ssh_url_for_clone(url);
    let url_to_clone = normalize_file_url_for_clone(&url_to_clone);
    tracing::debug!(url = %url_to_clone, target = %target.display(), shallow, "cloning");

    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| git_err::clone_failed(url, interpret_git_error(&e)))
}

/// libgit2 misparses drive-letter file:// URLs on Windows, so local
/// repositories are copied and opened instead.
#[cfg(windows)]
fn clone_local_copy(url: &str, target: &Path) -> Result<Repository> {
    use walkdir::WalkDir;

    let path_str = url
        .strip_prefix("file:///")
        .or_else(|| url.strip_prefix("file://"))
        .unwrap_or(url)
        .replace('|', ":");
    let source = Path::new(&path_str);
    if !source.is_dir() {
        return Err(git_err::clone_failed(url, "local path is not a directory"));
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| git_err::clone_failed(url, e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| git_err::clone_failed(url, e.to_string()))?;
        let dst = target.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dst).map_err(|e| git_err::clone_failed(url, e.to_string()))?;
        } else {
            std::fs::copy(entry.path(), &dst)
                .map_err(|e| git_err::clone_failed(url, e.to_string()))?;
        }
    }

    Repository::open(target).map_err(|e| git_err::clone_failed(url, e.message()))
}
