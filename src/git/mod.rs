//! Git transport for bundle sources
//!
//! This module handles:
//! - Cloning repositories (HTTPS, SSH and local `file://`)
//! - Resolving refs (branches, tags, SHAs) to exact commits
//! - Checking out a resolved commit into a working tree
//!
//! Authentication is delegated entirely to git's native system:
//! - SSH keys from ~/.ssh/ and the SSH agent
//! - Git credential helpers
//!
//! Everything here is blocking libgit2 work. Async callers run it on
//! `tokio::task::spawn_blocking` (see [`crate::source::git`]).

mod auth;
mod checkout;
mod clone;
mod error;
mod refs;
mod url;

use std::path::Path;

pub use checkout::checkout_commit;
pub use clone::clone;
pub use error::interpret_git_error;
pub use refs::resolve_ref;
pub use url::{is_local_url, normalize_file_url_for_clone, normalize_ssh_url_for_clone, remote_url};

use crate::error::Result;

/// Fetch `url` at `git_ref` into `target` and check the commit out.
///
/// Remote repositories are cloned shallow first. If the requested ref is not
/// reachable from the shallow history the partial clone is discarded and a
/// full clone is made instead. Returns the checked-out commit SHA.
pub fn fetch_checkout(url: &str, git_ref: Option<&str>, target: &Path) -> Result<String> {
    let shallow = !is_local_url(url);
    let repo = clone(url, target, shallow)?;

    let sha = match resolve_ref(&repo, git_ref) {
        Ok(sha) => sha,
        Err(err) if shallow => {
            tracing::debug!(url, ?git_ref, error = %err, "ref not in shallow clone, retrying full clone");
            drop(repo);
            std::fs::remove_dir_all(target)?;
            let repo = clone(url, target, false)?;
            let sha = resolve_ref(&repo, git_ref)?;
            checkout_commit(&repo, &sha)?;
            return Ok(sha);
        }
        Err(err) => return Err(err),
    };

    checkout_commit(&repo, &sha)?;
    Ok(sha)
}


#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_checkout_local_default_branch() {
        let temp = TempDir::new().expect("tempdir");
        let origin = temp.path().join("origin");
        let (_repo, sha) = test_repo::init_with_files(&origin, &[("bundle.yaml", "name: x\n")]);

        let target = temp.path().join("clone");
        let url = format!("file://{}", origin.display());
        let fetched = fetch_checkout(&url, None, &target).expect("fetch");

        assert_eq!(fetched, sha);
        assert!(target.join("bundle.yaml").is_file());
    }

    #[test]
    fn test_fetch_checkout_tag() {
        let temp = TempDir::new().expect("tempdir");
        let origin = temp.path().join("origin");
        let (repo, first) = test_repo::init_with_files(&origin, &[("a.md", "v1")]);
        let commit = repo
            .find_commit(git2::Oid::from_str(&first).expect("oid"))
            .expect("commit");
        repo.tag_lightweight("v1", commit.as_object(), false)
            .expect("tag");
        std::fs::write(origin.join("a.md"), "v2").expect("write");
        test_repo::commit_all(&repo, "second");

        let target = temp.path().join("clone");
        let url = format!("file://{}", origin.display());
        let fetched = fetch_checkout(&url, Some("v1"), &target).expect("fetch");

        assert_eq!(fetched, first);
        assert_eq!(
            std::fs::read_to_string(target.join("a.md")).expect("read"),
            "v1"
        );
    }

    #[test]
    fn test_fetch_checkout_unknown_ref() {
        let temp = TempDir::new().expect("tempdir");
        let origin = temp.path().join("origin");
        test_repo::init_with_files(&origin, &[("a.md", "x")]);

        let url = format!("file://{}", origin.display());
        let err = fetch_checkout(&url, Some("no-such-branch"), &temp.path().join("clone"))
            .expect_err("unknown ref");
        assert!(matches!(
            err,
            crate::error::BundlekitError::GitRefResolveFailed { .. }
        ));
    }
}
