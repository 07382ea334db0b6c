//! Checkout of resolved commits

use git2::{Oid, Repository, build::CheckoutBuilder};

use crate::error::{Result, git as git_err};

/// Check out `sha` as a detached HEAD, forcing the working tree to match
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let fail = |e: git2::Error| git_err::checkout_failed(sha, e.message());

    let oid = Oid::from_str(sha).map_err(fail)?;
    let commit = repo.find_commit(oid).map_err(fail)?;
    repo.set_head_detached(commit.id()).map_err(fail)?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout)).map_err(fail)?;

    Ok(())
}
