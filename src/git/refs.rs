//! Git reference resolution

use git2::{Commit, Oid, Repository};

use crate::error::{Result, git as git_err};

/// Resolve a ref (branch, tag, or full/partial SHA) to a full commit SHA.
///
/// `None` means the repository's HEAD, which for a fresh clone is the remote's
/// default branch.
pub fn resolve_ref(repo: &Repository, git_ref: Option<&str>) -> Result<String> {
    let commit = match git_ref {
        Some(name) => resolve_reference(repo, name)?,
        None => repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| git_err::ref_resolve_failed("HEAD", e.message()))?,
    };
    Ok(commit.id().to_string())
}

fn resolve_reference<'a>(repo: &'a Repository, refname: &str) -> Result<Commit<'a>> {
    let candidates = [
        refname.to_string(),
        format!("refs/heads/{refname}"),
        format!("refs/tags/{refname}"),
        format!("refs/remotes/origin/{refname}"),
    ];

    let by_name = candidates.iter().find_map(|candidate| {
        repo.find_reference(candidate)
            .ok()
            .and_then(|r| r.peel_to_commit().ok())
    });
    if let Some(commit) = by_name {
        return Ok(commit);
    }

    if let Some(commit) = Oid::from_str(refname)
        .ok()
        .and_then(|oid| repo.find_commit(oid).ok())
    {
        return Ok(commit);
    }

    repo.revparse_single(refname)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|_| git_err::ref_resolve_failed(refname, "Could not resolve reference"))
}
