//! Common test utilities for bundlekit integration tests

use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

/// A temporary directory holding bundle sources and a bundlekit home
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Canonical path to the workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp directory");
        Self { temp, path }
    }

    /// Home directory used for the registry and cache
    pub fn home(&self) -> PathBuf {
        self.path.join("home")
    }

    /// Cache directory below the home directory
    pub fn cache_dir(&self) -> PathBuf {
        self.home().join("cache")
    }

    /// Write a file in workspace, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Write a `bundle.yaml` declaring `name` into `dir`, with extra YAML lines
    pub fn write_bundle(&self, dir: &str, name: &str, extra: &str) -> PathBuf {
        let content = format!("bundle:\n  name: {name}\n  version: 1.0.0\n{extra}");
        self.write_file(&format!("{dir}/bundle.yaml"), &content);
        self.path.join(dir)
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Turn a workspace directory into a git repository with one commit on
    /// `main`, returning the commit SHA
    pub fn init_git_repo(&self, dir: &str) -> String {
        let repo_path = self.path.join(dir);
        std::fs::create_dir_all(&repo_path).expect("Failed to create repository directory");
        let repo = Repository::init(&repo_path).expect("Failed to init repository");
        repo.set_head("refs/heads/main").expect("Failed to set HEAD");
        commit_all(&repo, "initial")
    }

    /// `git+file://` source URI for a workspace repository
    pub fn git_uri(&self, dir: &str) -> String {
        format!("git+file://{}", self.path.join(dir).display())
    }

    /// Names of the entries directly inside the cache directory
    pub fn cache_entries(&self) -> Vec<String> {
        let Ok(read_dir) = std::fs::read_dir(self.cache_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// The bundlekit binary, pointed at this workspace's home and run from
    /// the workspace root
    pub fn bundlekit_cmd(&self) -> assert_cmd::Command {
        #[allow(deprecated)]
        let mut cmd = assert_cmd::Command::cargo_bin("bundlekit").expect("bundlekit binary");
        cmd.current_dir(&self.path)
            .env_remove("BUNDLEKIT_CACHE_DIR")
            .env_remove("BUNDLEKIT_LOG")
            .arg("--home")
            .arg(self.home());
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Commit every file in the working tree
#[allow(dead_code)]
pub fn commit_all(repo: &Repository, message: &str) -> String {
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Failed to stage files");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let sig = Signature::now("Test", "test@example.com").expect("Failed to create signature");
    let parents: Vec<git2::Commit<'_>> = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .into_iter()
        .collect();
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Failed to commit")
        .to_string()
}

/// Path as the `String` form sources are written in
#[allow(dead_code)]
pub fn source_of(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }
}
