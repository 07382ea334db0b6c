//! Content-addressed deduplication of loaded files

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use super::ContextFile;

/// Hex SHA-256 of a string's UTF-8 bytes
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Keeps one copy of each distinct content, crediting every path it came from
#[derive(Debug, Clone, Default)]
pub struct ContentDeduplicator {
    files: Vec<ContextFile>,
    by_hash: HashMap<String, usize>,
}

impl ContentDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `content` found at `path`.
    ///
    /// Returns true for content not seen before. For known content the path
    /// is added to its attribution list (once) and false is returned.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: &str) -> bool {
        let path = path.into();
        let hash = content_hash(content);

        if let Some(&idx) = self.by_hash.get(&hash) {
            let paths = &mut self.files[idx].paths;
            if !paths.contains(&path) {
                paths.push(path);
            }
            return false;
        }

        self.by_hash.insert(hash.clone(), self.files.len());
        self.files.push(ContextFile {
            content: content.to_string(),
            content_hash: hash,
            paths: vec![path],
        });
        true
    }

    /// Whether identical content has been added
    pub fn is_seen(&self, content: &str) -> bool {
        self.by_hash.contains_key(&content_hash(content))
    }

    /// One entry per distinct content, in the order content was first added
    pub fn unique_files(&self) -> Vec<ContextFile> {
        self.files.clone()
    }

    pub fn known_hashes(&self) -> HashSet<String> {
        self.by_hash.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn files(&self) -> &[ContextFile] {
        &self.files
    }
}
