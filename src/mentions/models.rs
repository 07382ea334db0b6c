//! Mention loading results

use std::path::PathBuf;

use serde::Serialize;

/// Unique file content and every path it was found at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextFile {
    pub content: String,
    /// Lowercase hex SHA-256 of the content's UTF-8 bytes
    pub content_hash: String,
    /// Paths in the order they were first seen, without repeats
    pub paths: Vec<PathBuf>,
}

/// Outcome of resolving one mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionResult {
    /// Mention text including the `@`
    pub mention: String,
    pub resolved_path: Option<PathBuf>,
    /// File content, absent for directories and failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MentionResult {
    pub(crate) fn unresolved(mention: &str) -> Self {
        Self {
            mention: mention.to_string(),
            resolved_path: None,
            content: None,
            error: None,
        }
    }

    pub(crate) fn resolved(mention: &str, path: PathBuf) -> Self {
        Self {
            resolved_path: Some(path),
            ..Self::unresolved(mention)
        }
    }

    /// Whether the mention resolved to an existing path
    pub fn is_resolved(&self) -> bool {
        self.resolved_path.is_some()
    }
}
