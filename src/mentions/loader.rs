//! Recursive mention loading

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use super::resolver::resolve_relative;
use super::{ContentDeduplicator, MentionResolver, MentionResult, parse_mentions};
use crate::path_utils::canonical_or_normalized;

/// Limits for a mention loading pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// How many levels of mentions inside loaded files are followed
    pub max_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

struct PendingText {
    text: String,
    base_dir: PathBuf,
    depth: usize,
}

/// Resolve and load every mention in `text`, following mentions inside the
/// loaded files.
///
/// `./` and `../` mentions resolve against the directory of the file that
/// contains them (`relative_to` for the top-level text); everything else goes
/// through `resolver`. Loaded content is added to `deduplicator`. Each file is
/// expanded at most once per call, so self-referencing and mutually
/// referencing files terminate.
///
/// Unresolvable or unreadable mentions are reported in the returned results
/// and never abort the pass.
pub async fn load_mentions(
    text: &str,
    resolver: &dyn MentionResolver,
    deduplicator: &mut ContentDeduplicator,
    relative_to: &Path,
    options: LoadOptions,
) -> Vec<MentionResult> {
    let mut results = Vec::new();
    let mut seen_mentions: HashSet<(String, Option<PathBuf>)> = HashSet::new();
    let mut expanded: HashSet<PathBuf> = HashSet::new();
    let mut worklist = VecDeque::from([PendingText {
        text: text.to_string(),
        base_dir: relative_to.to_path_buf(),
        depth: 0,
    }]);

    while let Some(PendingText {
        text,
        base_dir,
        depth,
    }) = worklist.pop_front()
    {
        for mention in parse_mentions(&text) {
            let body = mention.trim_start_matches('@');
            let is_relative = body.starts_with("./") || body.starts_with("../");

            let key = (mention.clone(), is_relative.then(|| base_dir.clone()));
            if !seen_mentions.insert(key) {
                continue;
            }

            let resolved = if is_relative {
                resolve_relative(&base_dir, body)
            } else {
                resolver.resolve(&mention)
            };
            let Some(path) = resolved else {
                tracing::debug!(mention = %mention, "mention did not resolve");
                results.push(MentionResult::unresolved(&mention));
                continue;
            };

            let path = canonical_or_normalized(&path);
            let mut result = MentionResult::resolved(&mention, path.clone());

            if path.is_dir() {
                results.push(result);
                continue;
            }

            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    deduplicator.add_file(path.clone(), &content);
                    if depth < options.max_depth && expanded.insert(path.clone()) {
                        worklist.push_back(PendingText {
                            text: content.clone(),
                            base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                            depth: depth + 1,
                        });
                    }
                    result.content = Some(content);
                }
                Err(e) => {
                    tracing::warn!(mention = %mention, path = %path.display(), error = %e, "failed to read mentioned file");
                    result.error = Some(e.to_string());
                }
            }
            results.push(result);
        }
    }

    results
}
