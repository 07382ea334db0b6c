//! Rendering loaded mentions as a context block

use std::collections::HashMap;
use std::path::PathBuf;

use super::{ContentDeduplicator, MentionResult};

/// Group loaded mentions by the file they produced.
///
/// The same token can resolve to different files when it appears in files
/// with different base directories, so the map is keyed by path.
pub fn mention_paths(results: &[MentionResult]) -> HashMap<PathBuf, Vec<String>> {
    let mut by_path: HashMap<PathBuf, Vec<String>> = HashMap::new();
    for result in results.iter().filter(|r| r.content.is_some()) {
        if let Some(path) = &result.resolved_path {
            by_path
                .entry(path.clone())
                .or_default()
                .push(result.mention.clone());
        }
    }
    for mentions in by_path.values_mut() {
        mentions.sort_unstable();
        mentions.dedup();
    }
    by_path
}

/// Render each unique file as a `<context_file>` element.
///
/// The `paths` attribute lists every path the content was found at, each
/// prefixed with the mentions that resolved to it (`@m → /abs/path`).
pub fn format_context_block(
    deduplicator: &ContentDeduplicator,
    mentions_by_path: &HashMap<PathBuf, Vec<String>>,
) -> String {
    let blocks: Vec<String> = deduplicator
        .files()
        .iter()
        .map(|file| {
            let attribution = file
                .paths
                .iter()
                .map(|path| match mentions_by_path.get(path) {
                    Some(mentions) if !mentions.is_empty() => {
                        format!("{} → {}", mentions.join(", "), path.display())
                    }
                    _ => path.display().to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");

            format!(
                "<context_file paths=\"{}\">\n{}\n</context_file>",
                escape_attr(&attribution),
                file.content.trim_end()
            )
        })
        .collect();

    blocks.join("\n\n")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
