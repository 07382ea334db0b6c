//! Nearest bundle definition lookup

use std::path::{Path, PathBuf};

use crate::bundle::definition_file_in;

/// Find the nearest bundle definition walking up from `start`.
///
/// Each directory prefers `bundle.md` over `bundle.yaml`. Both `start` and
/// `stop` are searched but nothing above `stop`. When `start` is not inside
/// `stop`, only `start` itself is searched.
pub fn find_nearest_bundle_file(start: &Path, stop: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if let Some(found) = definition_file_in(current) {
            return Some(found);
        }
        if current == stop || !current.starts_with(stop) {
            return None;
        }
        current = current.parent()?;
    }
}
