//! Cache listing, statistics and removal

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::paths::is_staging_name;
use super::populate::{EntryMeta, read_entry_meta};
use crate::error::{Result, cache as cache_err};

/// One cached source
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// Directory name (`<repo-slug>-<key-hash>`)
    pub name: String,
    pub path: PathBuf,
    /// Fetch metadata, absent for entries written by hand
    pub meta: Option<EntryMeta>,
    /// Total size in bytes
    pub size: u64,
}

impl CachedEntry {
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache entries
    pub entries: usize,
    /// Total size in bytes
    pub total_size: u64,
}

impl CacheStats {
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Human-readable byte count
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KB {
        format!("{bytes} B")
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.1} MB", size / (KB * KB))
    } else {
        format!("{:.1} GB", size / (KB * KB * KB))
    }
}

fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

fn read_cache_dir(cache_dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let entries = fs::read_dir(cache_dir).map_err(|e| {
        cache_err::operation_failed(format!(
            "Failed to read cache directory {}: {e}",
            cache_dir.display()
        ))
    })?;
    entries
        .map(|entry| {
            entry.map_err(|e| cache_err::operation_failed(format!("Failed to read entry: {e}")))
        })
        .collect()
}

/// List committed cache entries, sorted by name
pub fn list_entries(cache_dir: &Path) -> Result<Vec<CachedEntry>> {
    if !cache_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<CachedEntry> = read_cache_dir(cache_dir)?
        .into_iter()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            if is_staging_name(&name) {
                return None;
            }
            let path = e.path();
            Some(CachedEntry {
                meta: read_entry_meta(&path),
                size: dir_size(&path),
                name,
                path,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Aggregate statistics over committed entries
pub fn cache_stats(cache_dir: &Path) -> Result<CacheStats> {
    let entries = list_entries(cache_dir)?;
    Ok(CacheStats {
        entries: entries.len(),
        total_size: entries.iter().map(|e| e.size).sum(),
    })
}

/// Remove every entry, including leftover staging directories.
///
/// Returns the number of directories removed.
pub fn clear_cache(cache_dir: &Path) -> Result<usize> {
    if !cache_dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in read_cache_dir(cache_dir)? {
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| {
                cache_err::operation_failed(format!("Failed to remove {}: {e}", path.display()))
            })?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Remove one entry by directory name
pub fn remove_entry(cache_dir: &Path, name: &str) -> Result<()> {
    let path = cache_dir.join(name);
    let is_direct_child = path.parent() == Some(cache_dir) && !name.contains(['/', '\\']);
    if !is_direct_child || !path.is_dir() {
        return Err(cache_err::operation_failed(format!(
            "Entry not found in cache: {name}"
        )));
    }
    fs::remove_dir_all(&path).map_err(|e| {
        cache_err::operation_failed(format!("Failed to remove cached entry {name}: {e}"))
    })
}
