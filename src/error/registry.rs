//! Registry persistence errors

use super::BundlekitError;

/// Creates a registry read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::RegistryReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a registry write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::RegistryWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an error for a name missing from the registry
pub fn not_registered(name: impl Into<String>) -> BundlekitError {
    BundlekitError::NotRegistered { name: name.into() }
}

/// Creates an error for a name already held by a different source
pub fn name_conflict(
    name: impl Into<String>,
    existing: impl Into<String>,
    source_uri: impl Into<String>,
) -> BundlekitError {
    BundlekitError::NameConflict {
        name: name.into(),
        existing: existing.into(),
        source_uri: source_uri.into(),
    }
}
