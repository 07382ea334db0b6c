//! File system errors

use super::BundlekitError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> BundlekitError {
    BundlekitError::FileNotFound { path: path.into() }
}

/// Creates a file read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> BundlekitError {
    BundlekitError::IoError {
        message: message.into(),
    }
}
