//! Source URI errors

use super::BundlekitError;

/// Creates an invalid URI error
pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::InvalidUri {
        uri: uri.into(),
        reason: reason.into(),
    }
}

/// Creates an error for a URI no registered handler claims
pub fn unsupported(uri: impl Into<String>, scheme: impl Into<String>) -> BundlekitError {
    BundlekitError::UnsupportedSource {
        uri: uri.into(),
        scheme: scheme.into(),
    }
}
