//! Bundle-related errors

use super::BundlekitError;

/// Creates a bundle not found error naming the source URI and the missing path
pub fn not_found(uri: impl Into<String>, path: impl Into<String>) -> BundlekitError {
    BundlekitError::BundleNotFound {
        uri: uri.into(),
        path: path.into(),
    }
}

/// Creates a bundle definition parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::BundleParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Attaches the source URI to a definition that failed to read, parse or validate
pub fn invalid_definition(uri: impl Into<String>, source: BundlekitError) -> BundlekitError {
    BundlekitError::InvalidDefinition {
        uri: uri.into(),
        source: Box::new(source),
    }
}

/// Creates a bundle validation failed error
pub fn validation_failed(message: impl Into<String>) -> BundlekitError {
    BundlekitError::BundleValidationFailed {
        message: message.into(),
    }
}
