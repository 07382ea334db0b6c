//! Cache errors

use super::BundlekitError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> BundlekitError {
    BundlekitError::CacheOperationFailed {
        message: message.into(),
    }
}
