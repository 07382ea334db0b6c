//! Git operation errors

use super::BundlekitError;

/// Creates a generic git operation error
pub fn operation_failed(message: impl Into<String>) -> BundlekitError {
    BundlekitError::GitOperationFailed {
        message: message.into(),
    }
}

/// Creates a clone failure error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a ref resolution error
pub fn ref_resolve_failed(git_ref: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::GitRefResolveFailed {
        git_ref: git_ref.into(),
        reason: reason.into(),
    }
}

/// Creates a checkout error
pub fn checkout_failed(sha: impl Into<String>, reason: impl Into<String>) -> BundlekitError {
    BundlekitError::GitCheckoutFailed {
        sha: sha.into(),
        reason: reason.into(),
    }
}
