//! Error types and handling for bundlekit
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle definition errors
//! - [`source`]: Source URI errors
//! - [`git`]: Git operation errors
//! - [`fs`]: File system errors
//! - [`cache`]: Cache errors
//! - [`registry`]: Registry persistence errors

pub mod bundle;
pub mod cache;
pub mod fs;
pub mod git;
pub mod registry;
pub mod source;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bundlekit operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundlekitError {
    // Source errors
    #[error("Invalid source URI '{uri}': {reason}")]
    #[diagnostic(
        code(bundlekit::source::invalid_uri),
        help(
            "Valid forms: /abs/path, ./rel/path, file:///path, git+https://host/org/repo@ref, \
             optionally followed by #subdirectory=<path>"
        )
    )]
    InvalidUri { uri: String, reason: String },

    #[error("No source handler supports '{uri}' (scheme '{scheme}')")]
    #[diagnostic(
        code(bundlekit::source::unsupported),
        help("Supported schemes: file, git+https, git+http, git+ssh, git+file")
    )]
    UnsupportedSource { uri: String, scheme: String },

    // Bundle errors
    #[error("Bundle not found for '{uri}': {path} does not exist")]
    #[diagnostic(
        code(bundlekit::bundle::not_found),
        help("Check that the path exists and contains a bundle.md or bundle.yaml")
    )]
    BundleNotFound { uri: String, path: String },

    #[error("Failed to parse bundle definition {path}: {reason}")]
    #[diagnostic(code(bundlekit::bundle::parse_failed))]
    BundleParseFailed { path: String, reason: String },

    #[error("Invalid bundle definition for '{uri}': {source}")]
    #[diagnostic(code(bundlekit::bundle::invalid_definition))]
    InvalidDefinition {
        uri: String,
        source: Box<BundlekitError>,
    },

    #[error("Bundle validation failed: {message}")]
    #[diagnostic(code(bundlekit::bundle::validation_failed))]
    BundleValidationFailed { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(bundlekit::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(bundlekit::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(bundlekit::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(bundlekit::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(bundlekit::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(bundlekit::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(bundlekit::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundlekit::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(bundlekit::cache::operation_failed))]
    CacheOperationFailed { message: String },

    // Registry errors
    #[error("Failed to read registry {path}: {reason}")]
    #[diagnostic(
        code(bundlekit::registry::read_failed),
        help("Delete or repair the registry file; it is rebuilt by 'bundlekit register'")
    )]
    RegistryReadFailed { path: String, reason: String },

    #[error("Failed to write registry {path}: {reason}")]
    #[diagnostic(code(bundlekit::registry::write_failed))]
    RegistryWriteFailed { path: String, reason: String },

    #[error("Bundle '{name}' is not registered")]
    #[diagnostic(
        code(bundlekit::registry::not_registered),
        help("Run 'bundlekit list' to see registered bundles")
    )]
    NotRegistered { name: String },

    #[error("Bundle name '{name}' already belongs to '{existing}', not '{source_uri}'")]
    #[diagnostic(
        code(bundlekit::registry::name_conflict),
        help("Unregister '{name}' first, or register the new source under another name and load it by that name")
    )]
    NameConflict {
        name: String,
        existing: String,
        source_uri: String,
    },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(bundlekit::config::invalid),
        help("Set BUNDLEKIT_HOME or pass --home to choose a state directory")
    )]
    ConfigInvalid { message: String },
}

impl From<std::io::Error> for BundlekitError {
    fn from(err: std::io::Error) -> Self {
        BundlekitError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BundlekitError {
    fn from(err: serde_yaml::Error) -> Self {
        BundlekitError::BundleParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundlekitError {
    fn from(err: serde_json::Error) -> Self {
        BundlekitError::RegistryReadFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for BundlekitError {
    fn from(err: git2::Error) -> Self {
        BundlekitError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundlekitError>;
