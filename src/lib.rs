//! Bundlekit - bundle resolution and @mention context loading
//!
//! Resolves bundle source URIs (local paths and git repositories) into
//! composed [`bundle::Bundle`] values tracked by a [`registry::BundleRegistry`],
//! and expands `@mentions` in free text into deduplicated, attributed context.

pub mod bundle;
pub mod cache;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod mentions;
pub mod path_utils;
pub mod progress;
pub mod registry;
pub mod source;

pub use bundle::Bundle;
pub use config::Settings;
pub use error::{BundlekitError, Result};
pub use mentions::{
    BaseMentionResolver, ContentDeduplicator, ContextFile, LoadOptions, MentionResolver,
    MentionResult, format_context_block, load_mentions, parse_mentions,
};
pub use registry::{BundleRegistry, BundleState};
pub use source::{ParsedUri, ResolvedSource, SourceHandler, SourceHandlers};
