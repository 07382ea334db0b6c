//! `@mention` resolution
//!
//! Free text such as a prompt or an instruction can reference files with
//! `@path/to/file` or `@bundle:context-name`. This module finds those mentions
//! ([`parser`]), maps them to files ([`resolver`]), loads the files and the
//! mentions inside them ([`loader`]), folds identical content together while
//! keeping every path that produced it ([`deduplicator`]) and renders the
//! result as a context block ([`format`]).

pub mod deduplicator;
pub mod format;
pub mod loader;
pub mod models;
pub mod parser;
pub mod resolver;

pub use deduplicator::{ContentDeduplicator, content_hash};
pub use format::{format_context_block, mention_paths};
pub use loader::{LoadOptions, load_mentions};
pub use models::{ContextFile, MentionResult};
pub use parser::parse_mentions;
pub use resolver::{BaseMentionResolver, MentionResolver};
