//! Bundle sources
//!
//! A source string is parsed into a [`ParsedUri`] and handed to the first
//! [`SourceHandler`] that claims it. Handlers turn it into a
//! [`ResolvedSource`]: the concrete local path to load plus the root of the
//! repository or directory it was found in.
//!
//! ## Module Organization
//!
//! - `uri.rs`: source URI grammar
//! - `resolved.rs`: resolution result and source-root detection
//! - `handler.rs`: handler trait and ordered handler list
//! - `file.rs`: local paths and `file://`
//! - `git.rs`: `git+<transport>://` repositories fetched into the cache

pub mod file;
pub mod git;
pub mod handler;
pub mod resolved;
pub mod uri;

pub use file::FileSourceHandler;
pub use git::GitSourceHandler;
pub use handler::{SourceHandler, SourceHandlers};
pub use resolved::{ResolvedSource, detect_source_root};
pub use uri::ParsedUri;
