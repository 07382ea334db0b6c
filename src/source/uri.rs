//! Source URI parsing
//!
//! Supported forms:
//! - `/abs/path`, `./rel/path`, `../rel/path`, `rel/path` - local paths
//! - `file:///abs/path` - local path with explicit scheme
//! - `git+https://host/org/repo[@ref]` - remote repository (also `git+http`,
//!   `git+ssh`, `git+file`)
//! - `<scheme>:<rest>` - any other scheme, for custom source handlers
//!
//! Any of the above may end with `#subdirectory=<path>` to scope the load to a
//! directory inside the source.

use std::fmt;

use crate::error::{Result, source as source_err};

/// Scheme assigned to plain paths and `file://` URIs
pub const FILE_SCHEME: &str = "file";

const GIT_SCHEME_PREFIX: &str = "git+";
const SUBDIRECTORY_FRAGMENT: &str = "subdirectory=";

/// A parsed source URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedUri {
    /// Scheme tag (`file`, `git+https`, ...)
    pub scheme: String,
    /// Path part: a filesystem path for `file`, `host/repo` for git schemes
    pub path: String,
    /// Git ref from a trailing `@ref` on git schemes
    pub git_ref: Option<String>,
    /// Directory inside the source from `#subdirectory=`
    pub subpath: Option<String>,
}

impl ParsedUri {
    /// Parse a source string
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(source_err::invalid_uri(input, "empty source"));
        }

        let (body, subpath) = split_fragment(input)?;
        if body.is_empty() {
            return Err(source_err::invalid_uri(input, "missing path before fragment"));
        }

        let mut parsed = if let Some(rest) = body.strip_prefix("file://") {
            parse_file_body(input, rest)?
        } else if body.starts_with(GIT_SCHEME_PREFIX) {
            parse_git_body(input, body)?
        } else if let Some((scheme, rest)) = split_scheme(body) {
            let rest = rest.strip_prefix("//").unwrap_or(rest);
            if rest.is_empty() {
                return Err(source_err::invalid_uri(input, "empty path"));
            }
            Self::new(scheme, rest)
        } else {
            Self::new(FILE_SCHEME, body)
        };

        parsed.subpath = subpath;
        Ok(parsed)
    }

    fn new(scheme: &str, path: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            path: path.to_string(),
            git_ref: None,
            subpath: None,
        }
    }

    /// Whether this names a local file or directory
    pub fn is_file(&self) -> bool {
        self.scheme == FILE_SCHEME
    }

    /// Whether this names a git repository
    pub fn is_git(&self) -> bool {
        self.scheme.starts_with(GIT_SCHEME_PREFIX)
    }

    /// Transport part of a git scheme (`https` for `git+https`)
    pub fn git_transport(&self) -> Option<&str> {
        self.scheme.strip_prefix(GIT_SCHEME_PREFIX)
    }
}

impl fmt::Display for ParsedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_file() {
            if self.path.starts_with('/') {
                write!(f, "file://{}", self.path)?;
            } else {
                f.write_str(&self.path)?;
            }
        } else if self.is_git() {
            write!(f, "{}://{}", self.scheme, self.path)?;
            if let Some(git_ref) = &self.git_ref {
                write!(f, "@{git_ref}")?;
            }
        } else {
            write!(f, "{}:{}", self.scheme, self.path)?;
        }
        if let Some(subpath) = &self.subpath {
            write!(f, "#{SUBDIRECTORY_FRAGMENT}{subpath}")?;
        }
        Ok(())
    }
}

/// Split off and validate the `#subdirectory=` fragment
fn split_fragment(input: &str) -> Result<(&str, Option<String>)> {
    let Some((body, fragment)) = input.split_once('#') else {
        return Ok((input, None));
    };

    let subpath = fragment.strip_prefix(SUBDIRECTORY_FRAGMENT).ok_or_else(|| {
        source_err::invalid_uri(
            input,
            format!("unsupported fragment '#{fragment}' (only #subdirectory= is allowed)"),
        )
    })?;

    let subpath = subpath.trim_matches('/');
    if subpath.is_empty() {
        return Err(source_err::invalid_uri(input, "empty #subdirectory= value"));
    }
    if subpath.split('/').any(|segment| segment == "..") {
        return Err(source_err::invalid_uri(
            input,
            "#subdirectory= must stay inside the source",
        ));
    }

    Ok((body, Some(subpath.to_string())))
}

/// Recognise `<scheme>:` where scheme is `[a-z][a-z0-9+.-]*` and longer than
/// one character (a single letter is a Windows drive)
fn split_scheme(body: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = body.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = scheme.len() > 1
        && first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+.-".contains(c));
    valid.then_some((scheme, rest))
}

fn parse_file_body(input: &str, rest: &str) -> Result<ParsedUri> {
    // file://localhost/abs is the same as file:///abs
    let path = rest
        .strip_prefix("localhost")
        .filter(|p| p.starts_with('/'))
        .unwrap_or(rest);
    if path.is_empty() {
        return Err(source_err::invalid_uri(input, "empty file path"));
    }
    Ok(ParsedUri::new(FILE_SCHEME, path))
}

fn parse_git_body(input: &str, body: &str) -> Result<ParsedUri> {
    let (scheme, rest) = body
        .split_once("://")
        .ok_or_else(|| source_err::invalid_uri(input, "git sources need '<scheme>://'"))?;
    if scheme.len() <= GIT_SCHEME_PREFIX.len() {
        return Err(source_err::invalid_uri(input, "missing git transport"));
    }

    // A ref is an '@' in the last path segment; '@' in the host part is a user.
    let last_slash = rest.rfind('/');
    let (location, git_ref) = match rest.rfind('@') {
        Some(at) if last_slash.is_some_and(|slash| at > slash) => {
            (&rest[..at], Some(&rest[at + 1..]))
        }
        _ => (rest, None),
    };
    if git_ref.is_some_and(str::is_empty) {
        return Err(source_err::invalid_uri(input, "empty git ref after '@'"));
    }

    let location = location.trim_end_matches('/');
    if scheme == "git+file" {
        if location.is_empty() {
            return Err(source_err::invalid_uri(input, "empty repository path"));
        }
    } else {
        let (host, repo) = location.split_once('/').unwrap_or((location, ""));
        if host.is_empty() || repo.is_empty() {
            return Err(source_err::invalid_uri(
                input,
                "expected <host>/<repository path>",
            ));
        }
    }

    let mut parsed = ParsedUri::new(scheme, location);
    parsed.git_ref = git_ref.map(str::to_string);
    Ok(parsed)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedUri {
        ParsedUri::parse(input).expect("valid uri")
    }

    #[test]
    fn test_parse_plain_paths() {
        for input in ["/abs/bundle", "./rel/bundle", "../up/bundle", "bundles/mine"] {
            let parsed = parse(input);
            assert!(parsed.is_file(), "{input}");
            assert_eq!(parsed.path, input);
            assert_eq!(parsed.subpath, None);
        }
    }

    #[test]
    fn test_parse_windows_drive_is_path() {
        let parsed = parse(r"C:\bundles\mine");
        assert!(parsed.is_file());
        assert_eq!(parsed.path, r"C:\bundles\mine");
    }

    #[test]
    fn test_parse_file_uri() {
        let parsed = parse("file:///tmp/bundle");
        assert!(parsed.is_file());
        assert_eq!(parsed.path, "/tmp/bundle");
        assert_eq!(parse("file://localhost/tmp/bundle").path, "/tmp/bundle");
    }

    #[test]
    fn test_parse_file_uri_with_subdirectory() {
        let parsed = parse("file:///repo#subdirectory=behaviors/recipes");
        assert_eq!(parsed.path, "/repo");
        assert_eq!(parsed.subpath.as_deref(), Some("behaviors/recipes"));
    }

    #[test]
    fn test_parse_git_https_with_ref_and_subdirectory() {
        let parsed = parse("git+https://github.com/org/repo@main#subdirectory=behaviors/x");
        assert!(parsed.is_git());
        assert!(!parsed.is_file());
        assert_eq!(parsed.scheme, "git+https");
        assert_eq!(parsed.git_transport(), Some("https"));
        assert_eq!(parsed.path, "github.com/org/repo");
        assert_eq!(parsed.git_ref.as_deref(), Some("main"));
        assert_eq!(parsed.subpath.as_deref(), Some("behaviors/x"));
    }

    #[test]
    fn test_parse_git_without_ref() {
        let parsed = parse("git+https://github.com/org/repo");
        assert_eq!(parsed.git_ref, None);
        assert_eq!(parsed.path, "github.com/org/repo");
    }

    #[test]
    fn test_parse_git_ssh_user_is_not_ref() {
        let parsed = parse("git+ssh://git@github.com/org/repo.git@v1.2.0");
        assert_eq!(parsed.path, "git@github.com/org/repo.git");
        assert_eq!(parsed.git_ref.as_deref(), Some("v1.2.0"));

        let parsed = parse("git+ssh://git@github.com/org/repo.git");
        assert_eq!(parsed.path, "git@github.com/org/repo.git");
        assert_eq!(parsed.git_ref, None);
    }

    #[test]
    fn test_parse_git_file() {
        let parsed = parse("git+file:///srv/repos/bundles@dev");
        assert_eq!(parsed.scheme, "git+file");
        assert_eq!(parsed.path, "/srv/repos/bundles");
        assert_eq!(parsed.git_ref.as_deref(), Some("dev"));
    }

    #[test]
    fn test_parse_custom_scheme() {
        let parsed = parse("zip:bundles/archive.zip");
        assert_eq!(parsed.scheme, "zip");
        assert_eq!(parsed.path, "bundles/archive.zip");
        assert!(!parsed.is_file());
        assert!(!parsed.is_git());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for input in [
            "",
            "   ",
            "#subdirectory=x",
            "/repo#ref=main",
            "/repo#subdirectory=",
            "/repo#subdirectory=../escape",
            "git+https://github.com",
            "git+https:github.com/org/repo",
            "git+://github.com/org/repo",
            "git+https://github.com/org/repo@",
            "zip:",
            "file://",
        ] {
            let err = ParsedUri::parse(input).expect_err(input);
            assert!(
                matches!(err, crate::error::BundlekitError::InvalidUri { .. }),
                "{input}: {err}"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for input in [
            "file:///tmp/bundle",
            "./rel",
            "git+https://github.com/org/repo@main#subdirectory=a/b",
            "git+file:///srv/repo",
            "zip:archive.zip",
        ] {
            assert_eq!(parse(input).to_string(), input);
        }
    }
}
