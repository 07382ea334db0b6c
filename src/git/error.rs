//! Readable messages for libgit2 failures

use git2::{Error, ErrorClass};

/// Broad failure categories recognised from libgit2 messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    NotFound,
    Auth,
    Permission,
    Network,
    Certificate,
}

type Matcher = fn(&str, ErrorClass) -> bool;

/// First matching row wins
const CLASSIFIERS: &[(Matcher, Failure)] = &[
    (
        |msg, _| msg.contains("not found") || msg.contains("404") || msg.contains("does not exist"),
        Failure::NotFound,
    ),
    (
        |msg, _| msg.contains("authentication") || msg.contains("credentials"),
        Failure::Auth,
    ),
    (
        |msg, _| msg.contains("permission denied") || msg.contains("access denied"),
        Failure::Permission,
    ),
    (
        |msg, _| {
            ["connection", "network", "timed out", "timeout", "resolve host"]
                .iter()
                .any(|needle| msg.contains(needle))
        },
        Failure::Network,
    ),
    (
        |msg, class| class == ErrorClass::Http && (msg.contains("certificate") || msg.contains("ssl")),
        Failure::Certificate,
    ),
];

fn classify(message: &str, class: ErrorClass) -> Option<Failure> {
    CLASSIFIERS
        .iter()
        .find(|(matches, _)| matches(message, class))
        .map(|(_, failure)| *failure)
}

/// Turn a libgit2 error into a short message for users
pub fn interpret_git_error(err: &Error) -> String {
    let lowered = err.message().to_lowercase();
    match classify(&lowered, err.class()) {
        Some(Failure::NotFound) => "Repository not found".to_string(),
        Some(Failure::Auth) => "Authentication failed".to_string(),
        Some(Failure::Permission) => "Permission denied".to_string(),
        Some(Failure::Network) => format!("Network error: {}", err.message()),
        Some(Failure::Certificate) => format!("TLS error: {}", err.message()),
        None => match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::ErrorCode;

    fn err(message: &str, class: ErrorClass) -> Error {
        Error::new(ErrorCode::GenericError, class, message)
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            interpret_git_error(&err("remote: Repository not found", ErrorClass::Http)),
            "Repository not found"
        );
    }

    #[test]
    fn test_auth() {
        assert_eq!(
            interpret_git_error(&err("too many authentication attempts", ErrorClass::Ssh)),
            "Authentication failed"
        );
    }

    #[test]
    fn test_network_keeps_detail() {
        let msg = interpret_git_error(&err("failed to resolve host 'nohost'", ErrorClass::Net));
        assert!(msg.starts_with("Network error"));
        assert!(msg.contains("nohost"));
    }

    #[test]
    fn test_unclassified_ssh() {
        assert_eq!(
            interpret_git_error(&err("handshake failed", ErrorClass::Ssh)),
            "SSH error: handshake failed"
        );
    }

    #[test]
    fn test_unclassified_other() {
        assert_eq!(
            interpret_git_error(&err("odd failure", ErrorClass::Odb)),
            "odd failure"
        );
    }
}
