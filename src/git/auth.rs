//! Credential callbacks for libgit2
//!
//! Credentials come from git's own configuration: the SSH agent, keys in
//! `~/.ssh/`, and configured credential helpers. Bundlekit never prompts.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

/// Private keys tried in order when the agent has none
const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_from_disk(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir()
        .ok_or_else(|| auth_error("home directory not found"))?
        .join(".ssh");

    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private, _)| private.exists())
        .find_map(|(private, public)| {
            let public = public.exists().then_some(public);
            Cred::ssh_key(username, public.as_deref(), &private, None).ok()
        })
        .ok_or_else(|| auth_error("no usable SSH key found"))
}

fn ssh_credentials(username_from_url: Option<&str>) -> Result<Cred, Error> {
    let username = username_from_url.unwrap_or("git");
    Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_from_disk(username))
}

fn helper_credentials(url: &str, username_from_url: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;

    Cred::credential_helper(&config, url, username_from_url)
        .or_else(|_| Cred::userpass_plaintext(username_from_url.unwrap_or(""), ""))
        .map_err(|_| auth_error("authentication failed"))
}

/// Install credential callbacks on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    callbacks.credentials(|url, username_from_url, allowed| {
        tracing::trace!(url, ?allowed, "git requested credentials");
        if allowed.contains(CredentialType::DEFAULT) {
            Cred::default()
        } else if allowed.contains(CredentialType::SSH_KEY) {
            ssh_credentials(username_from_url)
        } else if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            helper_credentials(url, username_from_url)
        } else {
            Err(auth_error("authentication failed"))
        }
    });
}
