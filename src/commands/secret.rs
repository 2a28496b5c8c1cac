//! Handlers for `nova secret`: the encrypted per-project secret file.
//!
//! Every subcommand runs the same gate first: read the passphrase, check it
//! against configuration, then derive the project from the working directory.
//! Nothing touches the store until both pass.

use std::fmt;
use std::path::Path;

use zeroize::Zeroizing;

use crate::config::Config;
use crate::crypto::Cipher;
use crate::db::{Repository, SecretInput};
use crate::error::Result;
use crate::project::ProjectResolver;
use crate::utils::{PassphraseSource, render_table};

/// What a secret subcommand did. Displayed verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOutcome {
    IncorrectKey,
    InvalidProjectPath,
    NoSecret,
    DecodeFailed(String),
    Written(String),
    WriteFailed(String),
    Unreadable(String),
    Stored(String),
    StoreFailed(String),
    Identical(String),
    NonIdentical(String),
    Missing(String),
    Listed { path: String, length: usize },
}

impl fmt::Display for SecretOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretOutcome::IncorrectKey => write!(f, "Incorrect key"),
            SecretOutcome::InvalidProjectPath => write!(f, "Invalid project path"),
            SecretOutcome::NoSecret => write!(f, "No secret found for this project"),
            SecretOutcome::DecodeFailed(e) => write!(f, "Unable to decrypt secret: {}", e),
            SecretOutcome::Written(path) => write!(f, "Wrote to file: {}", path),
            SecretOutcome::WriteFailed(path) => write!(f, "Unable to write file: {}", path),
            SecretOutcome::Unreadable(path) => write!(f, "Unable to read file: {}", path),
            SecretOutcome::Stored(path) => write!(f, "Secret stored: {}", path),
            SecretOutcome::StoreFailed(e) => write!(f, "Unable to store secret: {}", e),
            SecretOutcome::Identical(path) => write!(f, "Identical secret: {}", path),
            SecretOutcome::NonIdentical(path) => write!(f, "Non-identical secret: {}", path),
            SecretOutcome::Missing(path) => write!(f, "Non-existent secret: {}", path),
            SecretOutcome::Listed { path, length } => write!(
                f,
                "{}",
                render_table(
                    &["Path", "Content Length"],
                    &[vec![path.clone(), length.to_string()]]
                )
            ),
        }
    }
}

/// Passphrase and project that made it through the gate.
struct Unlocked {
    cipher: Cipher,
    passphrase: Zeroizing<String>,
    project: String,
}

enum Gate {
    Open(Unlocked),
    Closed(SecretOutcome),
}

fn unlock(config: &Config, prompt: &dyn PassphraseSource, cwd: &Path) -> Result<Gate> {
    let cipher = config.cipher()?;
    let check = config.passphrase_check()?;

    let passphrase = Zeroizing::new(prompt.read_passphrase("Enter password")?);
    if !check.verify(&cipher, &passphrase) {
        tracing::debug!("passphrase rejected");
        return Ok(Gate::Closed(SecretOutcome::IncorrectKey));
    }

    let resolver = ProjectResolver::new(&config.projects_dir())?;
    let Some(project) = resolver.resolve(cwd) else {
        return Ok(Gate::Closed(SecretOutcome::InvalidProjectPath));
    };

    Ok(Gate::Open(Unlocked {
        cipher,
        passphrase,
        project,
    }))
}

fn report(outcome: SecretOutcome) -> Result<SecretOutcome> {
    println!("{}", outcome);
    Ok(outcome)
}

/// Handle `nova secret clone`: decrypt the project's secret and write it to
/// its recorded path, overwriting whatever is there.
pub async fn handle_secret_clone(
    config: &Config,
    repo: &Repository,
    prompt: &dyn PassphraseSource,
    cwd: &Path,
) -> Result<SecretOutcome> {
    let unlocked = match unlock(config, prompt, cwd)? {
        Gate::Open(unlocked) => unlocked,
        Gate::Closed(outcome) => return report(outcome),
    };

    let Some(secret) = repo.find_secret(&unlocked.project)? else {
        return report(SecretOutcome::NoSecret);
    };

    let plaintext = match unlocked.cipher.decrypt(&secret.content, &unlocked.passphrase) {
        Ok(plaintext) => Zeroizing::new(plaintext),
        Err(e) => return report(SecretOutcome::DecodeFailed(e.to_string())),
    };

    let target = cwd.join(&secret.path);
    match tokio::fs::write(&target, plaintext.as_bytes()).await {
        Ok(()) => report(SecretOutcome::Written(secret.path)),
        Err(e) => {
            tracing::warn!(path = %target.display(), "write failed: {}", e);
            report(SecretOutcome::WriteFailed(secret.path))
        }
    }
}

/// Handle `nova secret set <path>`: encrypt a local file and store it as the
/// project's secret, replacing any previous one.
pub async fn handle_secret_set(
    config: &Config,
    repo: &Repository,
    prompt: &dyn PassphraseSource,
    cwd: &Path,
    path: &str,
) -> Result<SecretOutcome> {
    let unlocked = match unlock(config, prompt, cwd)? {
        Gate::Open(unlocked) => unlocked,
        Gate::Closed(outcome) => return report(outcome),
    };

    let content = match tokio::fs::read_to_string(cwd.join(path)).await {
        Ok(content) => Zeroizing::new(content),
        Err(e) => {
            tracing::debug!(path, "read failed: {}", e);
            return report(SecretOutcome::Unreadable(path.to_string()));
        }
    };

    let envelope = unlocked.cipher.encrypt(&content, &unlocked.passphrase)?;
    let input = SecretInput {
        project: unlocked.project,
        path: path.to_string(),
        content: envelope,
    };

    match repo.upsert_secret(&input) {
        Ok(stored) => report(SecretOutcome::Stored(stored.path)),
        Err(e) => report(SecretOutcome::StoreFailed(e.to_string())),
    }
}

/// Handle `nova secret check`: compare the stored secret with the local file.
pub async fn handle_secret_check(
    config: &Config,
    repo: &Repository,
    prompt: &dyn PassphraseSource,
    cwd: &Path,
) -> Result<SecretOutcome> {
    let unlocked = match unlock(config, prompt, cwd)? {
        Gate::Open(unlocked) => unlocked,
        Gate::Closed(outcome) => return report(outcome),
    };

    let Some(secret) = repo.find_secret(&unlocked.project)? else {
        return report(SecretOutcome::NoSecret);
    };

    let stored = match unlocked.cipher.decrypt(&secret.content, &unlocked.passphrase) {
        Ok(plaintext) => Zeroizing::new(plaintext),
        Err(e) => return report(SecretOutcome::DecodeFailed(e.to_string())),
    };

    match tokio::fs::read_to_string(cwd.join(&secret.path)).await {
        Ok(local) if local == *stored => report(SecretOutcome::Identical(secret.path)),
        Ok(_) => report(SecretOutcome::NonIdentical(secret.path)),
        Err(_) => report(SecretOutcome::Missing(secret.path)),
    }
}

/// Handle `nova secret list`: show the stored path and the decrypted length
/// without printing the content.
pub async fn handle_secret_list(
    config: &Config,
    repo: &Repository,
    prompt: &dyn PassphraseSource,
    cwd: &Path,
) -> Result<SecretOutcome> {
    let unlocked = match unlock(config, prompt, cwd)? {
        Gate::Open(unlocked) => unlocked,
        Gate::Closed(outcome) => return report(outcome),
    };

    let Some(secret) = repo.find_secret(&unlocked.project)? else {
        return report(SecretOutcome::NoSecret);
    };

    match unlocked.cipher.decrypt(&secret.content, &unlocked.passphrase) {
        Ok(plaintext) => {
            let plaintext = Zeroizing::new(plaintext);
            report(SecretOutcome::Listed {
                path: secret.path,
                length: plaintext.len(),
            })
        }
        Err(e) => report(SecretOutcome::DecodeFailed(e.to_string())),
    }
}
