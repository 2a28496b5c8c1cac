//! Configuration type definitions.

use knuffel::Decode;
use std::fmt;
use std::path::PathBuf;

use crate::crypto::{Cipher, PassphraseCheck, parse_iv};
use crate::error::{self, NovaError};

/// Plain passphrase compared against the one typed at the prompt.
pub const ENV_PASSPHRASE: &str = "NOVA_PASSPHRASE";
/// Envelope of the passphrase encrypted under itself (alternative verifier).
pub const ENV_ENCRYPTED_KEY: &str = "AES__ENCRYPTED_KEY";
/// Process-wide CBC initialization vector.
pub const ENV_IV: &str = "AES__IV";
/// Store location.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Root directory whose direct children are projects.
pub const ENV_PROJECTS_DIR: &str = "PROJECTS_DIR";

/// Expand tilde (~) prefix to the user's home directory.
/// Handles both "~" alone and "~/path/to/something" patterns.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Top-level structure of nova.kdl.
#[derive(Debug, Decode, Clone, Default)]
pub struct ConfigFile {
    #[knuffel(child)]
    pub defaults: Option<Defaults>,
}

/// `defaults database="..." projects_dir="..." editor="..."`
#[derive(Debug, Decode, Clone, Default)]
pub struct Defaults {
    #[knuffel(property)]
    pub database: Option<String>,

    #[knuffel(property(name = "projects_dir"))]
    pub projects_dir: Option<String>,

    #[knuffel(property)]
    pub editor: Option<String>,
}

/// Values taken from the process environment. Secrets only ever come from here.
#[derive(Clone, Default)]
pub struct Environment {
    pub passphrase: Option<String>,
    pub encrypted_key: Option<String>,
    pub iv: Option<String>,
    pub database_url: Option<String>,
    pub projects_dir: Option<String>,
    pub editor: Option<String>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Environment")
            .field("passphrase", &redact(&self.passphrase))
            .field("encrypted_key", &redact(&self.encrypted_key))
            .field("iv", &redact(&self.iv))
            .field("database_url", &self.database_url)
            .field("projects_dir", &self.projects_dir)
            .field("editor", &self.editor)
            .finish()
    }
}

impl Environment {
    /// Read all nova variables from the current process. Empty values count as unset.
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            passphrase: var(ENV_PASSPHRASE),
            encrypted_key: var(ENV_ENCRYPTED_KEY),
            iv: var(ENV_IV),
            database_url: var(ENV_DATABASE_URL),
            projects_dir: var(ENV_PROJECTS_DIR),
            editor: var("EDITOR"),
        }
    }
}

/// Resolved configuration: nova.kdl defaults overlaid with the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: Option<Defaults>,
    pub env: Environment,
}

impl Config {
    pub fn new(defaults: Option<Defaults>, env: Environment) -> Self {
        Self { defaults, env }
    }

    fn file_value(&self, pick: impl Fn(&Defaults) -> Option<String>) -> Option<String> {
        self.defaults.as_ref().and_then(pick)
    }

    /// Get the editor: EDITOR, then nova.kdl, then "vi"
    pub fn editor(&self) -> String {
        self.env
            .editor
            .clone()
            .or_else(|| self.file_value(|d| d.editor.clone()))
            .unwrap_or_else(|| "vi".into())
    }

    /// Get the projects root: PROJECTS_DIR, then nova.kdl, then ~/Projects.
    pub fn projects_dir(&self) -> PathBuf {
        self.env
            .projects_dir
            .clone()
            .or_else(|| self.file_value(|d| d.projects_dir.clone()))
            .map(|p| expand_tilde(&p))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join("Projects"))
                    .unwrap_or_else(|| PathBuf::from("Projects"))
            })
    }

    /// Get the SQLite database path: DATABASE_URL, then nova.kdl, then
    /// ~/.config/nova/nova.db.
    pub fn database_path(&self) -> error::Result<PathBuf> {
        match self
            .env
            .database_url
            .clone()
            .or_else(|| self.file_value(|d| d.database.clone()))
        {
            Some(url) => parse_database_url(&url),
            None => Ok(dirs::home_dir()
                .map(|h| h.join(".config/nova/nova.db"))
                .unwrap_or_else(|| PathBuf::from("nova.db"))),
        }
    }

    /// Build the cipher from AES__IV.
    pub fn cipher(&self) -> error::Result<Cipher> {
        let raw = self
            .env
            .iv
            .as_deref()
            .ok_or_else(|| NovaError::config(format!("{} must be set", ENV_IV)))?;
        Ok(Cipher::new(parse_iv(raw)?))
    }

    /// How to validate the passphrase typed at the prompt. NOVA_PASSPHRASE
    /// takes precedence over AES__ENCRYPTED_KEY.
    pub fn passphrase_check(&self) -> error::Result<PassphraseCheck> {
        if let Some(passphrase) = &self.env.passphrase {
            return Ok(PassphraseCheck::Plain(passphrase.clone()));
        }
        if let Some(envelope) = &self.env.encrypted_key {
            return Ok(PassphraseCheck::Envelope(envelope.clone()));
        }
        Err(NovaError::config(format!(
            "{} or {} must be set",
            ENV_PASSPHRASE, ENV_ENCRYPTED_KEY
        )))
    }
}

/// Turn a DATABASE_URL into a SQLite file path.
///
/// Accepts `sqlite://path`, `sqlite:path`, `file:path` and bare paths. Any
/// other `scheme://` is rejected since only SQLite is supported.
pub(crate) fn parse_database_url(url: &str) -> error::Result<PathBuf> {
    let url = url.trim();
    let without_query = url.split('?').next().unwrap_or(url);

    let path = if let Some(rest) = without_query.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = without_query.strip_prefix("sqlite:") {
        rest
    } else if let Some(rest) = without_query.strip_prefix("file:") {
        rest
    } else if let Some((scheme, _)) = without_query.split_once("://") {
        return Err(NovaError::config(format!(
            "unsupported database URL scheme '{}': only SQLite paths are supported",
            scheme
        )));
    } else {
        without_query
    };

    if path.is_empty() {
        return Err(NovaError::config(format!("{} has no path", ENV_DATABASE_URL)));
    }

    Ok(expand_tilde(path))
}
