//! Database model structs representing table rows.

use chrono::{DateTime, Utc};

/// A reusable configuration file, selected at the CLI by its shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub filename: String,
    pub shorthand: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The encrypted secret file belonging to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct DbSecret {
    pub project: String,
    pub path: String,
    /// Base64 envelope, see [`crate::crypto::Cipher`].
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating/replacing a config (without timestamps)
#[derive(Debug, Clone)]
pub struct ConfigInput {
    pub filename: String,
    pub shorthand: String,
    pub content: String,
}

/// Input for creating/replacing a secret (without timestamps)
#[derive(Debug, Clone)]
pub struct SecretInput {
    pub project: String,
    pub path: String,
    pub content: String,
}

/// `(shorthand, filename)` projection used by `config list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub shorthand: String,
    pub filename: String,
}
