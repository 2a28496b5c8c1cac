//! Unified error type for nova.
//!
//! All library APIs return `Result<T, NovaError>`. User-input problems that a
//! command reports and then finishes normally (wrong passphrase, unknown
//! shorthand, ...) are not errors; they are outcomes of the command handlers.
//! This type covers everything that should stop the process.

use std::fmt;

/// The unified error type for all nova operations.
#[derive(Debug)]
pub enum NovaError {
    // ── I/O & filesystem ───────────────────────────────────────────────
    /// Filesystem or terminal I/O failed.
    Io(std::io::Error),

    // ── Database ───────────────────────────────────────────────────────
    /// SQLite / database operation failed.
    Db(rusqlite::Error),

    // ── Configuration ──────────────────────────────────────────────────
    /// Missing or malformed configuration (env vars, nova.kdl).
    Config(String),

    // ── Encryption ─────────────────────────────────────────────────────
    /// An envelope could not be decoded back into plaintext.
    Decode(String),

    /// The cipher could not be set up or run.
    Encryption(String),

    // ── Validation ─────────────────────────────────────────────────────
    /// User input validation failed.
    Validation(String),

    // ── Catch-all ──────────────────────────────────────────────────────
    /// Any other error.
    Other(String),
}

// ── Display ────────────────────────────────────────────────────────────

impl fmt::Display for NovaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NovaError::Io(e) => write!(f, "{}", e),
            NovaError::Db(e) => write!(f, "database error: {}", e),
            NovaError::Config(msg) => write!(f, "config error: {}", msg),
            NovaError::Decode(msg) => write!(f, "decode error: {}", msg),
            NovaError::Encryption(msg) => write!(f, "encryption error: {}", msg),
            NovaError::Validation(msg) => write!(f, "{}", msg),
            NovaError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for NovaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NovaError::Io(e) => Some(e),
            NovaError::Db(e) => Some(e),
            _ => None,
        }
    }
}

// ── From implementations for common error types ────────────────────────

impl From<std::io::Error> for NovaError {
    fn from(e: std::io::Error) -> Self {
        NovaError::Io(e)
    }
}

impl From<rusqlite::Error> for NovaError {
    fn from(e: rusqlite::Error) -> Self {
        NovaError::Db(e)
    }
}

impl From<base64::DecodeError> for NovaError {
    fn from(e: base64::DecodeError) -> Self {
        NovaError::Decode(format!("envelope is not valid base64: {}", e))
    }
}

impl From<regex::Error> for NovaError {
    fn from(e: regex::Error) -> Self {
        NovaError::Config(format!("invalid projects directory pattern: {}", e))
    }
}

// ── Convenience constructors ───────────────────────────────────────────

impl NovaError {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        NovaError::Config(message.into())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        NovaError::Decode(message.into())
    }

    /// Create an encryption error.
    pub fn encryption(message: impl Into<String>) -> Self {
        NovaError::Encryption(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        NovaError::Validation(message.into())
    }

    /// True for errors raised while turning an envelope back into plaintext.
    pub fn is_decode(&self) -> bool {
        matches!(self, NovaError::Decode(_))
    }
}

/// Convenience type alias for Results using NovaError.
pub type Result<T> = std::result::Result<T, NovaError>;
