//! nova - a personal project toolbox.
//!
//! This crate provides functionality to:
//! - Store reusable configuration files under a shorthand and clone them into
//!   any directory
//! - Keep one passphrase-encrypted secret file per project and restore it
//!   into the project directory
//!
//! # Example
//!
//! ```no_run
//! use nova::{Config, Repository, init_db};
//!
//! fn main() -> nova::Result<()> {
//!     let config = Config::load()?;
//!     let repo = Repository::new(init_db(&config.database_path()?)?);
//!
//!     for summary in repo.list_configs()? {
//!         println!("{} -> {}", summary.shorthand, summary.filename);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod project;
pub mod utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use crypto::{Cipher, PassphraseCheck};
pub use db::{Repository, init_db};
pub use error::{NovaError, Result};
pub use project::ProjectResolver;
