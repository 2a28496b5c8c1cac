//! Database module for stored config files and encrypted project secrets.

mod models;
mod repository;
mod schema;

pub use models::{ConfigInput, ConfigSummary, DbConfig, DbSecret, SecretInput};
pub use repository::Repository;
pub use schema::{init_db, init_memory_db};
