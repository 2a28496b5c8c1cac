//! Configuration loading and management.

mod loader;
mod types;

pub use types::{Config, ConfigFile, Defaults, Environment};
