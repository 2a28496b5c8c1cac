//! Command handlers for the nova CLI.
//!
//! Handlers print their outcome for the user and also return it. Only store,
//! configuration and I/O failures outside the per-item flow come back as `Err`.

mod configs;
mod secret;

pub use configs::{
    ConfigOutcome, handle_config_add, handle_config_clone, handle_config_edit,
    handle_config_list, handle_config_remove,
};
pub use secret::{
    SecretOutcome, handle_secret_check, handle_secret_clone, handle_secret_list,
    handle_secret_set,
};
