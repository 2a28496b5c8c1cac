//! Utility functions shared across the application.

mod editor;
pub(crate) mod permissions;
mod prompt;
mod table;

pub use editor::edit_in_editor;
pub use permissions::restrict_file_permissions;
pub use prompt::{FixedPassphrase, PassphraseSource, TerminalPrompt};
pub use table::render_table;
