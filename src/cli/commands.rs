//! Command and subcommand definitions.

use clap::Subcommand;

/// Top-level commands available in nova.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage reusable project configuration files
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Manage the encrypted secret file of the current project
    Secret {
        #[command(subcommand)]
        command: Option<SecretCommands>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write stored configs into the current directory
    Clone {
        /// Shorthands of the configs to clone, processed in order
        shorthands: Vec<String>,
    },
    /// List stored shorthands and their filenames
    List,
    /// Store a new config, using the file's content if it exists
    Add {
        /// Short alias used by `clone`
        shorthand: String,
        /// File name the config is written to
        filename: String,
    },
    /// Remove a stored config
    Remove {
        shorthand: String,
    },
    /// Open a stored config in your editor
    Edit {
        shorthand: String,
    },
}

/// Secret subcommands
#[derive(Subcommand, Debug)]
pub enum SecretCommands {
    /// Decrypt this project's secret and write it to its original path
    Clone,
    /// Encrypt a file and store it as this project's secret
    Set {
        /// Path of the file, relative to the current directory
        path: String,
    },
    /// Compare the stored secret with the local file
    Check,
    /// Show the stored secret's path and length without its content
    List,
}
