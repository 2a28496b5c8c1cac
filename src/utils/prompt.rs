//! Passphrase input.

use std::io::{self, Write};

use crate::error::Result;

/// Where the secret commands get the passphrase from.
pub trait PassphraseSource {
    fn read_passphrase(&self, prompt: &str) -> Result<String>;
}

/// Reads from the terminal with echo disabled.
pub struct TerminalPrompt;

impl PassphraseSource for TerminalPrompt {
    fn read_passphrase(&self, prompt: &str) -> Result<String> {
        eprint!("{}: ", prompt);
        io::stderr().flush()?;
        Ok(rpassword::read_password()?)
    }
}

/// Hands out a fixed passphrase. Used by scripted callers and tests.
pub struct FixedPassphrase(pub String);

impl PassphraseSource for FixedPassphrase {
    fn read_passphrase(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}
