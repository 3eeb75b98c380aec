//! Password negotiation for encrypted inputs.
//!
//! An encrypted document is first tried with the empty password, which opens
//! files that only carry an owner password. After that the user is asked
//! until the right password is entered. There is no retry limit and no
//! timeout; the loop ends on success or when the prompt itself fails.

use std::path::Path;

use tracing::{debug, info};

use crate::engine::PdfEngine;
use crate::error::{PdfJoinError, Result};
use crate::io::prompt::Prompter;

/// Message shown after a rejected password.
pub const PASSWORD_INCORRECT: &str = "Password is incorrect";

/// How a document ended up unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unlocked {
    /// The document was never locked.
    NotLocked,
    /// The empty password was accepted without asking.
    EmptyPassword,
    /// A password typed by the user was accepted after `attempts` prompts.
    Password {
        /// Number of prompts shown, including the successful one.
        attempts: usize,
    },
}

/// Resolves locked documents by asking for passwords.
pub struct UnlockNegotiator<'a, P: Prompter + ?Sized> {
    prompter: &'a mut P,
}

impl<'a, P: Prompter + ?Sized> UnlockNegotiator<'a, P> {
    /// Create a negotiator that asks through `prompter`.
    pub fn new(prompter: &'a mut P) -> Self {
        Self { prompter }
    }

    /// Unlock `doc`, prompting as often as needed.
    ///
    /// `display_path` is the path as the user typed it and appears in the
    /// prompt `Enter password for <path>: `.
    ///
    /// # Errors
    ///
    /// Incorrect passwords are never errors. Only a prompt that cannot be
    /// read (closed stdin, Ctrl-C in raw mode) returns
    /// [`PdfJoinError::Prompt`].
    pub fn unlock<E: PdfEngine>(
        &mut self,
        engine: &E,
        doc: &mut E::Document,
        display_path: &Path,
    ) -> Result<Unlocked> {
        if !engine.is_locked(doc) {
            return Ok(Unlocked::NotLocked);
        }

        if engine.unlock(doc, "") {
            debug!(path = %display_path.display(), "unlocked with empty password");
            return Ok(Unlocked::EmptyPassword);
        }

        let prompt = format!("Enter password for {}: ", display_path.display());
        let mut attempts = 0;

        loop {
            let password = self
                .prompter
                .ask_secret(&prompt)
                .map_err(PdfJoinError::Prompt)?;
            attempts += 1;

            if engine.unlock(doc, &password) {
                info!(path = %display_path.display(), attempts, "document unlocked");
                return Ok(Unlocked::Password { attempts });
            }

            self.prompter.complain(PASSWORD_INCORRECT);
        }
    }
}
