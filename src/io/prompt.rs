//! Interactive terminal prompts.
//!
//! The merge pipeline asks questions through the [`Prompter`] trait so it can
//! be driven by a script in tests. [`TerminalPrompter`] is the real thing:
//! it reads passwords with echo disabled through `crossterm` raw mode when
//! stdin is a terminal, and plain lines otherwise.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;

/// Message shown when a yes/no answer is not recognized.
pub const ANSWER_HINT: &str = "Please enter 'y' or 'n'";

/// Source of interactive answers.
pub trait Prompter {
    /// Show `prompt` and read a secret without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed or cannot be read.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Show `prompt` and read one line. Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn ask_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Report a problem with the last answer.
    fn complain(&mut self, message: &str);
}

/// Answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// `y` or `yes`.
    Yes,
    /// `n` or `no`.
    No,
    /// Anything else.
    Unrecognized,
}

impl Answer {
    /// Parse a yes/no token, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            _ => Self::Unrecognized,
        }
    }
}

/// Ask `question` until a yes or no answer is given.
///
/// Unrecognized answers are reported with [`ANSWER_HINT`] and asked again.
/// End of input counts as no.
///
/// # Arguments
///
/// * `prompter` - Where the question is asked and answers are read
/// * `question` - Shown as `"<question> [Y/N]: "`
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn confirm<P: Prompter + ?Sized>(prompter: &mut P, question: &str) -> io::Result<bool> {
    let prompt = format!("{question} [Y/N]: ");

    loop {
        let Some(line) = prompter.ask_line(&prompt)? else {
            debug!("input closed at confirmation prompt");
            return Ok(false);
        };

        match Answer::parse(&line) {
            Answer::Yes => return Ok(true),
            Answer::No => return Ok(false),
            Answer::Unrecognized => prompter.complain(ANSWER_HINT),
        }
    }
}

/// [`Prompter`] bound to the process's stdin, stdout and stderr.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a terminal prompter.
    pub fn new() -> Self {
        Self
    }

    fn show(prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()
    }

    fn read_raw_line() -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn read_hidden() -> io::Result<String> {
        let guard = RawModeGuard::enable()?;
        let mut secret = String::new();

        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            else {
                continue;
            };

            let ctrl = modifiers.contains(KeyModifiers::CONTROL);
            match code {
                KeyCode::Enter => break,
                KeyCode::Backspace => {
                    secret.pop();
                }
                // raw mode swallows the signal, so Ctrl-C has to be handled here
                KeyCode::Char('c') if ctrl => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                }
                KeyCode::Char('d') if ctrl && secret.is_empty() => {
                    return Err(io::ErrorKind::UnexpectedEof.into());
                }
                KeyCode::Char(c) => secret.push(c),
                _ => {}
            }
        }

        drop(guard);
        // the Enter key was not echoed
        println!();
        Ok(secret)
    }
}

impl Prompter for TerminalPrompter {
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        Self::show(prompt)?;

        if io::stdin().is_terminal() {
            Self::read_hidden()
        } else {
            Self::read_raw_line()?.ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
        }
    }

    fn ask_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Self::show(prompt)?;
        Self::read_raw_line()
    }

    fn complain(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Keeps the terminal in raw mode until dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            debug!(%err, "failed to leave raw mode");
        }
    }
}
