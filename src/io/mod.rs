//! Input side of a merge: loading documents and talking to the user.

pub mod prompt;
pub mod reader;
pub mod unlock;

pub use prompt::{Answer, Prompter, TerminalPrompter, confirm};
pub use reader::{DocumentHandle, DocumentLoader};
pub use unlock::{UnlockNegotiator, Unlocked};
