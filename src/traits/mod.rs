//! Trait definitions for the bot's collaborators.
//!
//! The poll loop talks to the homework API and to the chat only through
//! these traits.

mod notifier;
mod source;

pub use notifier::Notifier;
pub use source::HomeworkSource;
