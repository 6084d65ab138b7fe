//! Contracts between the conversation controller and the diagnostic
//! service it talks to.
//!
//! The controller never speaks HTTP itself. It is handed a chat provider
//! that turns a user message into a bot reply, and optionally a log sink
//! that records each turn somewhere else. This crate only defines the
//! shapes of those collaborators; implementations live in their own
//! crates, so that a test double and a real HTTP client are
//! interchangeable.

#![deny(missing_docs)]

mod error;
mod log;
mod provider;
mod request;

pub use error::*;
pub use log::*;
pub use provider::*;
pub use request::*;
