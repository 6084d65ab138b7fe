//! Core logic of the car troubleshooting assistant: the transcript, the
//! conversation controller, and the session that drives it.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod chat_client;
mod controller;
mod log_dispatcher;
mod session;
pub mod transcript;

pub use controller::{Controller, ControllerBuilder, Stage, SubmitOutcome};
pub use pitstop_model::Sender;
pub use session::{Session, SessionBuilder, SessionClosedError};
