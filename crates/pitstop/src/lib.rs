//! An out-of-the-box car troubleshooting assistant that talks to the
//! diagnostic service over HTTP.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to put the assistant into your own front-end.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod assistant;
mod config;

pub use assistant::{Assistant, AssistantBuilder};
pub use config::{AppConfig, ConfigError};

/// Re-exports of [`pitstop_core`] crate.
pub mod core {
    pub use pitstop_core::*;
}
