use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::request::Sender;

/// One turn as it is reported to a [`LogSink`].
///
/// Records are not kept anywhere locally, they only exist to be handed
/// to the sink.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    /// ISO-8601 time at which the record was dispatched.
    pub timestamp: String,
    /// Who said the message.
    pub sender: Sender,
    /// The message text.
    pub message: String,
}

impl LogRecord {
    /// Creates a new record.
    #[inline]
    pub fn new<T, M>(timestamp: T, sender: Sender, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self {
            timestamp: timestamp.into(),
            sender,
            message: message.into(),
        }
    }
}

/// A best-effort recorder of conversation turns.
///
/// Callers treat sinks as a side channel: whatever a sink returns, it
/// must not change the conversation. Implementations are free to fail,
/// and callers are expected to contain those failures.
pub trait LogSink: Send + Sync {
    /// The error type that may be returned by the sink.
    type Error: Error + Send + Sync + 'static;

    /// Records one turn.
    fn log_turn(
        &self,
        record: &LogRecord,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static;
}
