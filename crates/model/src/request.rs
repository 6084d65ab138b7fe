use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Who said a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Sender {
    /// The person describing the car problem.
    User,
    /// The diagnostic assistant.
    Chatbot,
}

impl Display for Sender {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "User"),
            Sender::Chatbot => write!(f, "Chatbot"),
        }
    }
}

/// A request to be sent to the chat provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatRequest {
    /// The user input, exactly as it was typed.
    pub message: String,
}

impl ChatRequest {
    /// Creates a request carrying the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The reply of the chat provider to a [`ChatRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BotReply {
    /// The reply text.
    pub text: String,
}
