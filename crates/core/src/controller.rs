mod builder;
mod submit;
#[cfg(test)]
mod tests;

use crate::chat_client::ChatClient;
use crate::log_dispatcher::LogDispatcher;
use crate::transcript::{Message, Transcript};
pub use builder::ControllerBuilder;

type OnMessageFn = Box<dyn Fn(&Message) + Send + Sync>;

/// The stage a [`Controller`] is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting for input.
    #[default]
    Idle,
    /// A turn is in progress.
    Submitting,
}

/// What became of a [`Controller::submit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// The pending input was blank, nothing happened.
    EmptyInput,
    /// The bot reply was appended.
    Replied,
    /// The chat request failed and the fallback reply was appended.
    Fallback,
}

/// The conversation controller of one session.
///
/// The controller exclusively owns the transcript and the pending input.
/// Each [`submit`](Controller::submit) turns the pending input into one
/// turn: the user message, then exactly one bot message, which is either
/// the reply or the fallback.
///
/// When built with a log sink, every user and bot message is also sent
/// to that sink. Nothing the sink does can affect the conversation.
pub struct Controller {
    chat_client: ChatClient,
    log_dispatcher: Option<LogDispatcher>,
    transcript: Transcript,
    pending_input: String,
    stage: Stage,
    on_message: Option<OnMessageFn>,
}

impl Controller {
    /// Returns the input that has not been submitted yet.
    #[inline]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Replaces the input that has not been submitted yet.
    #[inline]
    pub fn set_pending_input<S: Into<String>>(&mut self, input: S) {
        self.pending_input = input.into();
    }

    /// Returns the transcript.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns whether turns are also sent to a log sink.
    #[inline]
    pub fn is_logging(&self) -> bool {
        self.log_dispatcher.is_some()
    }

    /// Waits until all turns dispatched to the log sink have settled.
    pub async fn flush_logs(&mut self) {
        if let Some(log_dispatcher) = &mut self.log_dispatcher {
            log_dispatcher.flush().await;
        }
    }
}
