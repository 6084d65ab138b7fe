use pitstop_model::{ChatProvider, LogSink};

use super::{Controller, Stage};
use crate::chat_client::ChatClient;
use crate::log_dispatcher::LogDispatcher;
use crate::transcript::{Message, Transcript};

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) chat_client: ChatClient,
    pub(crate) log_dispatcher: Option<LogDispatcher>,
    pub(crate) on_message: Option<Box<dyn Fn(&Message) + Send + Sync>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified chat provider.
    #[inline]
    pub fn with_chat_provider<P: ChatProvider + 'static>(provider: P) -> Self {
        Self {
            chat_client: ChatClient::new(provider),
            log_dispatcher: None,
            on_message: None,
        }
    }

    /// Sends every turn to `sink` as well.
    #[inline]
    pub fn with_log_sink<S: LogSink + 'static>(mut self, sink: S) -> Self {
        self.log_dispatcher = Some(LogDispatcher::new(sink));
        self
    }

    /// Attaches a callback to be invoked whenever a message is appended
    /// to the transcript.
    ///
    /// The greeting is part of the initial transcript and is not
    /// reported.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> Controller {
        let ControllerBuilder {
            chat_client,
            log_dispatcher,
            on_message,
        } = self;

        Controller {
            chat_client,
            log_dispatcher,
            transcript: Transcript::initialize(),
            pending_input: String::new(),
            stage: Stage::Idle,
            on_message,
        }
    }
}
