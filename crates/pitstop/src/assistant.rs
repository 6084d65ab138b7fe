use pitstop_core::transcript::Message;
use pitstop_core::{ControllerBuilder, Session, SessionBuilder};
use pitstop_http_model::{Error as HttpError, HttpChatProvider};

use crate::config::AppConfig;

/// An assistant builder.
///
/// See [`Assistant`].
pub struct AssistantBuilder {
    provider: HttpChatProvider,
    logging: bool,
    on_message: Option<Box<dyn Fn(&Message) + Send + Sync>>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl AssistantBuilder {
    /// Creates an assistant builder for the service described by
    /// `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let provider = HttpChatProvider::new(config.http_config());
        debug!("using service config: {:?}", provider.config());
        Self {
            provider,
            logging: config.logging,
            on_message: None,
            on_idle: None,
        }
    }

    /// Attaches a callback to be invoked when a message is appended to
    /// the transcript.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback to be invoked when the assistant is idle
    /// again after a submission.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds a new assistant.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Assistant {
        let mut controller_builder =
            ControllerBuilder::with_chat_provider(self.provider.clone());
        if self.logging {
            controller_builder =
                controller_builder.with_log_sink(self.provider.log_sink());
        }
        if let Some(on_message) = self.on_message {
            controller_builder = controller_builder.on_message(on_message);
        }

        let mut session_builder =
            SessionBuilder::new(controller_builder.build());
        if let Some(on_idle) = self.on_idle {
            session_builder = session_builder.on_idle(on_idle);
        }

        Assistant {
            session: session_builder.build(),
            provider: self.provider,
        }
    }
}

/// A car troubleshooting assistant, backed by the diagnostic service.
///
/// This is basically a [`Session`] with an HTTP chat provider, plus a way
/// to check whether the service is reachable at all.
pub struct Assistant {
    session: Session,
    provider: HttpChatProvider,
}

impl Assistant {
    /// Returns the session of this assistant.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Checks whether the service is reachable.
    ///
    /// The outcome is informational. The conversation works the same
    /// either way, with failed turns getting the fallback reply.
    #[inline]
    pub async fn probe(&self) -> Result<(), HttpError> {
        self.provider.probe().await
    }
}
