use std::error::Error;

use crate::error::ErrorKind;
use crate::request::{BotReply, ChatRequest};

/// The error type for a chat provider.
pub trait ChatProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the diagnostic service, turning a user message
/// into a bot reply.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
///
/// Providers make exactly one attempt per request. Retrying is never the
/// provider's business.
pub trait ChatProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ChatProviderError;

    /// Sends a chat message and waits for the reply.
    fn send_chat_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<BotReply, Self::Error>> + Send + 'static;
}
