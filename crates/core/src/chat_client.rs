use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::pin::Pin;
use std::sync::Arc;

use pitstop_model::{
    BotReply, ChatProvider, ChatProviderError, ChatRequest, ErrorKind,
};
use tracing::Instrument;

pub(crate) type SendChatResult = Result<BotReply, Box<dyn ChatProviderError>>;
type BoxedSendChatFuture = Pin<Box<dyn Future<Output = SendChatResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ChatRequest) -> BoxedSendChatFuture + Send + Sync>;

/// A wrapper around a chat provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ChatClient {
    handler_fn: HandlerFn,
}

impl ChatClient {
    #[inline]
    pub fn new<P: ChatProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ChatClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn =
            Arc::new(move |req: ChatRequest| -> BoxedSendChatFuture {
                let fut = provider.send_chat_message(&req);
                Box::pin(
                    async move {
                        trace!("got a request: {req:?}");
                        handle_reply::<P>(fut.await)
                    }
                    .instrument(trace_span!("chat client req")),
                )
            });
        Self { handler_fn }
    }

    /// Sends one chat message and waits for the reply.
    ///
    /// The request is made exactly once. Whatever goes wrong is handed
    /// back to the caller as is.
    #[inline]
    pub async fn send_chat_message(&self, req: ChatRequest) -> SendChatResult {
        (self.handler_fn)(req).await
    }
}

fn handle_reply<P: ChatProvider + 'static>(
    reply_or_err: Result<BotReply, P::Error>,
) -> SendChatResult {
    let reply = match reply_or_err {
        Ok(reply) => reply,
        Err(err) => {
            debug!("got an error: {err:?}");
            return Err(Box::new(err));
        }
    };

    // Transcript messages are never blank.
    if reply.text.trim().is_empty() {
        debug!("got a blank reply");
        return Err(Box::new(BlankReplyError));
    }

    trace!("finished a request");
    Ok(reply)
}

#[derive(Debug)]
struct BlankReplyError;

impl Display for BlankReplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        "the reply text is blank".fmt(f)
    }
}

impl Error for BlankReplyError {}

impl ChatProviderError for BlankReplyError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedPayload
    }
}
