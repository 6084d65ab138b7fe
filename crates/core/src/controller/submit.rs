use pitstop_model::{ChatRequest, Sender};

use super::{Controller, Stage, SubmitOutcome};
use crate::transcript::{FALLBACK_REPLY, Message};

impl Controller {
    /// Submits the pending input.
    ///
    /// Blank input is ignored. Otherwise the user message is appended
    /// right away, the chat request is made, and its reply (or the
    /// fallback reply, if the request fails) is appended after it. The
    /// pending input is cleared once the turn is over, whichever way it
    /// went.
    ///
    /// # Cancel safety
    ///
    /// This method is not cancel safe. If the future is dropped while
    /// waiting for the reply, the turn is left open. The next call closes
    /// that turn with the fallback reply and drops its input, so the
    /// interrupted message is never sent again.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.stage == Stage::Submitting {
            warn!("closing a turn that was interrupted");
            self.append(Message::chatbot(FALLBACK_REPLY));
            self.pending_input.clear();
            self.stage = Stage::Idle;
        }

        if self.pending_input.trim().is_empty() {
            debug!("ignored blank input");
            return SubmitOutcome::EmptyInput;
        }

        self.stage = Stage::Submitting;
        let input = self.pending_input.clone();

        // The user message goes in before any request is made, so it
        // shows up even if everything after it fails.
        self.append(Message::user(input.clone()));
        self.log_turn(Sender::User, &input);

        let reply_or_err = self
            .chat_client
            .send_chat_message(ChatRequest::new(input))
            .await;
        let outcome = match reply_or_err {
            Ok(reply) => {
                let text = reply.text;
                self.append(Message::chatbot(text.clone()));
                self.log_turn(Sender::Chatbot, &text);
                SubmitOutcome::Replied
            }
            Err(err) => {
                warn!("chat request failed ({}): {err}", err.kind());
                self.append(Message::chatbot(FALLBACK_REPLY));
                SubmitOutcome::Fallback
            }
        };

        self.pending_input.clear();
        self.stage = Stage::Idle;
        debug!("finished a turn: {outcome:?}");
        outcome
    }

    fn append(&mut self, message: Message) {
        self.transcript.append(message);
        if let (Some(on_message), Some(message)) =
            (&self.on_message, self.transcript.last())
        {
            on_message(message);
        }
    }

    #[inline]
    fn log_turn(&mut self, sender: Sender, message: &str) {
        if let Some(log_dispatcher) = &mut self.log_dispatcher {
            log_dispatcher.dispatch(sender, message);
        }
    }
}
