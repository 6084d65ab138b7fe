//! Transcript-related types.

use std::fmt::{self, Display, Formatter};
use std::slice;

use pitstop_model::Sender;

/// The message a transcript starts with.
pub const GREETING: &str = "Hello! Welcome to the Car Troubleshooting \
                            Assistant. How can I help you today?";

/// The reply shown instead of the bot's answer when the chat request
/// fails. It deliberately carries no detail about the failure.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, an error occurred while processing your request.";

/// A message in the transcript.
///
/// Messages can't be changed once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    sender: Sender,
    text: String,
}

impl Message {
    #[inline]
    pub(crate) fn user<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    #[inline]
    pub(crate) fn chatbot<S: Into<String>>(text: S) -> Self {
        Self {
            sender: Sender::Chatbot,
            text: text.into(),
        }
    }

    /// Returns who said this message.
    #[inline]
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the message text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the style class a view should render this message with.
    #[inline]
    pub fn style_class(&self) -> &'static str {
        match self.sender {
            Sender::User => "user",
            Sender::Chatbot => "chatbot",
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.text)
    }
}

/// The ordered conversation history.
///
/// Insertion order is display order is chronological order. Messages
/// are only ever appended, never edited, removed, or reordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript holding only the greeting.
    #[inline]
    pub fn initialize() -> Self {
        Self {
            messages: vec![Message::chatbot(GREETING)],
        }
    }

    #[inline]
    pub(crate) fn append(&mut self, message: Message) {
        trace!("appending message: {message:?}");
        self.messages.push(message);
    }

    /// Returns all messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over the messages, oldest first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false`, since a transcript starts with the greeting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the latest message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize() {
        let transcript = Transcript::initialize();
        assert_eq!(transcript.len(), 1);
        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.sender(), Sender::Chatbot);
        assert_eq!(greeting.text(), GREETING);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut transcript = Transcript::initialize();
        transcript.append(Message::user("engine won't start"));
        transcript.append(Message::chatbot("Check the battery."));
        transcript.append(Message::user("engine won't start"));

        let texts: Vec<_> = transcript.iter().map(Message::text).collect();
        assert_eq!(
            texts,
            vec![
                GREETING,
                "engine won't start",
                "Check the battery.",
                "engine won't start",
            ]
        );
    }

    #[test]
    fn test_render() {
        let message = Message::user("weird noise");
        assert_eq!(message.to_string(), "User: weird noise");
        assert_eq!(message.style_class(), "user");
        assert_eq!(Message::chatbot("Hi").style_class(), "chatbot");
    }
}
