use pitstop_model::{ChatRequest, LogRecord, Sender};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatRequestBody<'a> {
    message: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LogRequestBody<'a> {
    timestamp: &'a str,
    sender: Sender,
    message: &'a str,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_chat_request(req: &ChatRequest) -> ChatRequestBody<'_> {
    ChatRequestBody {
        message: &req.message,
    }
}

#[inline]
pub fn create_log_request(record: &LogRecord) -> LogRequestBody<'_> {
    LogRequestBody {
        timestamp: &record.timestamp,
        sender: record.sender,
        message: &record.message,
    }
}
