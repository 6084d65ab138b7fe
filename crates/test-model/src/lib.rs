//! Local fake collaborators for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pitstop_model::{
    BotReply, ChatProvider, ChatProviderError, ChatRequest, ErrorKind,
    LogRecord, LogSink,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ChatProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct ScriptState {
    steps: VecDeque<PresetStep>,
    requests: Vec<String>,
    delay: Option<Duration>,
}

/// A local fake chat provider for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how
/// the provider should answer each request. Steps are consumed in order,
/// one per request. If the script runs out of steps, an error will be
/// returned.
///
/// Clones share the same script and request log, so a test can keep a
/// clone around to inspect what the code under test sent.
#[derive(Clone, Default)]
pub struct TestChatProvider {
    state: Arc<Mutex<ScriptState>>,
}

impl TestChatProvider {
    #[inline]
    pub fn add_step(&self, step: PresetStep) {
        self.lock().steps.push_back(step);
    }

    #[inline]
    pub fn add_reply<S: Into<String>>(&self, text: S) {
        self.add_step(PresetStep::Reply(text.into()));
    }

    #[inline]
    pub fn add_failure(&self, kind: ErrorKind) {
        self.add_step(PresetStep::Failure(kind.into()));
    }

    /// Delays every reply by `duration`.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns the messages of all requests received so far.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        // A poisoned script only means another test thread panicked.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl ChatProvider for TestChatProvider {
    type Error = crate::Error;

    fn send_chat_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<BotReply, Self::Error>> + Send + 'static
    {
        let (step, delay) = {
            let mut state = self.lock();
            state.requests.push(req.message.clone());
            (state.steps.pop_front(), state.delay)
        };

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match step {
                Some(PresetStep::Reply(text)) => Ok(BotReply { text }),
                Some(PresetStep::Failure(failure)) => Err(Error {
                    message: "scripted failure",
                    kind: failure.into(),
                }),
                None => Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}

#[derive(Default)]
struct SinkState {
    records: Vec<LogRecord>,
    failing: bool,
    stalled: bool,
}

/// A local fake log sink for testing purpose.
///
/// Every record is kept as soon as `log_turn` is called, even when the
/// sink is set to fail or to stall.
#[derive(Clone, Default)]
pub struct TestLogSink {
    state: Arc<Mutex<SinkState>>,
}

impl TestLogSink {
    /// Makes every subsequent call fail.
    #[inline]
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Makes every subsequent call never complete.
    #[inline]
    pub fn set_stalled(&self, stalled: bool) {
        self.lock().stalled = stalled;
    }

    /// Returns all records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl LogSink for TestLogSink {
    type Error = crate::Error;

    fn log_turn(
        &self,
        record: &LogRecord,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let (failing, stalled) = {
            let mut state = self.lock();
            state.records.push(record.clone());
            (state.failing, state.stalled)
        };

        async move {
            if stalled {
                pending::<()>().await;
            }
            if failing {
                return Err(Error {
                    message: "log sink is failing",
                    kind: ErrorKind::Network,
                });
            }
            Ok(())
        }
    }
}
