//! A session runs one controller on a task of its own.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::controller::Controller;
use crate::transcript::Transcript;

/// A type of error which can be returned whenever commands are sent to
/// a session that has stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionClosedError;

impl Display for SessionClosedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        "the session has stopped".fmt(f)
    }
}

impl Error for SessionClosedError {}

#[derive(Debug)]
enum Command {
    SetPendingInput(String),
    Submit,
    SendMessage(String),
    Transcript(oneshot::Sender<Transcript>),
    FlushLogs(oneshot::Sender<()>),
}

/// [`Session`] builder.
pub struct SessionBuilder {
    controller: Controller,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl SessionBuilder {
    /// Creates a builder that will run `controller`.
    #[inline]
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            on_idle: None,
        }
    }

    /// Attaches a callback to be invoked every time a submission has
    /// been handled and the controller is idle again.
    ///
    /// Blank submissions count, even though nothing happens for them.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Spawns the session task and returns a handle to it.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Session {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(
            run_session(self.controller, self.on_idle, cmd_rx)
                .instrument(debug_span!("session")),
        );
        Session { cmd_tx }
    }
}

/// A handle to a running conversation, like a window that displays
/// messages and has an input box.
///
/// Commands are handled strictly one after another, in the order they
/// were sent. A submission sent while a turn is in progress waits for
/// that turn to finish, so turns never interleave in the transcript.
///
/// The session stops once every handle has been dropped.
#[derive(Clone)]
pub struct Session {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Session {
    /// Replaces the pending input.
    #[inline]
    pub fn set_pending_input<S: Into<String>>(
        &self,
        input: S,
    ) -> Result<(), SessionClosedError> {
        self.send(Command::SetPendingInput(input.into()))
    }

    /// Submits the pending input.
    #[inline]
    pub fn submit(&self) -> Result<(), SessionClosedError> {
        self.send(Command::Submit)
    }

    /// Sets the pending input to `message` and submits it, as a single
    /// command.
    #[inline]
    pub fn send_message<S: Into<String>>(
        &self,
        message: S,
    ) -> Result<(), SessionClosedError> {
        self.send(Command::SendMessage(message.into()))
    }

    /// Returns a snapshot of the transcript, taken after every command
    /// sent before this one has been handled.
    pub async fn transcript(&self) -> Result<Transcript, SessionClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Transcript(tx))?;
        rx.await.map_err(|_| SessionClosedError)
    }

    /// Waits until all turns dispatched to the log sink have settled.
    pub async fn flush_logs(&self) -> Result<(), SessionClosedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::FlushLogs(tx))?;
        rx.await.map_err(|_| SessionClosedError)
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), SessionClosedError> {
        self.cmd_tx.send(cmd).map_err(|_| SessionClosedError)
    }
}

async fn run_session(
    mut controller: Controller,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        let submit = match cmd {
            Command::SetPendingInput(input) => {
                controller.set_pending_input(input);
                false
            }
            Command::Submit => true,
            Command::SendMessage(message) => {
                controller.set_pending_input(message);
                true
            }
            Command::Transcript(tx) => {
                tx.send(controller.transcript().clone()).ok();
                false
            }
            Command::FlushLogs(tx) => {
                controller.flush_logs().await;
                tx.send(()).ok();
                false
            }
        };

        if submit {
            controller.submit().await;
            if let Some(on_idle) = &on_idle {
                on_idle();
            }
        }
    }
    debug!("will terminate");
}
