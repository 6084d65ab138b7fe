use std::pin::Pin;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use pitstop_model::{LogRecord, LogSink, Sender};
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

type BoxedLogFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type HandlerFn = Arc<dyn Fn(LogRecord) -> BoxedLogFuture + Send + Sync>;

/// A fire-and-forget dispatcher in front of a log sink.
///
/// Each dispatch runs as a task of its own, so it neither waits for nor
/// holds up anything else. Whatever happens inside the sink, errors and
/// panics included, ends up as a `warn!` and goes no further.
///
/// Dropping the dispatcher leaves in-flight dispatches running.
pub struct LogDispatcher {
    handler_fn: HandlerFn,
    in_flight: JoinSet<()>,
}

impl LogDispatcher {
    pub fn new<S: LogSink + 'static>(sink: S) -> Self {
        let sink = Arc::new(sink);
        let handler_fn: HandlerFn =
            Arc::new(move |record: LogRecord| -> BoxedLogFuture {
                let sink = Arc::clone(&sink);
                Box::pin(
                    async move {
                        // Call the sink inside the task, so that even a
                        // panicking sink stays contained.
                        match sink.log_turn(&record).await {
                            Ok(()) => trace!("logged a turn: {record:?}"),
                            Err(err) => {
                                warn!("failed to log a turn: {err}")
                            }
                        }
                    }
                    .instrument(trace_span!("log dispatch")),
                )
            });
        Self {
            handler_fn,
            in_flight: JoinSet::new(),
        }
    }

    /// Dispatches one turn, stamped with the current time.
    ///
    /// Must be called within a tokio runtime.
    pub fn dispatch(&mut self, sender: Sender, message: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = LogRecord::new(timestamp, sender, message);
        self.in_flight.spawn((self.handler_fn)(record));

        // Reap finished dispatches so the set doesn't grow forever.
        while let Some(result) = self.in_flight.try_join_next() {
            report(result);
        }
    }

    /// Waits until all in-flight dispatches have settled.
    pub async fn flush(&mut self) {
        while let Some(result) = self.in_flight.join_next().await {
            report(result);
        }
    }

    /// Returns the number of dispatches that haven't been reaped yet.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl Drop for LogDispatcher {
    fn drop(&mut self) {
        self.in_flight.detach_all();
    }
}

#[inline]
fn report(result: Result<(), JoinError>) {
    if let Err(err) = result {
        warn!("log dispatch task failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fmt::{self, Display, Formatter};

    use chrono::DateTime;
    use pitstop_test_model::TestLogSink;

    use super::*;

    #[derive(Debug)]
    struct Never;

    impl Display for Never {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            "never".fmt(f)
        }
    }

    impl Error for Never {}

    struct PanickingSink;

    impl LogSink for PanickingSink {
        type Error = Never;

        fn log_turn(
            &self,
            record: &LogRecord,
        ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static
        {
            let message = record.message.clone();
            async move {
                if !message.is_empty() {
                    panic!("sink exploded");
                }
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_dispatch() {
        let sink = TestLogSink::default();
        let mut dispatcher = LogDispatcher::new(sink.clone());
        dispatcher.dispatch(Sender::User, "engine won't start");
        dispatcher.dispatch(Sender::Chatbot, "Check the battery.");
        dispatcher.flush().await;
        assert_eq!(dispatcher.in_flight(), 0);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.sender == Sender::User
            && r.message == "engine won't start"));
        assert!(records.iter().any(|r| r.sender == Sender::Chatbot
            && r.message == "Check the battery."));
        for record in records {
            assert!(record.timestamp.ends_with('Z'));
            DateTime::parse_from_rfc3339(&record.timestamp).unwrap();
        }
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let sink = TestLogSink::default();
        sink.set_failing(true);
        let mut dispatcher = LogDispatcher::new(sink.clone());
        dispatcher.dispatch(Sender::User, "Hi");
        dispatcher.flush().await;
        assert_eq!(sink.records().len(), 1);

        let mut dispatcher = LogDispatcher::new(PanickingSink);
        dispatcher.dispatch(Sender::User, "Hi");
        dispatcher.flush().await;
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_drop_detaches() {
        let sink = TestLogSink::default();
        sink.set_stalled(true);
        let mut dispatcher = LogDispatcher::new(sink.clone());
        dispatcher.dispatch(Sender::User, "Hi");
        assert_eq!(dispatcher.in_flight(), 1);
        drop(dispatcher);
    }
}
