use std::sync::{Arc, Mutex};
use std::time::Duration;

use pitstop_model::{ErrorKind, Sender};
use pitstop_test_model::{TestChatProvider, TestLogSink};
use tokio::time::timeout;

use super::*;
use crate::transcript::{FALLBACK_REPLY, GREETING};

fn texts(controller: &Controller) -> Vec<(Sender, String)> {
    controller
        .transcript()
        .iter()
        .map(|m| (m.sender(), m.text().to_owned()))
        .collect()
}

fn greeting() -> (Sender, String) {
    (Sender::Chatbot, GREETING.to_owned())
}

#[test]
fn test_initial_state() {
    let controller =
        ControllerBuilder::with_chat_provider(TestChatProvider::default())
            .build();
    assert_eq!(texts(&controller), vec![greeting()]);
    assert_eq!(controller.pending_input(), "");
    assert_eq!(controller.stage(), Stage::Idle);
    assert!(!controller.is_logging());
}

#[tokio::test]
async fn test_reply() {
    let provider = TestChatProvider::default();
    provider.add_reply("Check the battery.");
    let mut controller =
        ControllerBuilder::with_chat_provider(provider.clone()).build();

    controller.set_pending_input("engine won't start");
    assert_eq!(controller.submit().await, SubmitOutcome::Replied);

    assert_eq!(
        texts(&controller),
        vec![
            greeting(),
            (Sender::User, "engine won't start".to_owned()),
            (Sender::Chatbot, "Check the battery.".to_owned()),
        ]
    );
    assert_eq!(controller.pending_input(), "");
    assert_eq!(controller.stage(), Stage::Idle);
    assert_eq!(provider.requests(), vec!["engine won't start"]);
}

#[tokio::test]
async fn test_fallback() {
    let provider = TestChatProvider::default();
    provider.add_failure(ErrorKind::BadStatus);
    let mut controller =
        ControllerBuilder::with_chat_provider(provider).build();

    controller.set_pending_input("weird noise");
    assert_eq!(controller.submit().await, SubmitOutcome::Fallback);

    assert_eq!(
        texts(&controller),
        vec![
            greeting(),
            (Sender::User, "weird noise".to_owned()),
            (Sender::Chatbot, FALLBACK_REPLY.to_owned()),
        ]
    );
    assert_eq!(controller.pending_input(), "");
    assert_eq!(controller.stage(), Stage::Idle);
}

#[tokio::test]
async fn test_empty_input() {
    let provider = TestChatProvider::default();
    provider.add_reply("unused");
    let mut controller =
        ControllerBuilder::with_chat_provider(provider.clone()).build();

    for input in ["", "   ", "\n\t"] {
        controller.set_pending_input(input);
        assert_eq!(controller.submit().await, SubmitOutcome::EmptyInput);
        assert_eq!(controller.pending_input(), input);
    }

    assert_eq!(texts(&controller), vec![greeting()]);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_untrimmed_input_is_kept() {
    let provider = TestChatProvider::default();
    provider.add_reply("Which one?");
    let mut controller =
        ControllerBuilder::with_chat_provider(provider.clone()).build();

    controller.set_pending_input("  a light is on ");
    controller.submit().await;

    let messages = controller.transcript().messages();
    assert_eq!(messages[1].text(), "  a light is on ");
    assert_eq!(provider.requests(), vec!["  a light is on "]);
}

#[tokio::test]
async fn test_transcript_only_grows() {
    let provider = TestChatProvider::default();
    provider.add_reply("Check the battery.");
    provider.add_failure(ErrorKind::Network);
    provider.add_reply("Check the brake pads.");
    provider.add_failure(ErrorKind::MalformedPayload);
    provider.add_reply("   ");
    let mut controller =
        ControllerBuilder::with_chat_provider(provider).build();

    let inputs = [
        "engine won't start",
        "",
        "weird noise",
        "squeaky brakes",
        "  ",
        "dashboard light",
        "smoke",
    ];
    let mut before = texts(&controller);
    for input in inputs {
        controller.set_pending_input(input);
        let outcome = controller.submit().await;

        let after = texts(&controller);
        assert!(after.starts_with(&before), "history was rewritten");
        let appended = &after[before.len()..];
        match outcome {
            SubmitOutcome::EmptyInput => assert!(appended.is_empty()),
            SubmitOutcome::Replied | SubmitOutcome::Fallback => {
                assert_eq!(appended.len(), 2);
                assert_eq!(appended[0], (Sender::User, input.to_owned()));
                assert_eq!(appended[1].0, Sender::Chatbot);
            }
        }
        assert_eq!(after[0], greeting());
        before = after;
    }

    // The blank reply counts as a failure.
    assert_eq!(before.last().unwrap().1, FALLBACK_REPLY);
    assert_eq!(before.len(), 1 + 2 * 5);
}

#[tokio::test]
async fn test_logging() {
    let provider = TestChatProvider::default();
    provider.add_reply("Check the battery.");
    provider.add_failure(ErrorKind::Network);
    let sink = TestLogSink::default();
    let mut controller = ControllerBuilder::with_chat_provider(provider)
        .with_log_sink(sink.clone())
        .build();
    assert!(controller.is_logging());

    controller.set_pending_input("engine won't start");
    controller.submit().await;
    controller.flush_logs().await;

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.sender == Sender::User
        && r.message == "engine won't start"));
    assert!(records.iter().any(|r| r.sender == Sender::Chatbot
        && r.message == "Check the battery."));

    // A failed turn only logs the user message.
    controller.set_pending_input("weird noise");
    controller.submit().await;
    controller.flush_logs().await;

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].sender, Sender::User);
    assert_eq!(records[2].message, "weird noise");
}

#[tokio::test]
async fn test_failing_log_sink() {
    let sink = TestLogSink::default();
    sink.set_failing(true);

    let mut outcomes = vec![];
    for sink in [None, Some(sink.clone())] {
        let provider = TestChatProvider::default();
        provider.add_reply("Check the battery.");
        let mut builder =
            ControllerBuilder::with_chat_provider(provider.clone());
        if let Some(sink) = sink {
            builder = builder.with_log_sink(sink);
        }
        let mut controller = builder.build();

        controller.set_pending_input("engine won't start");
        controller.submit().await;
        controller.flush_logs().await;

        assert_eq!(provider.requests(), vec!["engine won't start"]);
        assert_eq!(controller.pending_input(), "");
        outcomes.push(texts(&controller));
    }

    assert_eq!(outcomes[0], outcomes[1]);
    assert_eq!(sink.records().len(), 2);
}

#[tokio::test]
async fn test_stalled_log_sink() {
    let provider = TestChatProvider::default();
    provider.add_reply("Check the battery.");
    let sink = TestLogSink::default();
    sink.set_stalled(true);
    let mut controller = ControllerBuilder::with_chat_provider(provider)
        .with_log_sink(sink)
        .build();

    controller.set_pending_input("engine won't start");
    let outcome = timeout(Duration::from_secs(1), controller.submit())
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Replied);
    assert_eq!(controller.transcript().len(), 3);
}

#[tokio::test]
async fn test_on_message() {
    let provider = TestChatProvider::default();
    provider.add_reply("Check the battery.");
    let seen = Arc::new(Mutex::new(vec![]));
    let mut controller = ControllerBuilder::with_chat_provider(provider)
        .on_message({
            let seen = Arc::clone(&seen);
            move |message| {
                seen.lock().unwrap().push(message.clone());
            }
        })
        .build();

    controller.set_pending_input("engine won't start");
    controller.submit().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &controller.transcript().messages()[1..]);
}

#[tokio::test(start_paused = true)]
async fn test_interrupted_turn() {
    let provider = TestChatProvider::default();
    provider.set_delay(Duration::from_secs(10));
    provider.add_reply("never seen");
    provider.add_reply("Check the belt.");
    let mut controller =
        ControllerBuilder::with_chat_provider(provider.clone()).build();

    controller.set_pending_input("weird noise");
    let res = timeout(Duration::from_millis(10), controller.submit()).await;
    assert!(res.is_err());
    assert_eq!(controller.stage(), Stage::Submitting);
    assert_eq!(controller.pending_input(), "weird noise");
    assert_eq!(controller.transcript().len(), 2);

    // The interrupted turn is closed, its input is not sent again.
    assert_eq!(controller.submit().await, SubmitOutcome::EmptyInput);
    assert_eq!(
        texts(&controller),
        vec![
            greeting(),
            (Sender::User, "weird noise".to_owned()),
            (Sender::Chatbot, FALLBACK_REPLY.to_owned()),
        ]
    );
    assert_eq!(controller.pending_input(), "");
    assert_eq!(controller.stage(), Stage::Idle);
    assert_eq!(provider.requests(), vec!["weird noise"]);

    controller.set_pending_input("still squealing");
    assert_eq!(controller.submit().await, SubmitOutcome::Replied);
    assert_eq!(controller.transcript().len(), 5);
    assert_eq!(
        controller.transcript().last().unwrap().text(),
        "Check the belt."
    );
    assert_eq!(provider.requests(), vec!["weird noise", "still squealing"]);
}
