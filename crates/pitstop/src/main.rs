//! A terminal front-end for the car troubleshooting assistant.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pitstop::core::Sender;
use pitstop::core::transcript::Message;
use pitstop::{AppConfig, AssistantBuilder};
use pitstop::core::Session;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

enum UiEvent {
    Message(Message),
    Idle,
}

const BAR_CHAR: &str = "▎";
const LOG_FLUSH_LIMIT: Duration = Duration::from_secs(5);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let assistant = AssistantBuilder::from_config(&config)
        .on_message({
            let event_tx = event_tx.clone();
            move |message| {
                event_tx.send(UiEvent::Message(message.clone())).ok();
            }
        })
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(UiEvent::Idle).ok();
            }
        })
        .build();
    let session = assistant.session();

    if let Err(err) = assistant.probe().await {
        let bar = BAR_CHAR.bright_yellow();
        println!("{bar}⚠️  The diagnostic service is unreachable: {err}");
    }

    match session.transcript().await {
        Ok(transcript) => {
            for message in &transcript {
                print_message(message);
            }
        }
        Err(err) => {
            error!("cannot read the transcript: {err}");
            return;
        }
    }

    let template = ProgressStyle::with_template("{spinner} {wide_msg}");
    let progress_style = match template {
        Ok(style) => style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        Err(err) => {
            error!("invalid progress template: {err}");
            ProgressStyle::default_spinner()
        }
    };

    let mut stdin = io::BufReader::new(io::stdin());

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        // Only the line break is dropped, the controller sees the rest
        // of the input as typed.
        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            continue;
        }
        if session.send_message(input).is_err() {
            error!("the session has stopped");
            break;
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("🔧 Diagnosing...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                UiEvent::Message(message) => {
                    // The user already sees what they typed.
                    if message.sender() == Sender::Chatbot {
                        print_message(&message);
                    }
                }
                UiEvent::Idle => {
                    break;
                }
            }
        }
    }

    flush_logs(session, LOG_FLUSH_LIMIT).await;
}

/// Waits for pending log dispatches, but no longer than `limit`.
///
/// Returns whether all of them settled in time.
async fn flush_logs(session: &Session, limit: Duration) -> bool {
    match timeout(limit, session.flush_logs()).await {
        Ok(Ok(())) => true,
        Ok(Err(_)) => {
            warn!("the session stopped before its logs were flushed");
            false
        }
        Err(_) => {
            warn!("gave up waiting for logs after {limit:?}");
            false
        }
    }
}

fn print_message(message: &Message) {
    match message.sender() {
        Sender::Chatbot => println!(
            "{}🤖 {}",
            BAR_CHAR.bright_cyan(),
            message.text().bright_white()
        ),
        Sender::User => {
            println!("{}{}", BAR_CHAR.bright_green(), message.text())
        }
    }
}

async fn read_line<R>(input: &mut R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();

    match input.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
