//! Chat and log providers for the diagnostic service's HTTP API.
//!
//! The service exposes a chat endpoint taking `{"message": ...}` and
//! answering `{"response": ...}`, and a log endpoint taking one record per
//! turn. Endpoint locations come from [`HttpConfig`].

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use pitstop_model::{
    BotReply, ChatProvider, ChatProviderError, ChatRequest, ErrorKind,
    LogRecord, LogSink,
};
use reqwest::{Client, RequestBuilder, Response, header};

pub use config::{HttpConfig, HttpConfigBuilder};
use proto::ChatResponseBody;

/// Error type for [`HttpChatProvider`] and [`HttpLogSink`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_status() {
            ErrorKind::BadStatus
        } else if err.is_decode() {
            ErrorKind::MalformedPayload
        } else {
            ErrorKind::Network
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ChatProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Chat provider backed by the diagnostic service.
#[derive(Clone, Debug)]
pub struct HttpChatProvider {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpChatProvider {
    /// Creates a new `HttpChatProvider` with the given configuration.
    #[inline]
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Creates a log sink that shares the HTTP client and the
    /// configuration of this provider.
    #[inline]
    pub fn log_sink(&self) -> HttpLogSink {
        HttpLogSink {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
        }
    }

    /// Checks whether the service is reachable.
    ///
    /// Succeeds when the liveness endpoint answers with a success status.
    pub async fn probe(&self) -> Result<(), Error> {
        let req = self.client.get(&self.config.probe_url);
        let resp = with_timeout(req, &self.config)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(Error::from_reqwest)?;
        debug!("service is up, probe returned {}", resp.status());
        Ok(())
    }
}

impl ChatProvider for HttpChatProvider {
    type Error = Error;

    fn send_chat_message(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<BotReply, Self::Error>> + Send + 'static
    {
        let body = proto::create_chat_request(req);
        let req = self
            .client
            .post(&self.config.chat_url)
            .header(header::ACCEPT, "application/json")
            .json(&body);
        let resp_fut = with_timeout(req, &self.config).send();

        async move {
            let resp = resp_fut
                .await
                .and_then(Response::error_for_status)
                .map_err(Error::from_reqwest)?;

            // A missing content type is tolerated, a wrong one is not.
            if let Some(content_type) = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
            {
                if !is_json(content_type) {
                    return Err(Error::new(
                        format!("Unexpected content type: {content_type}"),
                        ErrorKind::MalformedPayload,
                    ));
                }
            }

            let body: ChatResponseBody =
                resp.json().await.map_err(Error::from_reqwest)?;
            trace!("got chat response: {body:?}");
            Ok(BotReply {
                text: body.response,
            })
        }
    }
}

/// Log sink backed by the diagnostic service.
///
/// Use [`HttpChatProvider::log_sink`] to create one.
#[derive(Clone, Debug)]
pub struct HttpLogSink {
    client: Client,
    config: Arc<HttpConfig>,
}

impl LogSink for HttpLogSink {
    type Error = Error;

    fn log_turn(
        &self,
        record: &LogRecord,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let body = proto::create_log_request(record);
        let req = self.client.post(&self.config.log_url).json(&body);
        let resp_fut = with_timeout(req, &self.config).send();

        async move {
            // The response body carries nothing we need.
            let resp = resp_fut
                .await
                .and_then(Response::error_for_status)
                .map_err(Error::from_reqwest)?;
            trace!("log record accepted with {}", resp.status());
            Ok(())
        }
    }
}

#[inline]
fn with_timeout(req: RequestBuilder, config: &HttpConfig) -> RequestBuilder {
    match config.timeout {
        Some(timeout) => req.timeout(timeout),
        None => req,
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .parse()
        .map(|m: Mime| {
            m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
        })
        .unwrap_or(false)
}
