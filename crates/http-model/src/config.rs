use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Builder for [`HttpConfig`].
///
/// All endpoints are derived from a base URL, and each of them can be
/// overridden on its own. Deployments are known to send chat and log
/// traffic to different hosts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    base_url: String,
    chat_url: Option<String>,
    log_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpConfigBuilder {
    /// Creates a builder with the given base URL, such as
    /// `http://localhost:8000/api`.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            chat_url: None,
            log_url: None,
            timeout: None,
        }
    }

    /// Sets the chat endpoint, instead of `{base_url}/chat`.
    #[inline]
    pub fn with_chat_url<S: Into<String>>(mut self, chat_url: S) -> Self {
        self.chat_url = Some(chat_url.into());
        self
    }

    /// Sets the log endpoint, instead of `{base_url}/log`.
    #[inline]
    pub fn with_log_url<S: Into<String>>(mut self, log_url: S) -> Self {
        self.log_url = Some(log_url.into());
        self
    }

    /// Gives up on requests that take longer than `timeout`.
    ///
    /// There is no timeout unless this is set.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        let base_url = self.base_url.trim_end_matches('/');
        HttpConfig {
            chat_url: self
                .chat_url
                .unwrap_or_else(|| format!("{base_url}/chat")),
            log_url: self.log_url.unwrap_or_else(|| format!("{base_url}/log")),
            probe_url: format!("{base_url}/get"),
            timeout: self.timeout,
        }
    }
}

impl Default for HttpConfigBuilder {
    #[inline]
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

/// Configuration for the HTTP providers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) chat_url: String,
    pub(crate) log_url: String,
    pub(crate) probe_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl HttpConfig {
    /// Returns the chat endpoint.
    #[inline]
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Returns the log endpoint.
    #[inline]
    pub fn log_url(&self) -> &str {
        &self.log_url
    }

    /// Returns the liveness endpoint.
    #[inline]
    pub fn probe_url(&self) -> &str {
        &self.probe_url
    }

    /// Returns the per-request timeout, if any.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_endpoints() {
        let config = HttpConfigBuilder::default().build();
        assert_eq!(config.chat_url(), "http://localhost:8000/api/chat");
        assert_eq!(config.log_url(), "http://localhost:8000/api/log");
        assert_eq!(config.probe_url(), "http://localhost:8000/api/get");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_overrides() {
        let config =
            HttpConfigBuilder::with_base_url("https://diag.example.com/api/")
                .with_log_url("http://localhost:8000/api/log")
                .with_timeout(Duration::from_secs(30))
                .build();
        assert_eq!(config.chat_url(), "https://diag.example.com/api/chat");
        assert_eq!(config.log_url(), "http://localhost:8000/api/log");
        assert_eq!(config.probe_url(), "https://diag.example.com/api/get");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }
}
