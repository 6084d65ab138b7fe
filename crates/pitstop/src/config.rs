use std::env;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use pitstop_http_model::{HttpConfig, HttpConfigBuilder};

const BASE_URL_VAR: &str = "PITSTOP_BASE_URL";
const CHAT_URL_VAR: &str = "PITSTOP_CHAT_URL";
const LOG_URL_VAR: &str = "PITSTOP_LOG_URL";
const LOGGING_VAR: &str = "PITSTOP_LOGGING";
const TIMEOUT_VAR: &str = "PITSTOP_TIMEOUT_SECS";

/// Describes an environment variable with an unusable value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigError {
    variable: &'static str,
    value: String,
    expected: &'static str,
}

impl ConfigError {
    /// Returns the name of the offending variable.
    #[inline]
    pub fn variable(&self) -> &str {
        self.variable
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is set to {:?}, expected {}",
            self.variable, self.value, self.expected
        )
    }
}

impl Error for ConfigError {}

/// Deployment settings of the assistant.
///
/// Unset endpoints fall back to the local service at
/// `http://localhost:8000/api`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AppConfig {
    /// Base URL of the service API.
    pub base_url: Option<String>,
    /// Chat endpoint, overriding the one derived from the base URL.
    pub chat_url: Option<String>,
    /// Log endpoint, overriding the one derived from the base URL.
    pub log_url: Option<String>,
    /// Whether every turn is also sent to the log endpoint.
    pub logging: bool,
    /// Per-request timeout. Requests may take forever if unset.
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Reads the configuration from `PITSTOP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let logging = match non_empty(LOGGING_VAR) {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError {
                variable: LOGGING_VAR,
                value,
                expected: "a boolean such as `true` or `0`",
            })?,
        };

        let timeout = match non_empty(TIMEOUT_VAR) {
            None => None,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError {
                        variable: TIMEOUT_VAR,
                        value,
                        expected: "a positive number of seconds",
                    });
                }
            },
        };

        Ok(Self {
            base_url: non_empty(BASE_URL_VAR),
            chat_url: non_empty(CHAT_URL_VAR),
            log_url: non_empty(LOG_URL_VAR),
            logging,
            timeout,
        })
    }

    /// Builds the configuration of the HTTP providers.
    pub fn http_config(&self) -> HttpConfig {
        let mut builder = match &self.base_url {
            Some(base_url) => HttpConfigBuilder::with_base_url(base_url),
            None => HttpConfigBuilder::default(),
        };
        if let Some(chat_url) = &self.chat_url {
            builder = builder.with_chat_url(chat_url);
        }
        if let Some(log_url) = &self.log_url {
            builder = builder.with_log_url(log_url);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
