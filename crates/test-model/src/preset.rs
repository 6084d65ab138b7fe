use pitstop_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// How the provider answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetStep {
    #[serde(rename = "reply")]
    Reply(String),
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

/// A failure kind that can be scripted.
///
/// Mirrors [`ErrorKind`], which is not serializable on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    Network,
    Timeout,
    BadStatus,
    MalformedPayload,
    Other,
}

impl From<ErrorKind> for PresetFailure {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Network => PresetFailure::Network,
            ErrorKind::Timeout => PresetFailure::Timeout,
            ErrorKind::BadStatus => PresetFailure::BadStatus,
            ErrorKind::MalformedPayload => PresetFailure::MalformedPayload,
            ErrorKind::Other => PresetFailure::Other,
        }
    }
}

impl From<PresetFailure> for ErrorKind {
    fn from(failure: PresetFailure) -> Self {
        match failure {
            PresetFailure::Network => ErrorKind::Network,
            PresetFailure::Timeout => ErrorKind::Timeout,
            PresetFailure::BadStatus => ErrorKind::BadStatus,
            PresetFailure::MalformedPayload => ErrorKind::MalformedPayload,
            PresetFailure::Other => ErrorKind::Other,
        }
    }
}
