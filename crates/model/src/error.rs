use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be delivered, or the connection broke
    /// before a response arrived.
    Network,
    /// The request did not settle within the configured time.
    Timeout,
    /// The service answered with a non-success status.
    BadStatus,
    /// The service answered, but not with the expected payload.
    MalformedPayload,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "Network error"),
            ErrorKind::Timeout => write!(f, "Timed out"),
            ErrorKind::BadStatus => write!(f, "Bad status"),
            ErrorKind::MalformedPayload => write!(f, "Malformed payload"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
