use thiserror::Error;

/// Classification of the last failure observed during a fetch.
///
/// `Transport` covers anything that died before a status line arrived
/// (DNS, connect, timeout, decode). The two named HTTP variants exist
/// because callers route around them differently: a 403 usually means
/// the source wants a browser, a 429 means back off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    AccessDenied,
    Throttled,
    Http(u16),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "network or timeout error"),
            ErrorKind::AccessDenied => write!(f, "access denied (HTTP 403)"),
            ErrorKind::Throttled => write!(f, "throttled (HTTP 429)"),
            ErrorKind::Http(status) => write!(f, "HTTP {status}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed after {attempts} attempts: {kind}")]
    RetriesExhausted { attempts: u32, kind: ErrorKind },
}

pub type Result<T> = std::result::Result<T, FetchError>;
