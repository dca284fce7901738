// Error taxonomy for the crate. Every failure the orchestrator can see is
// one of these variants; the binary converts them to an exit code at the
// top level instead of letting anything crash uncaught.

use thiserror::Error;

/// Errors surfaced by gist operations.
#[derive(Error, Debug)]
pub enum GistError {
    /// The host rejected the supplied secret key (HTTP 401).
    #[error("bad credentials, check your secret key")]
    BadCredentials,

    /// The inquired resource is off-limits for this credential (HTTP 403).
    #[error("forbidden resource")]
    Forbidden,

    /// The inquired gist does not exist (HTTP 404).
    #[error("the inquired gist was not found")]
    NotFound,

    /// Syntactically valid request the server refuses to process (HTTP 422).
    #[error("request unprocessable by the host")]
    Unprocessable,

    /// A required companion argument was missing, e.g. the gist id for an
    /// update. Raised before any request is issued.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The host answered with a status code this client does not understand.
    /// Indicates an API contract mismatch and is never swallowed.
    #[error("undefined response from host (HTTP {0}), please open an issue")]
    UnexpectedStatus(u16),

    /// Transport-level failure before a status code was available.
    #[error("connection error, please check your internet connection")]
    Connectivity(#[source] reqwest::Error),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GistError>;
