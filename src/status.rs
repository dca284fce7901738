// Response classifier: a total mapping from HTTP status codes to a
// human-readable outcome plus the error to raise, if any. Kept separate from
// the transport so it stays a pure function.

use crate::error::{GistError, Result};

/// Outcome of classifying one status code.
#[derive(Debug)]
pub struct StatusOutcome {
    pub message: &'static str,
    pub error: Option<GistError>,
}

/// Classify a status code. Total over all of `u16`; codes the client does
/// not recognize map to [`GistError::UnexpectedStatus`].
pub fn classify(code: u16) -> StatusOutcome {
    let (message, error) = match code {
        200 => ("OK", None),
        201 => ("gist created successfully", None),
        204 => ("OK, no content received", None),
        401 => ("bad credentials", Some(GistError::BadCredentials)),
        403 => ("forbidden resource", Some(GistError::Forbidden)),
        404 => ("resource not found", Some(GistError::NotFound)),
        422 => ("request unprocessable", Some(GistError::Unprocessable)),
        other => ("undefined response", Some(GistError::UnexpectedStatus(other))),
    };
    StatusOutcome { message, error }
}

/// Classify and immediately raise the associated error, if any. Callers get
/// the status message back on the success variants.
pub fn check(code: u16) -> Result<&'static str> {
    let outcome = classify(code);
    match outcome.error {
        Some(err) => Err(err),
        None => Ok(outcome.message),
    }
}
