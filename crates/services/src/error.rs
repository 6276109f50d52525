use thiserror::Error;

/// Failure of a single collaborator call. Callers map every variant into a
/// user-visible fallback; none of them is fatal.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("malformed upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub(crate) fn check_status(response: &reqwest::Response) -> Result<(), LookupError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(LookupError::Status(status.as_u16()))
    }
}
