use thiserror::Error;

pub type BoardResult<T> = std::result::Result<T, BoardError>;

/// Failures that end the current fetch or bootstrap operation.
///
/// None of these are retried automatically; the panel that triggered the
/// operation shows the message and waits for an explicit retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Request rejected by the transport or answered with a non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    /// Body was not JSON or lacked required fields.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Neither the data island nor the environment named a contest.
    #[error("contest id is missing")]
    MissingContestId,
}

impl BoardError {
    pub fn network(message: impl std::fmt::Display) -> Self {
        Self::Network(message.to_string())
    }

    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedPayload(message.to_string())
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            BoardError::Network(_) => "NETWORK",
            BoardError::MalformedPayload(_) => "PAYLOAD",
            BoardError::MissingContestId => "CONTEST",
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
