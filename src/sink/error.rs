use thiserror::Error;

/// Transport-level failures from the signed-send collaborator
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// Fatal sink errors. Per-request failures are not errors; they surface as
/// send outcomes so the run can continue.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to serialize bulk payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed bulk response: {0}")]
    Protocol(String),

    #[error("send task failed: {0}")]
    TaskJoin(String),
}
