use std::io;
use std::str::Utf8Error;

use thiserror::Error;

use crate::source::SourceError;

/// IO-level errors for row reassembly and record output
#[derive(Error, Debug)]
pub enum IoError {
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    #[error("source failed: {0}")]
    Source(#[from] SourceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
