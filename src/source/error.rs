use std::io;

use thiserror::Error;

/// Errors while acquiring or reading the upstream byte stream
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}
