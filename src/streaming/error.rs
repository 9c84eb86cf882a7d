use thiserror::Error;

use crate::io::IoError;
use crate::sink::SinkError;

/// Errors that terminate a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("row stream failed: {0}")]
    Io(#[from] IoError),

    #[error("bulk sink failed: {0}")]
    Sink(#[from] SinkError),
}
