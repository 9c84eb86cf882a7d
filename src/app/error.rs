use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::io::IoError;
use crate::sink::TransportError;
use crate::source::SourceError;
use crate::streaming::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("stream error: {0}")]
    Stream(#[from] IoError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            AppError::InvalidArguments("unknown flag".to_string()).to_string(),
            "Invalid arguments: unknown flag"
        );
        assert_eq!(
            AppError::from(ConfigError::MissingEndpoint).to_string(),
            "configuration error: BULK_ENDPOINT is not set"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err = AppError::from(io_err);

        match app_err {
            AppError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn source_error_conversion() {
        let source_err = SourceError::from(io::Error::new(io::ErrorKind::TimedOut, "timeout"));
        let app_err = AppError::from(source_err);

        match app_err {
            AppError::Source(_) => {}
            _ => panic!("Expected Source error variant"),
        }
    }

    #[test]
    fn pipeline_error_conversion() {
        let pipeline_err = PipelineError::from(crate::sink::SinkError::Protocol("bad".to_string()));
        let app_err = AppError::from(pipeline_err);

        match app_err {
            AppError::Pipeline(PipelineError::Sink(_)) => {}
            _ => panic!("Expected Pipeline error variant"),
        }
    }
}
