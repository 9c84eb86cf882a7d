use std::env;

use thiserror::Error;

/// Default number of records per batch
pub const DEFAULT_MAX_BATCH: usize = 500;

/// Default cap on concurrent work (in-flight sends, enrichment fan-out)
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default index-name prefix
pub const DEFAULT_INDEX_PREFIX: &str = "routes-";

/// Default document type tag carried in bulk action lines
pub const DEFAULT_DOC_TYPE: &str = "route";

/// Configuration errors surfaced at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BULK_ENDPOINT is not set")]
    MissingEndpoint,
}

/// Tuning for the streaming pipeline.
///
/// Built from the environment with lenient parsing: anything missing or
/// unusable falls back to the default rather than failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Records per batch; the final batch of a run may be smaller.
    pub max_batch: usize,
    /// Bound on concurrently evaluated enrichment computations.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_batch: DEFAULT_MAX_BATCH,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    /// Read `MAX_BATCH` and `CONCURRENCY` from the environment.
    pub fn from_env() -> Self {
        Self {
            max_batch: lenient_limit(env::var("MAX_BATCH").ok(), DEFAULT_MAX_BATCH),
            concurrency: lenient_limit(env::var("CONCURRENCY").ok(), DEFAULT_CONCURRENCY),
        }
    }
}

/// Settings for the bulk-write sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Cap on bulk requests in flight at once.
    pub concurrency: usize,
    /// Index-name prefix; the record's UTC date is appended per document.
    pub index_prefix: String,
    /// Document type tag for bulk action lines.
    pub doc_type: String,
    /// Log successful responses at info level instead of debug.
    pub log_success_responses: bool,
    /// Include the response detail when logging rejected requests.
    pub log_failed_responses: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            index_prefix: DEFAULT_INDEX_PREFIX.to_string(),
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            log_success_responses: false,
            log_failed_responses: false,
        }
    }
}

impl SinkConfig {
    /// Read `CONCURRENCY`, `INDEX_PREFIX`, `DOC_TYPE` and the response-logging
    /// flags from the environment.
    pub fn from_env() -> Self {
        Self {
            concurrency: lenient_limit(env::var("CONCURRENCY").ok(), DEFAULT_CONCURRENCY),
            index_prefix: env::var("INDEX_PREFIX")
                .unwrap_or_else(|_| DEFAULT_INDEX_PREFIX.to_string()),
            doc_type: env::var("DOC_TYPE").unwrap_or_else(|_| DEFAULT_DOC_TYPE.to_string()),
            log_success_responses: lenient_flag(env::var("LOG_SUCCESS_RESPONSES").ok()),
            log_failed_responses: lenient_flag(env::var("LOG_FAILED_RESPONSES").ok()),
        }
    }
}

/// The remote bulk endpoint. Required; there is no sensible default.
pub fn bulk_endpoint_from_env() -> Result<String, ConfigError> {
    env::var("BULK_ENDPOINT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingEndpoint)
}

/// Lenient limit parse: missing, non-numeric, or zero input falls back to the
/// default instead of erroring.
fn lenient_limit(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|parsed| *parsed >= 1)
        .unwrap_or(default)
}

fn lenient_flag(value: Option<String>) -> bool {
    matches!(value.as_deref().map(str::trim), Some("1") | Some("true"))
}
