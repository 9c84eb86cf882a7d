//! Prelude module for convenient imports
//!
//! Import everything you need with: `use routeflow::prelude::*;`

// Domain types
pub use crate::domain::{Codeshare, Route};

// Configuration
pub use crate::config::{ConfigError, PipelineConfig, SinkConfig, bulk_endpoint_from_env};

// Source types
pub use crate::source::{ChunkStream, FileChunkStream, ROUTES_URL, SourceError, download};

// IO types
pub use crate::io::{IoError, RawRow, RowAssembler, RowStream, decode_route, write_ndjson};

// Streaming types
pub use crate::streaming::{
    Batch, BatchAccumulator, PipelineError, PipelineReport, RoutePipeline, Stamper,
    derive_route_key, enrich_ordered,
};

// Sink types
pub use crate::sink::{
    BulkSink, HttpTransport, LogObserver, NullObserver, SendOutcome, SignedTransport, SinkError,
    SinkObserver, SinkReport, TransportError, WireRequest, WireResponse,
};

// App types
pub use crate::app::{AppError, CliApp};
