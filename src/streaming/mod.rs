pub mod batcher;
pub mod enrich;
pub mod error;
pub mod processor;

// Re-export commonly used types
pub use batcher::{Batch, BatchAccumulator};
pub use enrich::{Stamper, derive_route_key, enrich_ordered};
pub use error::PipelineError;
pub use processor::{PipelineReport, RoutePipeline};
