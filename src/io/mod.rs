pub mod chunk;
pub mod decode;
pub mod error;
pub mod ndjson;

// Re-export commonly used types
pub use chunk::{RawRow, RowAssembler, RowStream};
pub use decode::decode_route;
pub use error::IoError;
pub use ndjson::write_ndjson;
