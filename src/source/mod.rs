pub mod download;
pub mod error;
pub mod file;

// Re-export commonly used types
pub use download::{ChunkStream, ROUTES_URL, download};
pub use error::SourceError;
pub use file::FileChunkStream;
