pub mod route;

// Re-export commonly used types
pub use route::{Codeshare, Route};
