pub mod bulk;
pub mod error;
pub mod observer;
pub mod payload;
pub mod response;
pub mod transport;

// Re-export commonly used types
pub use bulk::{BulkSink, SinkReport};
pub use error::{SinkError, TransportError};
pub use observer::{LogObserver, NullObserver, SinkObserver};
pub use response::{BulkResponse, SendOutcome, interpret};
pub use transport::{BULK_PATH, HttpTransport, SignedTransport, WireRequest, WireResponse};
