//! Routeflow: streaming route ingestion into a remote bulk-write store.
//!
//! The crate turns an arbitrarily-chunked byte stream of delimited route
//! data into enriched JSON documents delivered in bulk:
//! - Reassembly of chunks into complete rows, safe across any split point
//! - Lenient decoding into typed route records that never drops a row
//! - Run-wide timestamp stamping and ordered, bounded enrichment
//! - Fixed-size batch accumulation with an end-of-stream drain
//! - Bulk delivery with a hard cap on in-flight requests

pub mod app;
pub mod config;
pub mod domain;
pub mod io;
pub mod prelude;
pub mod sink;
pub mod source;
pub mod streaming;
