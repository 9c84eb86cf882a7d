use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use tracing::info;

use super::error::SourceError;

/// Published OpenFlights routes dataset
pub const ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Boxed chunk stream shared by every byte source
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, SourceError>> + Send>>;

/// Begin downloading `url`, yielding the body as a chunk stream.
///
/// The returned stream surfaces transfer failures in-band so that rows
/// received before the failure can still be processed.
pub async fn download(url: &str) -> Result<ChunkStream, SourceError> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let response = client.get(url).send().await?.error_for_status()?;

    match response.content_length() {
        Some(bytes) => info!(url, size_mb = megabytes(bytes), "downloading source data"),
        None => info!(url, "downloading source data, length unknown"),
    }

    Ok(Box::pin(response.bytes_stream().map_err(SourceError::from)))
}

/// Approximate size in decimal megabytes, to one decimal place.
fn megabytes(bytes: u64) -> f64 {
    (bytes as f64 / 1_000_000.0 * 10.0).round() / 10.0
}
