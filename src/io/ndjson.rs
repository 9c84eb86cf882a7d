use futures::{Stream, StreamExt, pin_mut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::domain::Route;

/// Write a stream of records as newline-delimited JSON.
///
/// Returns the number of records written. The writer is flushed once at the
/// end rather than per record.
pub async fn write_ndjson<S, W>(records: S, mut writer: W) -> Result<usize, IoError>
where
    S: Stream<Item = Result<Route, IoError>>,
    W: AsyncWrite + Unpin,
{
    pin_mut!(records);
    let mut written = 0usize;
    while let Some(record) = records.next().await {
        let line = serde_json::to_string(&record?)?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        written += 1;
    }
    writer.flush().await?;
    Ok(written)
}
