use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::error::SourceError;

/// Chunk stream over a local file, mainly for replaying saved datasets
pub struct FileChunkStream {
    inner: ReaderStream<File>,
}

impl FileChunkStream {
    /// Open `path` and stream its contents in read-sized chunks.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self {
            inner: ReaderStream::new(file),
        })
    }
}

impl Stream for FileChunkStream {
    type Item = Result<Bytes, SourceError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.inner)
            .poll_next(cx)
            .map(|chunk| chunk.map(|result| result.map_err(SourceError::from)))
    }
}
