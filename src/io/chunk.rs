use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;

use super::error::IoError;
use crate::source::SourceError;

/// One logical line of input, split into its delimited fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    /// Split a line on the field delimiter.
    pub fn from_line(line: &str) -> Self {
        Self {
            fields: line.split(',').map(str::to_string).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field at `index`, or `None` when the row is too short.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rejoin the fields with the field delimiter.
    pub fn to_line(&self) -> String {
        self.fields.join(",")
    }
}

/// Reassembles arbitrarily-chunked bytes into complete rows.
///
/// A row is complete only once its line terminator has arrived. Bytes after
/// the last terminator of a chunk are held as the pending tail and joined
/// with the next chunk, so a row split anywhere, including mid-character,
/// is reassembled intact. UTF-8 validation runs only over terminated
/// regions; the terminator byte cannot occur inside a multi-byte sequence,
/// so a terminated region is always a complete-character boundary.
#[derive(Debug, Default)]
pub struct RowAssembler {
    tail: Vec<u8>,
}

impl RowAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk and return every row it completed.
    ///
    /// An empty chunk completes nothing, and a chunk without a terminator
    /// only extends the tail. Invalid UTF-8 in a completed region is fatal.
    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<RawRow>, IoError> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }
        self.tail.extend_from_slice(chunk);

        let Some(last_terminator) = self.tail.iter().rposition(|&byte| byte == b'\n') else {
            return Ok(Vec::new());
        };

        let rest = self.tail.split_off(last_terminator + 1);
        let complete = std::mem::replace(&mut self.tail, rest);
        let text = std::str::from_utf8(&complete)?;

        // The slice below drops the final terminator, not a row: interior
        // empty lines still come through as single-field rows.
        let rows = text[..text.len() - 1]
            .split('\n')
            .map(|line| RawRow::from_line(line.strip_suffix('\r').unwrap_or(line)))
            .collect();
        Ok(rows)
    }

    /// Emit the pending tail as a terminal row at end-of-stream.
    pub fn flush(&mut self) -> Result<Option<RawRow>, IoError> {
        if self.tail.is_empty() {
            return Ok(None);
        }
        let tail = std::mem::take(&mut self.tail);
        let text = std::str::from_utf8(&tail)?;
        Ok(Some(RawRow::from_line(text)))
    }

    /// Number of buffered bytes still awaiting a terminator.
    pub fn pending_len(&self) -> usize {
        self.tail.len()
    }
}

pin_project! {
    /// Adapts a chunk stream into a stream of complete rows.
    ///
    /// End-of-stream flushes the pending tail as a terminal row. A failing
    /// source is flushed the same way, and the error surfaces only after
    /// every reassembled row has been delivered.
    pub struct RowStream<S> {
        #[pin]
        source: S,
        assembler: RowAssembler,
        queued: VecDeque<RawRow>,
        pending_error: Option<IoError>,
        done: bool,
    }
}

impl<S> RowStream<S>
where
    S: Stream<Item = Result<Bytes, SourceError>>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            assembler: RowAssembler::new(),
            queued: VecDeque::new(),
            pending_error: None,
            done: false,
        }
    }
}

impl<S> Stream for RowStream<S>
where
    S: Stream<Item = Result<Bytes, SourceError>>,
{
    type Item = Result<RawRow, IoError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(row) = this.queued.pop_front() {
                return Poll::Ready(Some(Ok(row)));
            }
            if *this.done {
                return Poll::Ready(this.pending_error.take().map(Err));
            }
            match this.source.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => match this.assembler.process(&chunk) {
                    Ok(rows) => this.queued.extend(rows),
                    Err(error) => {
                        *this.done = true;
                        return Poll::Ready(Some(Err(error)));
                    }
                },
                Poll::Ready(Some(Err(error))) => {
                    *this.done = true;
                    // An undecodable tail is dropped here; the read error is
                    // the root cause and takes precedence.
                    if let Ok(Some(row)) = this.assembler.flush() {
                        this.queued.push_back(row);
                    }
                    *this.pending_error = Some(IoError::Source(error));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    match this.assembler.flush() {
                        Ok(Some(row)) => this.queued.push_back(row),
                        Ok(None) => {}
                        Err(error) => *this.pending_error = Some(error),
                    }
                }
            }
        }
    }
}
