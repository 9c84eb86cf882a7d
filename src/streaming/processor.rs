use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use super::batcher::BatchAccumulator;
use super::enrich::{Stamper, derive_route_key, enrich_ordered};
use super::error::PipelineError;
use crate::config::PipelineConfig;
use crate::io::{IoError, RowStream, decode_route};
use crate::sink::{BulkSink, SignedTransport, SinkReport};
use crate::source::SourceError;

/// Summary of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Records decoded and delivered to the batching stage.
    pub records: usize,
    /// Batches handed to the sink, including the final partial one.
    pub batches: usize,
    /// Aggregated send totals from the sink.
    pub sink: SinkReport,
}

impl PipelineReport {
    /// True when every decoded record was indexed and no request was lost.
    pub fn fully_indexed(&self) -> bool {
        self.sink.successful == self.records
            && self.sink.failed == 0
            && self.sink.rejected_requests == 0
            && self.sink.transport_failures == 0
    }
}

/// The assembled pipeline: row reassembly, decoding, enrichment, batching,
/// and the bulk sink, in that order.
///
/// The run is single-pass and order-preserving. The only suspension points
/// are the sink's token acquisition and the sends themselves, so upstream
/// reading slows down exactly when the sink is saturated.
pub struct RoutePipeline<T>
where
    T: SignedTransport,
{
    config: PipelineConfig,
    sink: BulkSink<T>,
}

impl<T> RoutePipeline<T>
where
    T: SignedTransport,
{
    pub fn new(config: PipelineConfig, sink: BulkSink<T>) -> Self {
        Self { config, sink }
    }

    /// Drive the pipeline from a chunk stream to completion.
    ///
    /// A failing source still gets every already-reassembled row decoded,
    /// batched, and delivered before its error surfaces. Fatal stream errors
    /// abandon the partial batch but wait for in-flight sends to settle.
    pub async fn run<S>(self, chunks: S) -> Result<PipelineReport, PipelineError>
    where
        S: Stream<Item = Result<Bytes, SourceError>>,
    {
        // Destructure self to get ownership of all fields
        let RoutePipeline { config, mut sink } = self;

        let stamper = Stamper::new();
        let rows = RowStream::new(chunks);
        let decoded = rows.map(move |result| result.map(|row| stamper.stamp(decode_route(&row))));
        let enriched = enrich_ordered(decoded, config.concurrency, |record| async move {
            derive_route_key(record)
        });
        let mut enriched = Box::pin(enriched);

        let mut accumulator = BatchAccumulator::new(config.max_batch);
        let mut records = 0usize;
        let mut batches = 0usize;

        while let Some(result) = enriched.next().await {
            match result {
                Ok(record) => {
                    records += 1;
                    if let Some(batch) = accumulator.add(record) {
                        batches += 1;
                        if let Err(error) = sink.submit(batch).await {
                            warn!(
                                records,
                                buffered = accumulator.len(),
                                "abandoning run on fatal sink error"
                            );
                            sink.finish().await.ok();
                            return Err(error.into());
                        }
                    }
                }
                Err(error @ IoError::Source(_)) => {
                    // Deliver what the failing source already produced, then
                    // surface its error.
                    if let Some(batch) = accumulator.drain() {
                        batches += 1;
                        if let Err(sink_error) = sink.submit(batch).await {
                            sink.finish().await.ok();
                            return Err(sink_error.into());
                        }
                    }
                    sink.finish().await?;
                    info!(records, batches, "source failed after partial delivery");
                    return Err(error.into());
                }
                Err(error) => {
                    warn!(
                        records,
                        buffered = accumulator.len(),
                        "abandoning partial batch on fatal stream error"
                    );
                    sink.finish().await.ok();
                    return Err(error.into());
                }
            }
        }

        if let Some(batch) = accumulator.drain() {
            batches += 1;
            sink.submit(batch).await?;
        }
        let sink_report = sink.finish().await?;

        debug!(records, batches, "pipeline complete");
        Ok(PipelineReport {
            records,
            batches,
            sink: sink_report,
        })
    }
}
