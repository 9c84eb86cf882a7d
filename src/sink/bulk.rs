use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::SinkError;
use super::observer::{LogObserver, SinkObserver};
use super::payload::encode_bulk;
use super::response::{SendOutcome, interpret};
use super::transport::{SignedTransport, WireRequest};
use crate::config::SinkConfig;
use crate::domain::Route;
use crate::streaming::Batch;

/// Aggregated totals across every send issued by one sink
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SinkReport {
    pub batches: usize,
    pub attempted: usize,
    pub successful: usize,
    pub failed: usize,
    pub rejected_requests: usize,
    pub transport_failures: usize,
}

/// Bulk-write sink with a hard cap on in-flight sends.
///
/// `submit` suspends until one of the concurrency tokens frees up; that
/// suspension is the pipeline's backpressure. Each send runs as its own
/// task and releases its token once the outcome is known, so the cap holds
/// across the whole run, not per call.
pub struct BulkSink<T>
where
    T: SignedTransport,
{
    transport: Arc<T>,
    config: Arc<SinkConfig>,
    observer: Arc<dyn SinkObserver>,
    permits: Arc<Semaphore>,
    in_flight: Vec<JoinHandle<Result<SendOutcome, SinkError>>>,
    report: SinkReport,
}

impl<T> BulkSink<T>
where
    T: SignedTransport,
{
    /// Create a sink that reports outcomes through the default log observer.
    pub fn new(transport: T, config: SinkConfig) -> Self {
        let observer = LogObserver::new(config.log_success_responses, config.log_failed_responses);
        Self::with_observer(transport, config, Arc::new(observer))
    }

    /// Create a sink reporting to a caller-provided observer.
    pub fn with_observer(
        transport: T,
        config: SinkConfig,
        observer: Arc<dyn SinkObserver>,
    ) -> Self {
        let limit = config.concurrency.max(1);
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            observer,
            permits: Arc::new(Semaphore::new(limit)),
            in_flight: Vec::new(),
            report: SinkReport::default(),
        }
    }

    /// Submit a batch, suspending until a concurrency token is available.
    ///
    /// Returns an error only when an already-completed send failed fatally;
    /// per-request failures become outcomes and never stop the run.
    pub async fn submit(&mut self, batch: Batch<Route>) -> Result<(), SinkError> {
        self.reap_finished().await?;

        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("concurrency pool closed");
        let transport = Arc::clone(&self.transport);
        let config = Arc::clone(&self.config);
        let observer = Arc::clone(&self.observer);

        debug!(records = batch.len(), "dispatching batch");
        self.in_flight.push(tokio::spawn(async move {
            let outcome = send_batch(transport.as_ref(), &config, &batch).await;
            if let Ok(outcome) = &outcome {
                observer.on_outcome(outcome);
            }
            drop(permit);
            outcome
        }));
        Ok(())
    }

    /// Send one batch inline, holding a concurrency token for the duration.
    ///
    /// The outcome is handed back to the caller and still folded into the
    /// aggregated report, like any spawned send.
    pub async fn send_now(&mut self, batch: Batch<Route>) -> Result<SendOutcome, SinkError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("concurrency pool closed");
        let outcome = send_batch(self.transport.as_ref(), &self.config, &batch).await?;
        self.observer.on_outcome(&outcome);
        tally(&mut self.report, outcome.clone());
        Ok(outcome)
    }

    /// Await every in-flight send and return the aggregated report.
    ///
    /// A fatal error surfaces only after all sends have settled, so nothing
    /// already on the wire is abandoned mid-flight.
    pub async fn finish(mut self) -> Result<SinkReport, SinkError> {
        let mut fatal = None;
        for handle in self.in_flight.drain(..) {
            match handle.await {
                Ok(Ok(outcome)) => tally(&mut self.report, outcome),
                Ok(Err(error)) => {
                    warn!(error = %error, "bulk send failed fatally");
                    fatal.get_or_insert(error);
                }
                Err(join_error) => {
                    warn!(error = %join_error, "send task aborted");
                    fatal.get_or_insert(SinkError::TaskJoin(join_error.to_string()));
                }
            }
        }
        match fatal {
            Some(error) => Err(error),
            None => Ok(self.report),
        }
    }

    /// Fold already-completed sends into the report without blocking on the
    /// rest.
    async fn reap_finished(&mut self) -> Result<(), SinkError> {
        let mut index = 0;
        while index < self.in_flight.len() {
            if self.in_flight[index].is_finished() {
                let handle = self.in_flight.swap_remove(index);
                match handle.await {
                    Ok(Ok(outcome)) => tally(&mut self.report, outcome),
                    Ok(Err(error)) => return Err(error),
                    Err(join_error) => return Err(SinkError::TaskJoin(join_error.to_string())),
                }
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}

fn tally(report: &mut SinkReport, outcome: SendOutcome) {
    report.batches += 1;
    match outcome {
        SendOutcome::Indexed {
            attempted,
            successful,
            failed,
        } => {
            report.attempted += attempted;
            report.successful += successful;
            report.failed += failed;
        }
        SendOutcome::Rejected { .. } => report.rejected_requests += 1,
        SendOutcome::TransportFailed { .. } => report.transport_failures += 1,
    }
}

/// Encode, send, and interpret one batch.
async fn send_batch<T>(
    transport: &T,
    config: &SinkConfig,
    batch: &Batch<Route>,
) -> Result<SendOutcome, SinkError>
where
    T: SignedTransport,
{
    let body = encode_bulk(batch.records(), &config.index_prefix, &config.doc_type)?;
    match transport.send(WireRequest::bulk(body)).await {
        Ok(response) => interpret(&response),
        Err(error) => Ok(SendOutcome::TransportFailed {
            message: error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{RawRow, decode_route};
    use crate::sink::error::TransportError;
    use crate::sink::transport::WireResponse;
    use crate::streaming::BatchAccumulator;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn batch_of(records: usize) -> Batch<Route> {
        let mut accumulator = BatchAccumulator::new(records);
        for index in 0..records {
            let line = format!("AA,{index},JFK,1,LAX,2,,0,738");
            let added = accumulator.add(decode_route(&RawRow::from_line(&line)));
            if let Some(batch) = added {
                return batch;
            }
        }
        accumulator.drain().expect("at least one record")
    }

    fn items_body(count: usize, failing: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|index| {
                let status = if index < failing { 404 } else { 201 };
                format!(r#"{{"index":{{"status":{status}}}}}"#)
            })
            .collect();
        format!(r#"{{"errors":false,"items":[{}]}}"#, items.join(","))
    }

    /// Test transport that derives per-item responses from the payload.
    struct StubTransport {
        status: u16,
        failing_items: usize,
        raw_body: Option<String>,
        refuse: bool,
    }

    impl StubTransport {
        fn ok() -> Self {
            Self {
                status: 200,
                failing_items: 0,
                raw_body: None,
                refuse: false,
            }
        }
    }

    #[async_trait]
    impl SignedTransport for StubTransport {
        async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
            if self.refuse {
                return Err(TransportError::Connection("refused".to_string()));
            }
            let body = match &self.raw_body {
                Some(raw) => raw.clone(),
                None => {
                    let pairs = request.body.iter().filter(|&&byte| byte == b'\n').count() / 2;
                    items_body(pairs, self.failing_items)
                }
            };
            Ok(WireResponse::new(self.status, Bytes::from(body)))
        }
    }

    #[tokio::test]
    async fn aggregates_outcomes_across_batches() {
        let mut sink = BulkSink::new(StubTransport::ok(), SinkConfig::default());

        sink.submit(batch_of(3)).await.unwrap();
        sink.submit(batch_of(2)).await.unwrap();
        let report = sink.finish().await.unwrap();

        assert_eq!(report.batches, 2);
        assert_eq!(report.attempted, 5);
        assert_eq!(report.successful, 5);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn send_now_returns_the_outcome_inline() {
        let mut sink = BulkSink::new(StubTransport::ok(), SinkConfig::default());

        let outcome = sink.send_now(batch_of(2)).await.unwrap();
        assert_eq!(
            outcome,
            SendOutcome::Indexed {
                attempted: 2,
                successful: 2,
                failed: 0
            }
        );

        let report = sink.finish().await.unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(report.attempted, 2);
    }

    #[tokio::test]
    async fn item_failures_are_counted_not_fatal() {
        let transport = StubTransport {
            failing_items: 1,
            ..StubTransport::ok()
        };
        let mut sink = BulkSink::new(transport, SinkConfig::default());

        sink.submit(batch_of(3)).await.unwrap();
        let report = sink.finish().await.unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn rejected_requests_are_counted_not_fatal() {
        let transport = StubTransport {
            status: 503,
            raw_body: Some(r#"{"error":"unavailable","items":[]}"#.to_string()),
            ..StubTransport::ok()
        };
        let mut sink = BulkSink::new(transport, SinkConfig::default());

        sink.submit(batch_of(2)).await.unwrap();
        let report = sink.finish().await.unwrap();

        assert_eq!(report.rejected_requests, 1);
        assert_eq!(report.attempted, 0);
    }

    #[tokio::test]
    async fn transport_failures_are_counted_not_fatal() {
        let transport = StubTransport {
            refuse: true,
            ..StubTransport::ok()
        };
        let mut sink = BulkSink::new(transport, SinkConfig::default());

        sink.submit(batch_of(2)).await.unwrap();
        sink.submit(batch_of(1)).await.unwrap();
        let report = sink.finish().await.unwrap();

        assert_eq!(report.transport_failures, 2);
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn unparseable_response_surfaces_at_finish() {
        let transport = StubTransport {
            raw_body: Some("<html>gateway timeout</html>".to_string()),
            ..StubTransport::ok()
        };
        let mut sink = BulkSink::new(transport, SinkConfig::default());

        sink.submit(batch_of(1)).await.unwrap();
        let result = sink.finish().await;

        assert!(matches!(result, Err(SinkError::Protocol(_))));
    }

    /// Transport that tracks how many sends overlap.
    struct GaugeTransport {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl SignedTransport for GaugeTransport {
        async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let pairs = request.body.iter().filter(|&&byte| byte == b'\n').count() / 2;
            tokio::time::sleep(Duration::from_millis(5 + (pairs as u64 % 7))).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(WireResponse::new(200, Bytes::from(items_body(pairs, 0))))
        }
    }

    #[tokio::test]
    async fn never_exceeds_the_concurrency_cap() {
        let transport = GaugeTransport {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let config = SinkConfig {
            concurrency: 3,
            ..SinkConfig::default()
        };
        let mut sink = BulkSink::new(transport, config);

        for size in 1..=12 {
            sink.submit(batch_of(size)).await.unwrap();
        }
        let gauge = Arc::clone(&sink.transport);
        let report = sink.finish().await.unwrap();

        assert_eq!(report.batches, 12);
        assert!(gauge.peak.load(Ordering::SeqCst) <= 3);
        assert!(gauge.peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn default_concurrency_serializes_sends() {
        let transport = GaugeTransport {
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let mut sink = BulkSink::new(transport, SinkConfig::default());

        for _ in 0..4 {
            sink.submit(batch_of(2)).await.unwrap();
        }
        let gauge = Arc::clone(&sink.transport);
        let report = sink.finish().await.unwrap();

        assert_eq!(report.batches, 4);
        assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    }
}
