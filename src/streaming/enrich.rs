use chrono::{DateTime, Utc};
use futures::future::{Either, ready};
use futures::{Future, FutureExt, Stream, StreamExt};

use crate::domain::Route;

/// Stamps every record of a run with one shared ingestion timestamp
#[derive(Debug, Clone, Copy)]
pub struct Stamper {
    timestamp: DateTime<Utc>,
}

impl Stamper {
    /// Capture the current time as the run timestamp.
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }

    /// Use a fixed run timestamp.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    pub fn stamp(&self, mut record: Route) -> Route {
        record.timestamp = Some(self.timestamp);
        record
    }
}

impl Default for Stamper {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill in the derived lookup key for a route.
///
/// The key is only derivable when the airline and both airports are known;
/// otherwise the record passes through without one.
pub fn derive_route_key(mut record: Route) -> Route {
    if !record.airline.is_empty()
        && !record.source_airport.is_empty()
        && !record.destination_airport.is_empty()
    {
        record.route_key = Some(format!(
            "{}:{}->{}",
            record.airline, record.source_airport, record.destination_airport
        ));
    }
    record
}

/// Apply an async enrichment to every `Ok` record with up to `limit`
/// computations in flight, preserving stream order.
///
/// Errors pass through untouched, in their original position. Output order
/// always matches input order no matter which computations finish first.
pub fn enrich_ordered<S, F, Fut, R, E>(
    records: S,
    limit: usize,
    mut enrich: F,
) -> impl Stream<Item = Result<R, E>>
where
    S: Stream<Item = Result<R, E>>,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = R>,
{
    records
        .map(move |result| match result {
            Ok(record) => Either::Left(enrich(record).map(Ok)),
            Err(error) => Either::Right(ready(Err(error))),
        })
        .buffered(limit.max(1))
}
