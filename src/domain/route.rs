use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Who operates a route: the listed airline or a codeshare partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codeshare {
    /// Flown by a partner carrier (`Y` in the raw data)
    Carrier,
    /// Flown by the listed airline itself
    Airline,
}

/// One decoded route record with the fixed OpenFlights schema.
///
/// Numeric identifiers are `None` when the source marked them unavailable or
/// the field did not parse. `timestamp` and `route_key` are filled by the
/// enrichment stage and omitted from the wire format until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub airline: String,
    pub airline_id: Option<u32>,
    pub source_airport: String,
    pub source_airport_id: Option<u32>,
    pub destination_airport: String,
    pub destination_airport_id: Option<u32>,
    pub codeshare: Codeshare,
    pub stops: Option<u32>,
    pub equipment: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_key: Option<String>,
}

/// Millisecond-precision RFC 3339, the format the remote store expects.
fn serialize_timestamp<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(timestamp) => {
            serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        None => serializer.serialize_none(),
    }
}
