use super::chunk::RawRow;
use crate::domain::{Codeshare, Route};

/// Null marker used by the upstream dataset for unavailable fields
const NULL_MARKER: &str = "\\N";

/// Decode one raw row into a route record.
///
/// Decoding is total: missing fields become empty strings and unparseable
/// numerics become `None`, so a malformed row can never halt the stream.
pub fn decode_route(row: &RawRow) -> Route {
    Route {
        airline: text_field(row, 0),
        airline_id: numeric_field(row, 1),
        source_airport: text_field(row, 2),
        source_airport_id: numeric_field(row, 3),
        destination_airport: text_field(row, 4),
        destination_airport_id: numeric_field(row, 5),
        codeshare: match row.field(6) {
            Some("Y") => Codeshare::Carrier,
            _ => Codeshare::Airline,
        },
        stops: numeric_field(row, 7),
        equipment: text_field(row, 8),
        timestamp: None,
        route_key: None,
    }
}

fn text_field(row: &RawRow, index: usize) -> String {
    row.field(index).unwrap_or_default().to_string()
}

fn numeric_field(row: &RawRow, index: usize) -> Option<u32> {
    let value = row.field(index)?;
    if value == NULL_MARKER {
        return None;
    }
    value.parse().ok()
}
