use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::SinkError;
use crate::domain::Route;

/// Action line preceding each document in the bulk payload
#[derive(Debug, Serialize)]
struct BulkAction<'a> {
    index: ActionMeta<'a>,
}

#[derive(Debug, Serialize)]
struct ActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_type")]
    doc_type: &'a str,
}

/// Destination index for a record: the prefix plus the record's UTC date.
/// Unstamped records fall back to the current date.
pub fn index_name(prefix: &str, timestamp: Option<DateTime<Utc>>) -> String {
    let date = timestamp.unwrap_or_else(Utc::now);
    format!("{}{}", prefix, date.format("%Y.%m.%d"))
}

/// Encode a batch as newline-delimited action/document line pairs.
pub fn encode_bulk(records: &[Route], prefix: &str, doc_type: &str) -> Result<String, SinkError> {
    let mut payload = String::new();
    for record in records {
        let index = index_name(prefix, record.timestamp);
        let action = BulkAction {
            index: ActionMeta {
                index: &index,
                doc_type,
            },
        };
        payload.push_str(&serde_json::to_string(&action)?);
        payload.push('\n');
        payload.push_str(&serde_json::to_string(record)?);
        payload.push('\n');
    }
    Ok(payload)
}
