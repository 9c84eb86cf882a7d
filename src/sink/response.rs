use serde::Deserialize;
use serde_json::Value;

use super::error::SinkError;
use super::transport::WireResponse;

/// Structured bulk response, as much of it as the sink consumes
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub errors: bool,
    pub items: Option<Vec<BulkItem>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItem {
    #[serde(default)]
    pub index: BulkItemStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct BulkItemStatus {
    #[serde(default)]
    pub status: u16,
}

/// Result of one bulk send, consumed by observers and the final report
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Request accepted; counts taken from the per-item statuses.
    Indexed {
        attempted: usize,
        successful: usize,
        failed: usize,
    },
    /// Request-level failure: non-2xx status or a raised top-level error
    /// flag. `detail` is the response body with the item list removed.
    Rejected { status: u16, detail: Value },
    /// The send never produced a response.
    TransportFailed { message: String },
}

/// Interpret one bulk response.
///
/// Items with status >= 300 count as failed but leave the request
/// successful. A non-2xx status or a raised error flag rejects the
/// request whatever shape its JSON body has; only a body that is not
/// JSON at all is a fatal protocol error.
pub fn interpret(response: &WireResponse) -> Result<SendOutcome, SinkError> {
    let mut body: Value = serde_json::from_slice(&response.body)
        .map_err(|error| SinkError::Protocol(error.to_string()))?;
    let errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);

    if !response.is_success() || errors {
        // The item list of a rejected response can be as large as the
        // request itself; keep only the outer detail.
        if let Some(outer) = body.as_object_mut() {
            outer.remove("items");
        }
        return Ok(SendOutcome::Rejected {
            status: response.status,
            detail: body,
        });
    }

    let parsed: BulkResponse =
        serde_json::from_value(body).map_err(|error| SinkError::Protocol(error.to_string()))?;
    let items = parsed
        .items
        .ok_or_else(|| SinkError::Protocol("response missing item list".to_string()))?;
    let attempted = items.len();
    let failed = items.iter().filter(|item| item.index.status >= 300).count();
    Ok(SendOutcome::Indexed {
        attempted,
        successful: attempted - failed,
        failed,
    })
}
