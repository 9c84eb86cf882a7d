use tracing::{debug, info, warn};

use super::response::SendOutcome;

/// Observer port for send outcomes, keeping reporting out of the sink logic
pub trait SinkObserver: Send + Sync {
    fn on_outcome(&self, outcome: &SendOutcome);
}

/// Reports outcomes through `tracing`.
///
/// Successes log at debug unless `log_success` raises them to info; the
/// rejection detail is included only when `log_failures` is set.
#[derive(Debug, Default, Clone)]
pub struct LogObserver {
    log_success: bool,
    log_failures: bool,
}

impl LogObserver {
    pub fn new(log_success: bool, log_failures: bool) -> Self {
        Self {
            log_success,
            log_failures,
        }
    }
}

impl SinkObserver for LogObserver {
    fn on_outcome(&self, outcome: &SendOutcome) {
        match outcome {
            SendOutcome::Indexed {
                attempted,
                successful,
                failed,
            } => {
                if *failed > 0 {
                    warn!(attempted, successful, failed, "indexed with item failures");
                } else if self.log_success {
                    info!(attempted, "batch indexed");
                } else {
                    debug!(attempted, "batch indexed");
                }
            }
            SendOutcome::Rejected { status, detail } => {
                if self.log_failures {
                    warn!(status, detail = %detail, "bulk request rejected");
                } else {
                    warn!(status, "bulk request rejected");
                }
            }
            SendOutcome::TransportFailed { message } => {
                warn!(error = %message, "bulk send failed");
            }
        }
    }
}

/// Discards every outcome
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SinkObserver for NullObserver {
    fn on_outcome(&self, _outcome: &SendOutcome) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observers_accept_every_outcome_shape() {
        let outcomes = [
            SendOutcome::Indexed {
                attempted: 2,
                successful: 1,
                failed: 1,
            },
            SendOutcome::Rejected {
                status: 503,
                detail: serde_json::json!({"error": "unavailable"}),
            },
            SendOutcome::TransportFailed {
                message: "refused".to_string(),
            },
        ];

        for outcome in &outcomes {
            LogObserver::new(true, true).on_outcome(outcome);
            LogObserver::default().on_outcome(outcome);
            NullObserver.on_outcome(outcome);
        }
    }
}
