use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::Event;

/// Payload sent to the error-reporting endpoint.
///
/// Serializes as `{"correlationId": ..., "breadcrumbs": [...], "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Identifier tying the report to the failed operation.
    pub correlation_id: String,
    /// The breadcrumb timeline at the moment of failure, oldest first.
    pub breadcrumbs: Vec<Event>,
    /// Caller-supplied error details.
    pub error: Value,
}

impl ErrorReport {
    /// Assembles a report.
    #[must_use]
    pub fn new(correlation_id: impl Into<String>, breadcrumbs: Vec<Event>, error: Value) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            breadcrumbs,
            error,
        }
    }
}
