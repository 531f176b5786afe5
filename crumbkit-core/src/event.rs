//! Breadcrumb event model.
//!
//! An [`Event`] serializes as
//! `{"type":"click","data":{"selector":"#buy"},"timestamp":1700000000000,"correlationId":"req-1"}`.
//! The `correlationId` key is omitted when absent.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::scrub::{PiiScrubber, ScrubError};

/// A single breadcrumb: what happened, when, and which trace it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Variant-specific payload, serialized as the `type` and `data` keys.
    #[serde(flatten)]
    pub data: EventData,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Opaque caller-supplied identifier. Never scrubbed or validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// The closed set of breadcrumb payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventData {
    /// A click on an element.
    Click {
        /// Element selector; scrubbed before storage.
        selector: String,
    },
    /// A route change. Query parameters must already be stripped by the caller.
    Navigation {
        /// Destination URL.
        url: String,
    },
    /// A form submission. Field values are never recorded.
    FormSubmit {
        /// Identifier of the submitted form.
        #[serde(rename = "formId")]
        form_id: String,
    },
    /// A completed network request.
    Network {
        /// Request path, without query string.
        path: String,
        /// HTTP status code of the response.
        #[serde(rename = "statusCode")]
        status_code: u16,
    },
}

impl EventData {
    /// Wire name of the variant, as written in the `type` key.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Navigation { .. } => "navigation",
            Self::FormSubmit { .. } => "form_submit",
            Self::Network { .. } => "network",
        }
    }
}

impl Event {
    /// Builds an event from a payload and timestamp.
    #[must_use]
    pub const fn new(data: EventData, timestamp: i64) -> Self {
        Self {
            data,
            timestamp,
            correlation_id: None,
        }
    }

    /// Builds a `click` event.
    #[must_use]
    pub fn click(selector: impl Into<String>, timestamp: i64) -> Self {
        Self::new(
            EventData::Click {
                selector: selector.into(),
            },
            timestamp,
        )
    }

    /// Builds a `navigation` event.
    #[must_use]
    pub fn navigation(url: impl Into<String>, timestamp: i64) -> Self {
        Self::new(EventData::Navigation { url: url.into() }, timestamp)
    }

    /// Builds a `form_submit` event.
    #[must_use]
    pub fn form_submit(form_id: impl Into<String>, timestamp: i64) -> Self {
        Self::new(
            EventData::FormSubmit {
                form_id: form_id.into(),
            },
            timestamp,
        )
    }

    /// Builds a `network` event.
    #[must_use]
    pub fn network(path: impl Into<String>, status_code: u16, timestamp: i64) -> Self {
        Self::new(
            EventData::Network {
                path: path.into(),
                status_code,
            },
            timestamp,
        )
    }

    /// Attaches a correlation identifier.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Wire name of the event type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.data.kind()
    }

    /// Returns a copy whose payload has been passed through `scrubber` once.
    ///
    /// Type, timestamp, and correlation id are carried over untouched.
    ///
    /// # Errors
    ///
    /// Returns the scrubber's error, or [`ScrubError::ShapeChanged`] if the
    /// scrubbed payload no longer fits the event variant.
    pub fn scrubbed(self, scrubber: &dyn PiiScrubber) -> Result<Self, ScrubError> {
        let Self {
            data,
            timestamp,
            correlation_id,
        } = self;

        let mut tagged = serde_json::to_value(&data)
            .map_err(|err| ScrubError::ShapeChanged(err.to_string()))?;
        if let Some(payload) = tagged.get_mut("data") {
            *payload = scrubber.scrub(payload.take())?;
        }
        let data = serde_json::from_value(tagged)
            .map_err(|err| ScrubError::ShapeChanged(err.to_string()))?;

        Ok(Self {
            data,
            timestamp,
            correlation_id,
        })
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Clamps to `0` if the clock is set before the epoch.
#[must_use]
#[uniffi::export]
pub fn timestamp_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scrub::PatternScrubber;

    #[test]
    fn test_event_wire_shape() {
        let event = Event::network("/api/orders", 502, 1_700_000_000_000)
            .with_correlation_id("req-7");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "network",
                "data": { "path": "/api/orders", "statusCode": 502 },
                "timestamp": 1_700_000_000_000_i64,
                "correlationId": "req-7",
            })
        );
    }

    #[test]
    fn test_correlation_id_omitted_when_absent() {
        let event = Event::form_submit("checkout", 5);
        let raw = serde_json::to_string(&event).unwrap();
        assert_eq!(
            raw,
            r#"{"type":"form_submit","data":{"formId":"checkout"},"timestamp":5}"#
        );
    }

    #[test]
    fn test_event_parses_from_wire() {
        let raw = r#"{"type":"navigation","data":{"url":"/settings"},"timestamp":42,"correlationId":"abc"}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event, Event::navigation("/settings", 42).with_correlation_id("abc"));
        assert_eq!(event.kind(), "navigation");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let raw = r#"{"type":"scroll","data":{"y":10},"timestamp":1}"#;
        assert!(serde_json::from_str::<Event>(raw).is_err());
    }

    #[test]
    fn test_scrubbed_keeps_envelope() {
        let event = Event::click("a[href=\"mailto:jane@corp.io\"]", 9)
            .with_correlation_id("jane@corp.io");
        let clean = event.scrubbed(&PatternScrubber::default()).unwrap();

        assert_eq!(clean.timestamp, 9);
        // correlation ids pass through untouched
        assert_eq!(clean.correlation_id.as_deref(), Some("jane@corp.io"));
        assert_eq!(
            clean.data,
            EventData::Click {
                selector: "a[href=\"mailto:[EMAIL]\"]".to_string()
            }
        );
    }

    #[test]
    fn test_timestamp_now_is_positive() {
        assert!(timestamp_now() > 1_600_000_000_000);
    }
}
