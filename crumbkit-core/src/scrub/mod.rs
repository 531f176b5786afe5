//! PII scrubbing of breadcrumb payloads.
//!
//! The manager depends only on the [`PiiScrubber`] capability. The crate ships
//! [`PatternScrubber`] as the default implementation; hosts with their own
//! redaction rules inject a different one.
//!
//! Payloads are owned `serde_json::Value` trees, so reference cycles cannot
//! occur. Pathologically deep trees are refused with [`ScrubError::TooDeep`]
//! instead of being walked.

mod patterns;

use serde_json::{Map, Value};
use thiserror::Error;

pub use patterns::{PatternScrubber, EMAIL_TOKEN, ID_TOKEN, PHONE_TOKEN, TOKEN_TOKEN};

/// Deepest nesting (arrays plus objects) a payload may have.
pub const MAX_SCRUB_DEPTH: usize = 64;

/// Errors raised while scrubbing a payload.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// The payload is nested deeper than [`MAX_SCRUB_DEPTH`].
    #[error("payload nested deeper than {max} levels")]
    TooDeep {
        /// Depth limit that was exceeded.
        max: usize,
    },

    /// A redaction rule could not be compiled.
    #[error("invalid scrub pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Source of the rejected pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The scrubbed payload no longer fits its event type.
    #[error("scrubbed payload changed shape: {0}")]
    ShapeChanged(String),
}

/// Capability that replaces PII substrings inside an arbitrary JSON value.
///
/// Implementations must return a value of the same shape, must be idempotent,
/// and must leave non-matching content (including non-ASCII text) untouched.
pub trait PiiScrubber: Send + Sync {
    /// Returns a sanitized copy of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be sanitized. The manager surfaces
    /// this to the caller instead of storing unscrubbed data.
    fn scrub(&self, value: Value) -> Result<Value, ScrubError>;
}

/// Rebuilds `value` with every string passed through `redact`.
///
/// Object keys, numbers, booleans, and nulls are preserved as-is.
///
/// # Errors
///
/// Returns [`ScrubError::TooDeep`] if nesting exceeds [`MAX_SCRUB_DEPTH`].
pub fn map_strings<F>(value: Value, redact: &F) -> Result<Value, ScrubError>
where
    F: Fn(&str) -> String,
{
    walk(value, 0, redact)
}

fn walk<F>(value: Value, depth: usize, redact: &F) -> Result<Value, ScrubError>
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(text) => Ok(Value::String(redact(&text))),
        Value::Array(items) => {
            let depth = descend(depth)?;
            items
                .into_iter()
                .map(|item| walk(item, depth, redact))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Value::Object(fields) => {
            let depth = descend(depth)?;
            let mut clean = Map::with_capacity(fields.len());
            for (key, field) in fields {
                clean.insert(key, walk(field, depth, redact)?);
            }
            Ok(Value::Object(clean))
        }
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => Ok(scalar),
    }
}

const fn descend(depth: usize) -> Result<usize, ScrubError> {
    if depth >= MAX_SCRUB_DEPTH {
        return Err(ScrubError::TooDeep {
            max: MAX_SCRUB_DEPTH,
        });
    }
    Ok(depth + 1)
}
