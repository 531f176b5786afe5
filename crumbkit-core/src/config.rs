use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CrumbkitError, Result};
use crate::platform::PlatformKind;
use crate::queue::{DEFAULT_MAX_BYTES, DEFAULT_MAX_EVENTS};

/// Default key of the persisted breadcrumb record.
pub const DEFAULT_STORAGE_KEY: &str = "crumbkit.breadcrumbs";

/// Default capacity of the mobile offline queue.
pub const DEFAULT_OFFLINE_CAPACITY: usize = 100;

/// Largest accepted `maxEvents` and `offlineCapacity`.
pub const MAX_QUEUE_LENGTH: usize = 10_000;

/// Largest accepted `maxBytes` (16 MiB).
pub const MAX_QUEUE_BYTES: usize = 16 * 1024 * 1024;

/// Breadcrumb manager configuration.
///
/// Every field has a default, so `{}` is a valid JSON configuration.
///
/// ```
/// use crumbkit_core::{BreadcrumbConfig, PlatformKind};
///
/// let config = BreadcrumbConfig::from_json(r#"{"maxEvents": 5, "platform": "memory"}"#).unwrap();
/// assert_eq!(config.max_events, 5);
/// assert_eq!(config.platform, Some(PlatformKind::Memory));
/// assert_eq!(config.max_bytes, 5 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BreadcrumbConfig {
    /// Count ceiling of the queue.
    pub max_events: usize,
    /// Serialized-size ceiling of the queue, in bytes.
    pub max_bytes: usize,
    /// Key of the persisted record.
    pub storage_key: String,
    /// Directory under which file storage lives. Enables the file platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,
    /// Platform override. `None` detects the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformKind>,
    /// Capacity of the mobile offline queue.
    pub offline_capacity: usize,
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
            max_bytes: DEFAULT_MAX_BYTES,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_root: None,
            platform: None,
            offline_capacity: DEFAULT_OFFLINE_CAPACITY,
        }
    }
}

impl BreadcrumbConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::InvalidConfig`] if the JSON is malformed,
    /// names an unknown field, or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| CrumbkitError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits and the storage key.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.max_events == 0 {
            return Err(invalid("maxEvents must be at least 1"));
        }
        if self.max_bytes == 0 {
            return Err(invalid("maxBytes must be at least 1"));
        }
        if self.offline_capacity == 0 {
            return Err(invalid("offlineCapacity must be at least 1"));
        }
        if self.max_events > MAX_QUEUE_LENGTH {
            return Err(invalid(format!("maxEvents must be at most {MAX_QUEUE_LENGTH}")));
        }
        if self.max_bytes > MAX_QUEUE_BYTES {
            return Err(invalid(format!("maxBytes must be at most {MAX_QUEUE_BYTES}")));
        }
        if self.offline_capacity > MAX_QUEUE_LENGTH {
            return Err(invalid(format!(
                "offlineCapacity must be at most {MAX_QUEUE_LENGTH}"
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(invalid("storageKey must not be empty"));
        }
        if self.storage_key.contains(['/', '\\']) || self.storage_key.starts_with('.') {
            return Err(invalid(format!(
                "storageKey `{}` must be a plain name",
                self.storage_key
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> CrumbkitError {
    CrumbkitError::InvalidConfig(reason.into())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(BreadcrumbConfig::from_json("{}").unwrap(), BreadcrumbConfig::default());
    }

    #[test]
    fn test_full_json() {
        let config = BreadcrumbConfig::from_json(
            r#"{
                "maxEvents": 10,
                "maxBytes": 2048,
                "storageKey": "app.crumbs",
                "storageRoot": "/tmp/app",
                "platform": "file",
                "offlineCapacity": 7
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_events, 10);
        assert_eq!(config.max_bytes, 2048);
        assert_eq!(config.storage_key, "app.crumbs");
        assert_eq!(config.storage_root, Some(PathBuf::from("/tmp/app")));
        assert_eq!(config.platform, Some(PlatformKind::File));
        assert_eq!(config.offline_capacity, 7);
    }

    #[test_case(r#"{"maxEvents": 0}"# ; "zero events")]
    #[test_case(r#"{"maxBytes": 0}"# ; "zero bytes")]
    #[test_case(r#"{"offlineCapacity": 0}"# ; "zero offline capacity")]
    #[test_case(r#"{"maxEvents": 1000000000000000}"# ; "huge event count")]
    #[test_case(r#"{"maxEvents": 18446744073709551615}"# ; "event count at usize max")]
    #[test_case(r#"{"maxBytes": 1000000000000}"# ; "huge byte budget")]
    #[test_case(r#"{"offlineCapacity": 1000000000000000}"# ; "huge offline capacity")]
    #[test_case(r#"{"storageKey": "  "}"# ; "blank key")]
    #[test_case(r#"{"storageKey": "../escape"}"# ; "key with separator")]
    #[test_case(r#"{"storageKey": ".hidden"}"# ; "dot key")]
    #[test_case(r#"{"maxEvent": 3}"# ; "unknown field")]
    #[test_case(r#"{"platform": "floppy"}"# ; "unknown platform")]
    #[test_case(r#"{"maxEvents": -1}"# ; "negative")]
    #[test_case("not json" ; "malformed")]
    fn test_invalid_config(json: &str) {
        let err = BreadcrumbConfig::from_json(json).unwrap_err();
        assert!(matches!(err, CrumbkitError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn test_limits_at_the_ceiling_are_accepted() {
        let config = BreadcrumbConfig {
            max_events: MAX_QUEUE_LENGTH,
            max_bytes: MAX_QUEUE_BYTES,
            offline_capacity: MAX_QUEUE_LENGTH,
            ..BreadcrumbConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization_skips_unset_options() {
        let json = serde_json::to_value(BreadcrumbConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "maxEvents": 20,
                "maxBytes": 5120,
                "storageKey": "crumbkit.breadcrumbs",
                "offlineCapacity": 100,
            })
        );
    }
}
