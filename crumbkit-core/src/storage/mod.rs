//! Breadcrumb persistence.
//!
//! Each host offers a different medium; all of them are reached through the
//! [`StorageBackend`] trait, which only moves an opaque string record under a
//! key. [`BreadcrumbStore`] sits on top and owns the record format: a JSON
//! array of [`Event`]s, replaced wholesale on every save.
//!
//! # Variants
//!
//! - [`MemoryBackend`]: process-wide map, survives manager rebuilds.
//! - [`FileBackend`]: `<root>/crumbkit/<key>.json`, native only.
//! - [`DeviceBackend`]: host-implemented [`DeviceStorage`] (mobile).
//! - `SessionStorageBackend`: browser `sessionStorage`, wasm32 only.
//! - [`DisabledBackend`]: accepts and drops everything.

use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
mod browser;
pub mod device;
mod error;
#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use browser::SessionStorageBackend;
pub use device::{register_device_storage, DeviceBackend, DeviceStorage};
pub use error::{StorageError, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::config::BreadcrumbConfig;
use crate::error::CrumbkitError;
use crate::event::Event;
use crate::platform::PlatformKind;

/// Raw storage medium holding string records by key.
pub trait StorageBackend: Send + Sync {
    /// Reads the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the read fails.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the write fails.
    fn write(&self, key: &str, record: &str) -> StorageResult<()>;

    /// Deletes the record stored under `key`. Deleting a missing record is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium is unavailable or the delete fails.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Backend used when no medium is available. Reads find nothing; writes and
/// deletes succeed without effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

impl StorageBackend for DisabledBackend {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _record: &str) -> StorageResult<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

/// Builds the backend for `kind`.
///
/// A medium that vanished between detection and construction yields
/// [`DisabledBackend`].
#[must_use]
pub fn backend_for(kind: PlatformKind, config: &BreadcrumbConfig) -> Arc<dyn StorageBackend> {
    match kind {
        PlatformKind::Memory => Arc::new(MemoryBackend::global()),
        PlatformKind::Mobile => device::registered().map_or_else(disabled, |storage| {
            Arc::new(DeviceBackend::new(storage)) as Arc<dyn StorageBackend>
        }),
        #[cfg(not(target_arch = "wasm32"))]
        PlatformKind::File => config.storage_root.as_ref().map_or_else(disabled, |root| {
            Arc::new(FileBackend::new(root)) as Arc<dyn StorageBackend>
        }),
        #[cfg(target_arch = "wasm32")]
        PlatformKind::Browser => Arc::new(SessionStorageBackend),
        _ => disabled(),
    }
}

fn disabled() -> Arc<dyn StorageBackend> {
    Arc::new(DisabledBackend)
}

/// Breadcrumb record stored under a fixed key.
///
/// Every failure is logged and swallowed: a missing, unreadable, or corrupt
/// record loads as empty, and failed writes leave the in-memory queue as the
/// only copy.
#[derive(Clone)]
pub struct BreadcrumbStore {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl std::fmt::Debug for BreadcrumbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl BreadcrumbStore {
    /// Binds `backend` to the record `key`.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Loads the persisted events, or an empty list on any failure.
    #[must_use]
    pub fn load(&self) -> Vec<Event> {
        match self.read() {
            Ok(events) => events,
            Err(err) => {
                log::warn!("discarding persisted breadcrumbs under {}: {err}", self.key);
                Vec::new()
            }
        }
    }

    /// Replaces the persisted record with `events`.
    pub fn save(&self, events: &[Event]) {
        let outcome = serde_json::to_string(events)
            .map_err(StorageError::from)
            .and_then(|record| self.backend.write(&self.key, &record));
        if let Err(err) = outcome {
            log::warn!("failed to persist breadcrumbs under {}: {err}", self.key);
        }
    }

    /// Deletes the persisted record.
    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(&self.key) {
            log::warn!("failed to clear breadcrumbs under {}: {err}", self.key);
        }
    }

    /// Reads the persisted events, reporting why they could not be read.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::Storage`] if the medium fails and
    /// [`CrumbkitError::Serialization`] if the record is not a list of events.
    pub fn read(&self) -> Result<Vec<Event>, CrumbkitError> {
        match self.backend.read(&self.key)? {
            Some(record) => Ok(serde_json::from_str(&record)?),
            None => Ok(Vec::new()),
        }
    }
}
