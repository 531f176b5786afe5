//! Common test utilities shared across integration tests.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crumbkit_core::scrub::ScrubError;
use crumbkit_core::storage::{DeviceStorage, MemoryBackend, StorageResult};
use crumbkit_core::{
    BreadcrumbConfig, BreadcrumbManager, PatternScrubber, PiiScrubber, PlatformKind,
    StorageBackend, StorageError,
};
use serde_json::Value;
use uuid::Uuid;

/// Host key-value store standing in for `UserDefaults`/`SharedPreferences`.
#[derive(Default)]
pub struct InMemoryDeviceStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryDeviceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl DeviceStorage for InMemoryDeviceStorage {
    fn get_item(&self, key: String) -> StorageResult<Option<String>> {
        Ok(self.items.lock().unwrap().get(&key).cloned())
    }

    fn set_item(&self, key: String, value: String) -> StorageResult<()> {
        self.items.lock().unwrap().insert(key, value);
        Ok(())
    }

    fn remove_item(&self, key: String) -> StorageResult<()> {
        self.items.lock().unwrap().remove(&key);
        Ok(())
    }
}

/// Backend for a medium that is never reachable.
pub struct UnavailableBackend;

impl StorageBackend for UnavailableBackend {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("offline".to_string()))
    }

    fn write(&self, _key: &str, _record: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("offline".to_string()))
    }
}

/// Default scrubber that counts how often it runs.
#[derive(Default)]
pub struct RecordingScrubber {
    inner: PatternScrubber,
    calls: AtomicUsize,
}

impl RecordingScrubber {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PiiScrubber for RecordingScrubber {
    fn scrub(&self, value: Value) -> Result<Value, ScrubError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.scrub(value)
    }
}

/// Scrubber that refuses every payload.
pub struct FailingScrubber;

impl PiiScrubber for FailingScrubber {
    fn scrub(&self, _value: Value) -> Result<Value, ScrubError> {
        Err(ScrubError::TooDeep { max: 0 })
    }
}

pub fn temp_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("crumbkit-test-{}", Uuid::new_v4()));
    path
}

pub fn cleanup_storage(root: &Path) {
    let _ = std::fs::remove_dir_all(root);
}

pub fn unique_key() -> String {
    format!("crumbs-{}", Uuid::new_v4())
}

pub fn memory_config() -> BreadcrumbConfig {
    BreadcrumbConfig {
        platform: Some(PlatformKind::Memory),
        ..BreadcrumbConfig::default()
    }
}

pub fn manager_with(
    config: BreadcrumbConfig,
    backend: Arc<dyn StorageBackend>,
    scrubber: Arc<dyn PiiScrubber>,
) -> BreadcrumbManager {
    BreadcrumbManager::from_parts(config, backend, scrubber).expect("build manager")
}

/// Manager over a private memory map with the default scrubber.
pub fn memory_manager(backend: &MemoryBackend) -> BreadcrumbManager {
    manager_with(
        memory_config(),
        Arc::new(backend.clone()),
        Arc::new(PatternScrubber::default()),
    )
}

pub fn serialized_size(events: &[crumbkit_core::Event]) -> usize {
    serde_json::to_string(events).expect("serialize").len()
}
