//! Host-provided device storage for mobile apps.
//!
//! The app implements [`DeviceStorage`] on top of its platform key-value store
//! (`UserDefaults`, `SharedPreferences`, `AsyncStorage`, ...) and registers it
//! once with [`register_device_storage`]. Its presence is what selects the
//! mobile platform. Writes and removals run on the background persister. The
//! one read happens when a manager is built, on the building thread; for the
//! process-wide manager that is the first caller of `add_breadcrumb` or
//! `install_breadcrumbs`.

use std::sync::{Arc, PoisonError, RwLock};

use super::{StorageBackend, StorageResult};

/// Key-value storage implemented by the host application.
#[uniffi::export(with_foreign)]
pub trait DeviceStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store cannot be read.
    fn get_item(&self, key: String) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store cannot be written.
    fn set_item(&self, key: String, value: String) -> StorageResult<()>;

    /// Deletes the value under `key`. Deleting a missing key must succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store cannot be written.
    fn remove_item(&self, key: String) -> StorageResult<()>;
}

static DEVICE_STORAGE: RwLock<Option<Arc<dyn DeviceStorage>>> = RwLock::new(None);

/// Registers the host's device storage.
///
/// Managers built afterwards detect the mobile platform. Registering again
/// replaces the previous storage for managers built from then on; existing
/// managers keep the one they were built with.
///
/// ## Swift
///
/// ```swift
/// final class DefaultsStorage: Crumbkit.DeviceStorage {
///     func getItem(key: String) throws -> String? { UserDefaults.standard.string(forKey: key) }
///     func setItem(key: String, value: String) throws { UserDefaults.standard.set(value, forKey: key) }
///     func removeItem(key: String) throws { UserDefaults.standard.removeObject(forKey: key) }
/// }
///
/// Crumbkit.registerDeviceStorage(storage: DefaultsStorage()) // before the first breadcrumb
/// ```
#[uniffi::export]
pub fn register_device_storage(storage: Arc<dyn DeviceStorage>) {
    *DEVICE_STORAGE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(storage);
}

/// The registered device storage, if any.
#[must_use]
pub fn registered() -> Option<Arc<dyn DeviceStorage>> {
    DEVICE_STORAGE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// [`StorageBackend`] over a host [`DeviceStorage`].
#[derive(Clone)]
pub struct DeviceBackend {
    storage: Arc<dyn DeviceStorage>,
}

impl std::fmt::Debug for DeviceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBackend").finish_non_exhaustive()
    }
}

impl DeviceBackend {
    /// Wraps `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn DeviceStorage>) -> Self {
        Self { storage }
    }
}

impl StorageBackend for DeviceBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key.to_string())
    }

    fn write(&self, key: &str, record: &str) -> StorageResult<()> {
        self.storage.set_item(key.to_string(), record.to_string())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key.to_string())
    }
}
