//! The breadcrumb façade.
//!
//! A [`BreadcrumbManager`] owns one bounded queue, one storage medium chosen at
//! construction, and the scrubber every event passes through before it is
//! admitted. Queue mutation is synchronous; persistence is handed to a
//! [`Persister`] and never blocks or fails the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::config::BreadcrumbConfig;
use crate::error::{CrumbkitError, Result};
use crate::event::Event;
use crate::offline::OfflineQueue;
use crate::persist::Persister;
use crate::platform::{PlatformDetector, PlatformKind};
use crate::queue::EventQueue;
use crate::report::ErrorReport;
use crate::scrub::{PatternScrubber, PiiScrubber};
use crate::storage::{backend_for, BreadcrumbStore, StorageBackend};

struct State {
    queue: EventQueue,
    offline: Option<OfflineQueue>,
}

/// Bounded, scrubbed, persisted breadcrumb log.
///
/// ```
/// use crumbkit_core::{BreadcrumbConfig, BreadcrumbManager, Event, PlatformKind};
///
/// let config = BreadcrumbConfig {
///     platform: Some(PlatformKind::Disabled),
///     ..BreadcrumbConfig::default()
/// };
/// let manager = BreadcrumbManager::from_config(config).unwrap();
/// manager.add(Event::click(r#"button[data-email="user@example.com"]"#, 1)).unwrap();
///
/// let events = manager.get_all();
/// assert_eq!(events.len(), 1);
/// assert!(!serde_json::to_string(&events).unwrap().contains("user@example.com"));
/// ```
#[derive(uniffi::Object)]
pub struct BreadcrumbManager {
    platform: PlatformKind,
    config: BreadcrumbConfig,
    scrubber: Arc<dyn PiiScrubber>,
    state: Mutex<State>,
    persister: Persister,
}

impl std::fmt::Debug for BreadcrumbManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbManager")
            .field("platform", &self.platform)
            .field("config", &self.config)
            .field("persister", &self.persister)
            .finish_non_exhaustive()
    }
}

#[uniffi::export]
impl BreadcrumbManager {
    /// Builds a manager with the default configuration on the detected
    /// platform.
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults()
    }

    /// Builds a manager from a JSON [`BreadcrumbConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::InvalidConfig`] if the configuration does not
    /// parse or validate.
    #[uniffi::constructor]
    pub fn from_json_config(config_json: String) -> Result<Self, CrumbkitError> {
        Self::from_config(BreadcrumbConfig::from_json(&config_json)?)
    }

    /// Scrubs `event` and appends it, evicting the oldest events as needed.
    ///
    /// The new snapshot is persisted in the background; storage failures are
    /// logged, never returned.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::Scrub`] if the scrubber fails. Nothing is
    /// admitted in that case.
    pub fn add(&self, event: Event) -> Result<(), CrumbkitError> {
        let event = event.scrubbed(self.scrubber.as_ref())?;

        let mut state = self.lock();
        let evicted = state.queue.admit(event);
        if let Some(offline) = state.offline.as_mut() {
            for event in evicted {
                offline.push_overwrite(event);
            }
        }
        // scheduled under the lock so storage sees snapshots in queue order
        self.persister.save(state.queue.snapshot());
        drop(state);
        Ok(())
    }

    /// Copy of the held events sorted by timestamp.
    #[must_use]
    pub fn get_all(&self) -> Vec<Event> {
        self.lock().queue.all()
    }

    /// Empties the queue and deletes the persisted record.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.queue.clear();
        self.persister.clear();
        drop(state);
    }

    /// Blocks until every write scheduled so far has reached the medium.
    pub fn flush(&self) {
        self.persister.flush();
    }

    /// Storage platform selected at construction.
    #[must_use]
    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Removes and returns the events evicted into the offline queue, oldest
    /// first. Always empty off the mobile platform.
    #[must_use]
    pub fn drain_offline(&self) -> Vec<Event> {
        self.lock()
            .offline
            .as_mut()
            .map(OfflineQueue::drain)
            .unwrap_or_default()
    }

    /// Number of evicted events the offline queue had to drop for lack of
    /// space. Always zero off the mobile platform.
    #[must_use]
    pub fn offline_dropped(&self) -> u64 {
        self.lock()
            .offline
            .as_ref()
            .map_or(0, OfflineQueue::dropped)
    }

    /// Renders the error-report JSON for a failure.
    ///
    /// `error_json` is embedded as the report's `error` object.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::Serialization`] if `error_json` is not valid
    /// JSON.
    pub fn error_report(
        &self,
        correlation_id: String,
        error_json: String,
    ) -> Result<String, CrumbkitError> {
        let error: Value = serde_json::from_str(&error_json)?;
        Ok(serde_json::to_string(&self.report(correlation_id, error))?)
    }
}

impl Default for BreadcrumbManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BreadcrumbManager {
    /// Builds a manager with the default configuration on the detected
    /// platform.
    #[must_use]
    pub fn with_defaults() -> Self {
        let config = BreadcrumbConfig::default();
        let platform = PlatformDetector::probe(&config).select(config.platform);
        let backend = backend_for(platform, &config);
        Self::assemble(config, platform, backend, Arc::new(PatternScrubber::default()))
    }

    /// Builds a manager from `config`, detecting the platform unless the
    /// config names one.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::InvalidConfig`] if `config` does not validate.
    pub fn from_config(config: BreadcrumbConfig) -> Result<Self> {
        config.validate()?;
        let platform = PlatformDetector::probe(&config).select(config.platform);
        let backend = backend_for(platform, &config);
        Ok(Self::assemble(
            config,
            platform,
            backend,
            Arc::new(PatternScrubber::default()),
        ))
    }

    /// Builds a manager over an injected backend and scrubber.
    ///
    /// No detection runs. `config.platform` (default memory) decides the
    /// write dispatch and whether an offline queue is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CrumbkitError::InvalidConfig`] if `config` does not validate.
    pub fn from_parts(
        config: BreadcrumbConfig,
        backend: Arc<dyn StorageBackend>,
        scrubber: Arc<dyn PiiScrubber>,
    ) -> Result<Self> {
        config.validate()?;
        let platform = config.platform.unwrap_or(PlatformKind::Memory);
        Ok(Self::assemble(config, platform, backend, scrubber))
    }

    /// Configuration the manager was built with.
    #[must_use]
    pub const fn config(&self) -> &BreadcrumbConfig {
        &self.config
    }

    /// Number of held events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Returns `true` if no events are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Builds the error-report payload; `breadcrumbs` is exactly
    /// [`Self::get_all`] at the time of the call.
    #[must_use]
    pub fn report(&self, correlation_id: impl Into<String>, error: Value) -> ErrorReport {
        ErrorReport::new(correlation_id, self.get_all(), error)
    }

    fn assemble(
        config: BreadcrumbConfig,
        platform: PlatformKind,
        backend: Arc<dyn StorageBackend>,
        scrubber: Arc<dyn PiiScrubber>,
    ) -> Self {
        let store = BreadcrumbStore::new(backend, config.storage_key.clone());

        let mut queue = EventQueue::new(config.max_events, config.max_bytes);
        let mut offline = platform
            .keeps_offline_queue()
            .then(|| OfflineQueue::new(config.offline_capacity));
        let trimmed = queue.seed(store.load());
        if let Some(offline) = offline.as_mut() {
            trimmed.into_iter().for_each(|event| offline.push_overwrite(event));
        }

        let persister = if platform.writes_inline() {
            Persister::inline(store)
        } else {
            Persister::spawn(store)
        };

        log::debug!(
            "breadcrumb manager ready on {platform} storage with {} persisted events",
            queue.len()
        );

        Self {
            platform,
            config,
            scrubber,
            state: Mutex::new(State { queue, offline }),
            persister,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
