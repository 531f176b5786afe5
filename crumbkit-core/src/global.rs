//! Process-wide breadcrumb manager.
//!
//! Most hosts want one breadcrumb log per process. The slot below holds it:
//! the first call to any function here builds a manager with
//! [`BreadcrumbManager::with_defaults`] unless [`install_breadcrumbs`] put a
//! configured one in place first. [`reset_breadcrumbs`] empties the slot so
//! the next call starts over, including a fresh load from storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::BreadcrumbConfig;
use crate::error::CrumbkitError;
use crate::event::Event;
use crate::manager::BreadcrumbManager;

static SLOT: Mutex<Option<Arc<BreadcrumbManager>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<BreadcrumbManager>>> {
    SLOT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the process-wide manager, building it on first use.
#[must_use]
pub fn global_manager() -> Arc<BreadcrumbManager> {
    let mut slot = slot();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(BreadcrumbManager::with_defaults())))
}

/// Puts `manager` in the slot, returning the one it replaces.
pub fn install_manager(manager: Arc<BreadcrumbManager>) -> Option<Arc<BreadcrumbManager>> {
    slot().replace(manager)
}

/// Builds a manager from a JSON [`BreadcrumbConfig`] and makes it the
/// process-wide one.
///
/// Call before the first breadcrumb is recorded. A manager already in the
/// slot is flushed and then replaced, so the new one loads everything the old
/// one recorded.
///
/// # Errors
///
/// Returns [`CrumbkitError::InvalidConfig`] if the configuration does not
/// parse or validate. The slot is left untouched in that case.
#[uniffi::export]
pub fn install_breadcrumbs(config_json: String) -> Result<(), CrumbkitError> {
    let config = BreadcrumbConfig::from_json(&config_json)?;

    let mut slot = slot();
    let previous = slot.take();
    if let Some(previous) = previous.as_ref() {
        previous.flush();
    }
    match BreadcrumbManager::from_config(config) {
        Ok(manager) => {
            *slot = Some(Arc::new(manager));
            drop(slot);
            drop(previous);
            Ok(())
        }
        Err(err) => {
            *slot = previous;
            Err(err)
        }
    }
}

/// Records `event` on the process-wide manager.
///
/// # Errors
///
/// Returns [`CrumbkitError::Scrub`] if the event cannot be scrubbed.
#[uniffi::export]
pub fn add_breadcrumb(event: Event) -> Result<(), CrumbkitError> {
    global_manager().add(event)
}

/// Copy of the process-wide breadcrumbs, sorted by timestamp.
#[uniffi::export]
#[must_use]
pub fn get_breadcrumbs() -> Vec<Event> {
    global_manager().get_all()
}

/// Empties the process-wide breadcrumbs and their persisted record.
#[uniffi::export]
pub fn clear_breadcrumbs() {
    global_manager().clear();
}

/// Waits for the process-wide manager's pending writes.
#[uniffi::export]
pub fn flush_breadcrumbs() {
    let manager = slot().clone();
    if let Some(manager) = manager {
        manager.flush();
    }
}

/// Discards the process-wide manager. Intended for tests.
///
/// Pending writes of the discarded manager complete before this returns,
/// unless another handle to it is still alive.
#[uniffi::export]
pub fn reset_breadcrumbs() {
    let previous = slot().take();
    drop(previous);
}
