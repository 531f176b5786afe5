//! `crumbkit_core` keeps a short, PII-scrubbed timeline of what a user or
//! system did before a failure, so error reports can carry it.
//!
//! Events go through a [`BreadcrumbManager`]: each one is scrubbed by a
//! [`PiiScrubber`], admitted into a bounded [`EventQueue`] (20 events and
//! 5 KiB serialized by default, oldest evicted first), and the queue snapshot
//! is persisted in the background to whatever medium the host offers.
//!
//! ```
//! use crumbkit_core::{BreadcrumbConfig, BreadcrumbManager, Event, PlatformKind};
//!
//! let manager = BreadcrumbManager::from_config(BreadcrumbConfig {
//!     platform: Some(PlatformKind::Disabled),
//!     ..BreadcrumbConfig::default()
//! })
//! .unwrap();
//!
//! manager.add(Event::navigation("/checkout", 1)).unwrap();
//! manager.add(Event::network("/api/pay", 502, 2)).unwrap();
//!
//! let report = manager.report("req-42", serde_json::json!({ "message": "payment failed" }));
//! assert_eq!(report.breadcrumbs.len(), 2);
//! ```
//!
//! Foreign hosts (Swift, Kotlin) use the same surface through `UniFFI`, plus
//! the process-wide functions in [`global`].

mod config;
pub use config::*;

mod error;
pub use error::*;

mod event;
pub use event::*;

pub mod global;
pub use global::*;

/// Forwarding of crumbkit logs to a host logger.
pub mod logger;

mod manager;
pub use manager::*;

mod offline;
pub use offline::OfflineQueue;

mod persist;
pub use persist::Persister;

mod platform;
pub use platform::*;

mod queue;
pub use queue::*;

mod report;
pub use report::ErrorReport;

pub mod scrub;
pub use scrub::{PatternScrubber, PiiScrubber, ScrubError};

pub mod storage;
pub use storage::{StorageBackend, StorageError};

uniffi::setup_scaffolding!("crumbkit_core");
