//! Host environment detection.
//!
//! Detection runs once, when a manager is built. The result is a plain
//! [`PlatformKind`] value; nothing re-probes the host afterwards.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::BreadcrumbConfig;
use crate::storage::device;

/// Storage medium family selected for a manager.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, uniffi::Enum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlatformKind {
    /// Browser tab: synchronous `sessionStorage`.
    Browser,
    /// Mobile app: host-provided asynchronous device storage.
    Mobile,
    /// Native process with a writable storage root: JSON file on disk.
    File,
    /// Server or test process: durable in-process map.
    Memory,
    /// No usable medium: persistence is a no-op.
    Disabled,
}

impl PlatformKind {
    /// Whether writes for this platform run inline on the caller's thread.
    ///
    /// Browser storage is synchronous and wasm has no worker threads; every
    /// other medium is written from the background persister.
    #[must_use]
    pub const fn writes_inline(self) -> bool {
        match self {
            Self::Browser | Self::Disabled => true,
            Self::Memory => cfg!(target_arch = "wasm32"),
            Self::Mobile | Self::File => false,
        }
    }

    /// Whether evicted events are kept for later batch upload.
    #[must_use]
    pub const fn keeps_offline_queue(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

/// What the host offers, as probed at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// A browser `window.sessionStorage` is reachable.
    pub session_storage: bool,
    /// The host registered a [`DeviceStorage`](crate::storage::DeviceStorage).
    pub device_storage: bool,
    /// A filesystem storage root is configured and usable.
    pub filesystem: bool,
}

impl HostCapabilities {
    /// Probes the running host.
    #[must_use]
    pub fn probe(config: &BreadcrumbConfig) -> Self {
        Self {
            session_storage: session_storage_present(),
            device_storage: device::registered().is_some(),
            filesystem: !cfg!(target_arch = "wasm32") && config.storage_root.is_some(),
        }
    }

    /// Whether the medium for `kind` is present.
    #[must_use]
    pub const fn supports(&self, kind: PlatformKind) -> bool {
        match kind {
            PlatformKind::Browser => self.session_storage,
            PlatformKind::Mobile => self.device_storage,
            PlatformKind::File => self.filesystem,
            PlatformKind::Memory | PlatformKind::Disabled => true,
        }
    }
}

/// Picks the storage platform from probed capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDetector {
    capabilities: HostCapabilities,
}

impl PlatformDetector {
    /// Creates a detector over already-probed capabilities.
    #[must_use]
    pub const fn new(capabilities: HostCapabilities) -> Self {
        Self { capabilities }
    }

    /// Probes the host and returns a detector over the result.
    #[must_use]
    pub fn probe(config: &BreadcrumbConfig) -> Self {
        Self::new(HostCapabilities::probe(config))
    }

    /// Selects the platform.
    ///
    /// An explicit `requested` platform wins when its medium is present and
    /// degrades to [`PlatformKind::Disabled`] when it is not. Without a
    /// request the first present medium in the order browser, mobile, file
    /// wins, falling back to memory.
    #[must_use]
    pub fn select(&self, requested: Option<PlatformKind>) -> PlatformKind {
        let kind = match requested {
            Some(kind) if self.capabilities.supports(kind) => kind,
            Some(kind) => {
                log::warn!("requested {kind} storage is not available on this host, persistence disabled");
                PlatformKind::Disabled
            }
            None => [PlatformKind::Browser, PlatformKind::Mobile, PlatformKind::File]
                .into_iter()
                .find(|kind| self.capabilities.supports(*kind))
                .unwrap_or(PlatformKind::Memory),
        };
        log::debug!("selected {kind} breadcrumb storage");
        kind
    }
}

#[cfg(target_arch = "wasm32")]
fn session_storage_present() -> bool {
    web_sys::window()
        .and_then(|window| window.session_storage().ok().flatten())
        .is_some()
}

#[cfg(not(target_arch = "wasm32"))]
const fn session_storage_present() -> bool {
    false
}
