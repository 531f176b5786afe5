use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::{StorageBackend, StorageResult};

type Records = Arc<RwLock<HashMap<String, String>>>;

static PROCESS_RECORDS: LazyLock<Records> = LazyLock::new(Records::default);

/// In-process record map.
///
/// Handles from [`MemoryBackend::global`] share one map for the life of the
/// process, so records outlive the manager that wrote them. That is what makes
/// the memory platform durable across `reset`. [`MemoryBackend::isolated`]
/// gives a private map for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Records,
}

impl MemoryBackend {
    /// Handle to the process-wide map.
    #[must_use]
    pub fn global() -> Self {
        Self {
            records: Arc::clone(&PROCESS_RECORDS),
        }
    }

    /// Handle to a fresh map shared only with its clones.
    #[must_use]
    pub fn isolated() -> Self {
        Self::default()
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, record: &str) -> StorageResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), record.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
