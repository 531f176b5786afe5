//! JSON file storage under `<root>/crumbkit/`.
//!
//! Writes go to a hidden temporary file in the same directory which is then
//! renamed over the target, so readers see either the old record or the new
//! one, never a partial write.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError, StorageResult};

const DIRNAME: &str = "crumbkit";

/// File-per-key backend.
#[derive(Debug, Clone)]
pub struct FileBackend {
    directory: PathBuf,
}

impl FileBackend {
    /// Stores records under `<root>/crumbkit`. The directory is created on the
    /// first write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            directory: root.as_ref().join(DIRNAME),
        }
    }

    /// Path of the record file for `key`.
    #[must_use]
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!(".{key}.json.tmp"))
    }
}

fn io_error(context: impl std::fmt::Display, err: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{context}: {err}"))
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(format_args!("failed to read {}", path.display()), &err)),
        }
    }

    fn write(&self, key: &str, record: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.directory).map_err(|err| {
            io_error(
                format_args!("failed to create {}", self.directory.display()),
                &err,
            )
        })?;

        let final_path = self.record_path(key);
        let temp_path = self.temp_path(key);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|err| io_error(format_args!("failed to create {}", temp_path.display()), &err))?;
        file.write_all(record.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|err| io_error(format_args!("failed to write {}", temp_path.display()), &err))?;
        drop(file);

        fs::rename(&temp_path, &final_path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            io_error(
                format_args!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    final_path.display()
                ),
                &err,
            )
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.record_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(format_args!("failed to remove {}", path.display()), &err)),
        }
    }
}
