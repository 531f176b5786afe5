use super::{StorageBackend, StorageError, StorageResult};

/// Browser `window.sessionStorage`.
///
/// The storage handle is looked up on every call rather than held, since
/// `web_sys` handles are neither `Send` nor `Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStorageBackend;

fn session_storage() -> StorageResult<web_sys::Storage> {
    let window = web_sys::window()
        .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
    window
        .session_storage()
        .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
        .ok_or_else(|| StorageError::Unavailable("no sessionStorage".to_string()))
}

fn host_error(err: &web_sys::wasm_bindgen::JsValue) -> StorageError {
    StorageError::Host(format!("{err:?}"))
}

impl StorageBackend for SessionStorageBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        session_storage()?
            .get_item(key)
            .map_err(|err| host_error(&err))
    }

    fn write(&self, key: &str, record: &str) -> StorageResult<()> {
        session_storage()?
            .set_item(key, record)
            .map_err(|err| host_error(&err))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        session_storage()?
            .remove_item(key)
            .map_err(|err| host_error(&err))
    }
}
