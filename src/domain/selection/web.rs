//! Browser persistence: `window.localStorage` and `window.location`.

use super::persist::{DurableStorage, UrlLocation};
use crate::error::PersistError;
use wasm_bindgen::JsValue;

fn js_err(e: JsValue) -> PersistError {
    PersistError::Unavailable(format!("{e:?}"))
}

fn window() -> Result<web_sys::Window, PersistError> {
    web_sys::window().ok_or_else(|| PersistError::Unavailable("no window".into()))
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, PersistError> {
        window()?
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| PersistError::Unavailable("localStorage disabled".into()))
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Self::storage()?.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        Self::storage()?.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        Self::storage()?.remove_item(key).map_err(js_err)
    }
}

/// `window.location.pathname`, written through `history.replaceState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

impl UrlLocation for BrowserLocation {
    fn path(&self) -> Result<String, PersistError> {
        window()?.location().pathname().map_err(js_err)
    }

    fn replace_path(&mut self, path: &str) -> Result<(), PersistError> {
        window()?
            .history()
            .map_err(js_err)?
            .replace_state_with_url(&JsValue::NULL, "", Some(path))
            .map_err(js_err)
    }
}
