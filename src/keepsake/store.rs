//! Key-value persistence of JSON records.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for native use and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage` or `window.sessionStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Result<Self> {
        use crate::error::FxError;
        let storage = web_sys::window()
            .ok_or(FxError::NoContext("window"))?
            .local_storage()
            .map_err(FxError::storage)?
            .ok_or(FxError::NoContext("localStorage"))?;
        Ok(Self { storage })
    }

    /// `window.sessionStorage`, cleared when the tab closes.
    pub fn session() -> Result<Self> {
        use crate::error::FxError;
        let storage = web_sys::window()
            .ok_or(FxError::NoContext("window"))?
            .session_storage()
            .map_err(FxError::storage)?
            .ok_or(FxError::NoContext("sessionStorage"))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(crate::error::FxError::storage)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(crate::error::FxError::storage)
    }
}

/// Decode `key`, falling back when it is absent, unreadable or malformed.
pub fn safe_load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("keepsake: discarding malformed {key}: {err}");
            fallback
        }),
        Ok(None) => fallback,
        Err(err) => {
            log::warn!("keepsake: could not read {key}: {err}");
            fallback
        }
    }
}

pub fn safe_save<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_uses_fallback() {
        let store = MemoryStore::new();
        let v: Vec<u32> = safe_load(&store, "nope", vec![1, 2]);
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn malformed_value_uses_fallback() {
        let mut store = MemoryStore::new();
        store.set("k", "{broken").unwrap();
        let v: Vec<u32> = safe_load(&store, "k", Vec::new());
        assert!(v.is_empty());
    }

    #[test]
    fn saved_value_loads_back() {
        let mut store = MemoryStore::new();
        safe_save(&mut store, "k", &vec!["a", "b"]).unwrap();
        assert_eq!(store.raw("k"), Some(r#"["a","b"]"#));
        let v: Vec<String> = safe_load(&store, "k", Vec::new());
        assert_eq!(v, vec!["a", "b"]);
    }
}
