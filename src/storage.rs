/// Key-value storage and the handoff records passed between extension contexts

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::config::HANDOFF_MAX_AGE_MS;
use crate::error::{AppError, Result};
use crate::image_data::{ImageDescriptor, UserProfile};

pub const KEY_PREFIX: &str = "pinterest_";
pub const SELECTED_IMAGES_KEY: &str = "pinterest_selected_images";
pub const EXTRACTED_IMAGES_KEY: &str = "pinterest_extracted_images";
pub const ACCESS_TOKEN_KEY: &str = "pinterest_access_token";
pub const USER_PROFILE_KEY: &str = "pinterest_user_profile";

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(keys: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAllStorage() -> std::result::Result<JsValue, JsValue>;
}

/// String-keyed, JSON-valued async storage
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, keys: &[String]) -> Result<()>;
    async fn entries(&self) -> Result<Vec<(String, Value)>>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut items = self.items.borrow_mut();
        for key in keys {
            items.remove(key);
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, Value)>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// `chrome.storage.local`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

fn storage_error(e: JsValue) -> AppError {
    AppError::Storage(format!("{:?}", e))
}

/// Plain objects, not ES maps, so the host can persist and post them
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let js = getStorage(key).await.map_err(storage_error)?;
        if js.is_null() || js.is_undefined() {
            return Ok(None);
        }
        Ok(Some(serde_wasm_bindgen::from_value(js)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        setStorage(key, to_js(&value)?).await.map_err(storage_error)
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let keys_js = serde_wasm_bindgen::to_value(&keys)?;
        removeStorage(keys_js).await.map_err(storage_error)
    }

    async fn entries(&self) -> Result<Vec<(String, Value)>> {
        let js = getAllStorage().await.map_err(storage_error)?;
        if js.is_null() || js.is_undefined() {
            return Ok(Vec::new());
        }
        let items: BTreeMap<String, Value> = serde_wasm_bindgen::from_value(js)?;
        Ok(items.into_iter().collect())
    }
}

/// `window.localStorage`, used by the web UI outside the extension
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| AppError::Storage("No window".to_string()))?
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| AppError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.storage()?.get_item(key).map_err(storage_error)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.storage()?
            .set_item(key, &value.to_string())
            .map_err(storage_error)
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let storage = self.storage()?;
        for key in keys {
            storage.remove_item(key).map_err(storage_error)?;
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, Value)>> {
        let storage = self.storage()?;
        let len = storage.length().map_err(storage_error)?;
        let mut entries = Vec::new();
        for i in 0..len {
            let Some(key) = storage.key(i).map_err(storage_error)? else {
                continue;
            };
            if let Some(raw) = storage.get_item(&key).map_err(storage_error)? {
                // Foreign keys may hold non-JSON strings
                let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

/// Stored form of an image-list handoff; `timestamp` makes it expirable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandoffRecord {
    pub images: Vec<ImageDescriptor>,
    pub timestamp: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredImages {
    Stamped(HandoffRecord),
    Bare(Vec<ImageDescriptor>),
}

/// Typed access to the handoff records kept in a [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct HandoffStore<S> {
    store: S,
}

impl<S: KeyValueStore> HandoffStore<S> {
    pub fn new(store: S) -> Self {
        HandoffStore { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read_images(&self, key: &str) -> Result<Vec<ImageDescriptor>> {
        let Some(value) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_value::<StoredImages>(value) {
            Ok(StoredImages::Stamped(record)) => Ok(record.images),
            Ok(StoredImages::Bare(images)) => Ok(images),
            Err(e) => {
                log::warn!("Discarding unreadable {}: {}", key, e);
                Ok(Vec::new())
            }
        }
    }

    async fn write_images(&self, key: &str, images: &[ImageDescriptor], now_ms: f64) -> Result<()> {
        let record = HandoffRecord {
            images: images.to_vec(),
            timestamp: now_ms,
        };
        self.store.set(key, serde_json::to_value(&record)?).await
    }

    pub async fn selected_images(&self) -> Result<Vec<ImageDescriptor>> {
        self.read_images(SELECTED_IMAGES_KEY).await
    }

    pub async fn set_selected_images(&self, images: &[ImageDescriptor], now_ms: f64) -> Result<()> {
        self.write_images(SELECTED_IMAGES_KEY, images, now_ms).await
    }

    pub async fn extracted_images(&self) -> Result<Vec<ImageDescriptor>> {
        self.read_images(EXTRACTED_IMAGES_KEY).await
    }

    pub async fn set_extracted_images(&self, images: &[ImageDescriptor], now_ms: f64) -> Result<()> {
        self.write_images(EXTRACTED_IMAGES_KEY, images, now_ms).await
    }

    /// The selected list has been consumed
    pub async fn save_complete(&self) -> Result<()> {
        self.store.remove(&[SELECTED_IMAGES_KEY.to_string()]).await
    }

    pub async fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(ACCESS_TOKEN_KEY)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|token| !token.is_empty()))
    }

    pub async fn user_profile(&self) -> Result<Option<UserProfile>> {
        match self.store.get(USER_PROFILE_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value).ok()),
            None => Ok(None),
        }
    }

    pub async fn set_session(&self, token: &str, profile: &UserProfile) -> Result<()> {
        self.store
            .set(ACCESS_TOKEN_KEY, Value::String(token.to_string()))
            .await?;
        self.store
            .set(USER_PROFILE_KEY, serde_json::to_value(profile)?)
            .await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.store
            .remove(&[ACCESS_TOKEN_KEY.to_string(), USER_PROFILE_KEY.to_string()])
            .await
    }

    /// Delete every stamped `pinterest_` entry older than one hour
    pub async fn cleanup_expired(&self, now_ms: f64) -> Result<Vec<String>> {
        let entries = self.store.entries().await?;
        let expired = expired_keys(&entries, now_ms);

        if !expired.is_empty() {
            log::info!("Removing {} expired handoff records", expired.len());
            self.store.remove(&expired).await?;
        }
        Ok(expired)
    }
}

/// Entries without a numeric `timestamp` never expire
pub fn is_expired(value: &Value, now_ms: f64) -> bool {
    value
        .get("timestamp")
        .and_then(Value::as_f64)
        .is_some_and(|timestamp| now_ms - timestamp > HANDOFF_MAX_AGE_MS)
}

pub fn expired_keys(entries: &[(String, Value)], now_ms: f64) -> Vec<String> {
    entries
        .iter()
        .filter(|(key, value)| key.starts_with(KEY_PREFIX) && is_expired(value, now_ms))
        .map(|(key, _)| key.clone())
        .collect()
}
