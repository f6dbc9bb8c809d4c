//! In-memory store.
//!
//! Values are held in their serialized form so that decoding behaves
//! exactly like the file store, including the corrupt-content fallback.

use std::collections::HashMap;
use std::sync::Arc;

use nova_core::error::NovaResult;
use nova_core::{Slot, StateRepository};
use tokio::sync::RwLock;

use crate::codec;

/// Cloning shares the underlying slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document for `key`, if any.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.slots.read().await.get(key).cloned()
    }

    /// Store a raw document, bypassing serialization.
    pub async fn put_raw(&self, key: &str, raw: impl Into<String>) {
        self.slots.write().await.insert(key.to_string(), raw.into());
    }
}

impl StateRepository for MemoryStore {
    async fn load<T: Slot>(&self) -> NovaResult<T> {
        let slots = self.slots.read().await;
        Ok(slots
            .get(T::KEY)
            .map(|raw| codec::decode_or_default(raw))
            .unwrap_or_default())
    }

    async fn save<T: Slot>(&self, value: &T) -> NovaResult<()> {
        let raw = codec::encode(value)?;
        self.slots.write().await.insert(T::KEY.to_string(), raw);
        Ok(())
    }
}
