//! Persistence contract.
//!
//! State is kept in named slots, each holding one JSON document that is
//! read once at startup and overwritten wholesale on every mutation.
//! There is no incremental append and no schema versioning.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::NovaResult;

/// A value persisted under a fixed storage key.
///
/// `Default` is the hardcoded fallback used when the slot is missing or
/// its content cannot be decoded.
pub trait Slot: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Storage key of the slot.
    const KEY: &'static str;
}

pub trait StateRepository: Send + Sync {
    /// Load a slot, falling back to `T::default()` when it is missing
    /// or corrupt. Only backend failures surface as errors.
    fn load<T: Slot>(&self) -> impl Future<Output = NovaResult<T>> + Send;

    /// Overwrite a slot with `value`.
    fn save<T: Slot>(&self, value: &T) -> impl Future<Output = NovaResult<()>> + Send;
}
