//! JSON encoding of slot values.

use nova_core::Slot;
use tracing::warn;

use crate::error::StoreError;

pub(crate) fn encode<T: Slot>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a stored document, substituting the slot default when the
/// content is corrupt.
pub(crate) fn decode_or_default<T: Slot>(raw: &str) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(slot = T::KEY, error = %e, "Corrupt slot content, using default");
            T::default()
        }
    }
}
