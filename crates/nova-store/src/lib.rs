//! Nova Store: slot-keyed JSON persistence.
//!
//! This crate provides:
//! - A file-backed store writing one JSON document per slot ([`FileStore`], [`StoreConfig`])
//! - An in-memory store for tests and ephemeral sessions ([`MemoryStore`])
//! - Error types ([`StoreError`])

mod codec;
mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::{FileStore, StoreConfig};
pub use memory::MemoryStore;
