//! Domain models for the Nova assistant.
//!
//! Every type that is persisted under its own storage slot implements
//! [`crate::repository::Slot`] next to its definition.

pub mod audit;
pub mod chat;
pub mod feedback;
pub mod journal;
pub mod mode;
pub mod plan;
pub mod profile;
pub mod registry;
pub mod security;
pub mod timestamp;
