//! Nova Core: domain models, errors and the persistence contract
//! shared by the store, access and console crates.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{NovaError, NovaResult};
pub use repository::{Slot, StateRepository};
