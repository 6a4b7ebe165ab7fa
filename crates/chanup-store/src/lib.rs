//! # Chanup Store
//!
//! Persistent records of the authorization layer:
//!
//! - `authorizedUpgrades/ports/{port}/channels/{channel}` → `AuthorizedUpgrade`
//! - `authorizedTransitions/ports/{port}/channels/{channel}/sequences/{seq}` → flush grant
//!
//! `AuthorizationStore` is the typed view over any `StorageEffects` handler. Reads go straight
//! to the handler; writes are staged into a `WriteBatch` and committed in one atomic apply so
//! a failed operation never leaves partial state behind.

#![forbid(unsafe_code)]

/// Typed authorization records over a storage handler
pub mod authorization_store;

/// Record encoding
pub mod codec;

/// Storage key layout
pub mod keys;

/// In-memory storage handler
pub mod memory;

pub use authorization_store::AuthorizationStore;
pub use memory::MemoryStorageHandler;
