//! Effect interfaces
//!
//! Pure trait signatures for the two collaborators the authorization layer depends on:
//! the handshake engine's read-only channel queries and a keyed store with atomic batches.
//! Implementations live in `chanup-store` (storage) and in the integrating engine.
//!
//! Both traits are synchronous. Every operation runs to completion inside one serialized
//! transaction, so there is nothing to await.

pub mod channel;
pub mod storage;

pub use channel::ChannelQueryEffects;
pub use storage::{StorageEffects, WriteBatch, WriteOp};
