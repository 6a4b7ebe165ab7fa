//! # Chanup Core - Foundation
//!
//! Foundational types and effect interfaces for the channel-upgrade authorization layer.
//! Everything above this crate (storage, guards, lifecycle hooks) speaks in these types.
//!
//! # Contents
//!
//! - Identifiers: `PortId`, `ChannelId`, `ConnectionId`, `AccountAddress`
//! - Upgrade domain types: `UpgradeFields`, `Timeout`, `AuthorizedUpgrade`
//! - Engine-owned read models: `ChannelEnd`, `ChannelUpgrade`
//! - Effect interfaces: `ChannelQueryEffects` (handshake engine), `StorageEffects` (keyed store)
//! - Unified error type `UpgradeError`
//! - Configuration and tracing setup
//!
//! ## What's NOT in this crate
//!
//! - Guard policies and lifecycle hooks (belong in `chanup-authorization`)
//! - Storage handlers (belong in `chanup-store`)

#![forbid(unsafe_code)]

/// Configuration loading, environment merge and validation
pub mod config;

/// Effect interfaces consumed by the authorization layer
pub mod effects;

/// Unified error handling
pub mod errors;

/// Tracing subscriber setup
pub mod telemetry;

/// Identifier and domain types
pub mod types;

pub use config::{ChanupConfig, GuardPolicy, LogConfig};
pub use effects::{ChannelQueryEffects, StorageEffects, WriteBatch, WriteOp};
pub use errors::{Result, UpgradeError};
pub use types::{
    AccountAddress, AuthorizationStatus, AuthorizedUpgrade, ChannelEnd, ChannelId, ChannelState,
    ChannelUpgrade, ConnectionId, FieldMismatch, Height, Order, PortId, Timeout, UpgradeFields,
    ADDRESS_LEN,
};
