//! # Chanup Authorization
//!
//! Authorization and gating of channel-upgrade handshakes: who may propose an upgrade, what
//! deadline applies, and when the handshake may pass the flush checkpoint.
//!
//! - `guard`: injected upgrader capability check and stock policies
//! - `equality`: structural comparison of authorized vs. proposed fields
//! - `authorizer`: operator mutators (authorize, grant flush-complete, remove)
//! - `hooks`: contract the handshake engine calls at INIT / TRY / ACK / OPEN

#![forbid(unsafe_code)]

pub mod authorizer;
pub mod equality;
pub mod guard;
pub mod hooks;

pub use authorizer::{ConfiguredAuthorizer, UpgradeAuthorizer};
pub use equality::EqualityOracle;
pub use guard::{
    build_guard, AllowlistGuard, AnyOfGuard, AuthorizationGuard, FnGuard, SelfCallGuard,
    SingleKeyGuard,
};
pub use hooks::UpgradeLifecycleHooks;
