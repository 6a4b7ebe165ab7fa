//! Upgrader Guard
//!
//! Capability check run before every mutating operation: may `caller` manage upgrades of
//! `port_id`/`channel_id`? Each integrating application supplies its own policy.
//!
//! # Guard Position
//!
//! ```text
//! operator request → AuthorizationGuard → precondition checks → staged batch → commit
//!                    ^^^^^^^^^^^^^^^^^^
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use chanup_authorization::guard::{AnyOfGuard, SelfCallGuard, SingleKeyGuard};
//!
//! let guard = AnyOfGuard::new()
//!     .with(SingleKeyGuard::new(owner))
//!     .with(SelfCallGuard::new(module));
//! ```
//!
//! Closures with the predicate's signature become guards through `FnGuard`.

mod policies;

pub use policies::{build_guard, AllowlistGuard, AnyOfGuard, SelfCallGuard, SingleKeyGuard};

use chanup_core::{AccountAddress, ChannelId, PortId, Result, UpgradeError};
use std::sync::Arc;

/// Capability predicate for upgrade management
///
/// Evaluated before the authorizer takes its commit lock, so an implementation may call the
/// authorizer's read methods (e.g. `get_authorized_upgrade`).
pub trait AuthorizationGuard: Send + Sync {
    /// Whether `caller` may authorize or manage upgrades on the channel
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool;
}

/// Guard backed by a closure
pub struct FnGuard<F>(pub F);

impl<F> AuthorizationGuard for FnGuard<F>
where
    F: Fn(&PortId, &ChannelId, &AccountAddress) -> bool + Send + Sync,
{
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        (self.0)(port_id, channel_id, caller)
    }
}

impl<T: AuthorizationGuard + ?Sized> AuthorizationGuard for Box<T> {
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        (**self).is_authorized_upgrader(port_id, channel_id, caller)
    }
}

impl<T: AuthorizationGuard + ?Sized> AuthorizationGuard for Arc<T> {
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        (**self).is_authorized_upgrader(port_id, channel_id, caller)
    }
}

/// Run the guard, mapping refusal to `UnauthorizedUpgrader`
pub fn ensure_upgrader<G: AuthorizationGuard + ?Sized>(
    guard: &G,
    port_id: &PortId,
    channel_id: &ChannelId,
    caller: &AccountAddress,
) -> Result<()> {
    if guard.is_authorized_upgrader(port_id, channel_id, caller) {
        Ok(())
    } else {
        Err(UpgradeError::UnauthorizedUpgrader {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            caller: *caller,
        })
    }
}
