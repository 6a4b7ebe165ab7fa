//! Channel query effects
//!
//! Read-only view of the handshake engine. Results must reflect the engine's state at the
//! moment of the call; implementations must not cache across calls.

use crate::errors::Result;
use crate::types::{ChannelEnd, ChannelId, ChannelUpgrade, PortId};
use std::sync::Arc;

/// Queries against the external handshake engine
pub trait ChannelQueryEffects: Send + Sync {
    /// Channel end for `port_id`/`channel_id`, or `None` if the engine has no such channel
    fn channel(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Option<ChannelEnd>>;

    /// In-flight upgrade record, or `None` if no upgrade handshake is running
    fn channel_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelUpgrade>>;
}

impl<T: ChannelQueryEffects + ?Sized> ChannelQueryEffects for Arc<T> {
    fn channel(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Option<ChannelEnd>> {
        (**self).channel(port_id, channel_id)
    }

    fn channel_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelUpgrade>> {
        (**self).channel_upgrade(port_id, channel_id)
    }
}
