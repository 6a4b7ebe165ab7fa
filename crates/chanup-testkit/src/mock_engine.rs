//! Scriptable handshake engine
//!
//! Holds channel ends and in-flight upgrade records that tests set directly, and counts
//! queries so tests can check that decisions re-read engine state.

use chanup_core::{
    ChannelEnd, ChannelId, ChannelQueryEffects, ChannelState, ChannelUpgrade, PortId, Result,
    Timeout, UpgradeFields,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

type ChannelKey = (PortId, ChannelId);

/// Mock handshake engine
#[derive(Debug, Default)]
pub struct MockChannelEngine {
    channels: RwLock<BTreeMap<ChannelKey, ChannelEnd>>,
    upgrades: RwLock<BTreeMap<ChannelKey, ChannelUpgrade>>,
    queries: AtomicUsize,
}

impl MockChannelEngine {
    /// Engine with no channels
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a channel end
    pub fn insert_channel(&self, port_id: &PortId, channel_id: &ChannelId, end: ChannelEnd) {
        self.channels
            .write()
            .insert((port_id.clone(), channel_id.clone()), end);
    }

    /// Set the state of an existing channel
    pub fn set_state(&self, port_id: &PortId, channel_id: &ChannelId, state: ChannelState) {
        if let Some(end) = self
            .channels
            .write()
            .get_mut(&(port_id.clone(), channel_id.clone()))
        {
            end.state = state;
        }
    }

    /// Set the upgrade sequence of an existing channel
    pub fn set_upgrade_sequence(&self, port_id: &PortId, channel_id: &ChannelId, sequence: u64) {
        if let Some(end) = self
            .channels
            .write()
            .get_mut(&(port_id.clone(), channel_id.clone()))
        {
            end.upgrade_sequence = sequence;
        }
    }

    /// Record an in-flight upgrade
    pub fn set_channel_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade: ChannelUpgrade,
    ) {
        self.upgrades
            .write()
            .insert((port_id.clone(), channel_id.clone()), upgrade);
    }

    /// Drop the in-flight upgrade record
    pub fn clear_channel_upgrade(&self, port_id: &PortId, channel_id: &ChannelId) {
        self.upgrades
            .write()
            .remove(&(port_id.clone(), channel_id.clone()));
    }

    /// Start an upgrade the way the engine does at INIT: bump the sequence and record the
    /// upgrade, leaving the channel OPEN. Returns the new sequence.
    pub fn init_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        fields: UpgradeFields,
        timeout: Timeout,
    ) -> u64 {
        let sequence = {
            let mut channels = self.channels.write();
            let end = channels
                .get_mut(&(port_id.clone(), channel_id.clone()))
                .expect("init_upgrade on unknown channel");
            end.upgrade_sequence += 1;
            end.upgrade_sequence
        };
        self.set_channel_upgrade(
            port_id,
            channel_id,
            ChannelUpgrade {
                fields,
                timeout,
                next_sequence_send: 1,
            },
        );
        sequence
    }

    /// Move an initialized upgrade into FLUSHING
    pub fn start_flushing(&self, port_id: &PortId, channel_id: &ChannelId) {
        self.set_state(port_id, channel_id, ChannelState::Flushing);
    }

    /// Finish the upgrade: apply the negotiated fields, reopen, drop the upgrade record
    pub fn complete_upgrade(&self, port_id: &PortId, channel_id: &ChannelId) {
        let key = (port_id.clone(), channel_id.clone());
        let upgrade = self.upgrades.write().remove(&key);
        if let (Some(upgrade), Some(end)) = (upgrade, self.channels.write().get_mut(&key)) {
            end.ordering = upgrade.fields.ordering;
            end.connection_hops = upgrade.fields.connection_hops;
            end.version = upgrade.fields.version;
            end.state = ChannelState::Open;
        }
    }

    /// Current channel end, without counting a query
    pub fn peek_channel(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd> {
        self.channels
            .read()
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
    }

    /// Number of queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ChannelQueryEffects for MockChannelEngine {
    fn channel(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Option<ChannelEnd>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek_channel(port_id, channel_id))
    }

    fn channel_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<ChannelUpgrade>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .upgrades
            .read()
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{channel, hop, port, unordered};
    use chanup_core::Order;

    #[test]
    fn test_upgrade_lifecycle_on_engine() {
        let engine = MockChannelEngine::new();
        let (p, c) = (port("transfer"), channel("channel-0"));
        engine.insert_channel(
            &p,
            &c,
            ChannelEnd::open(Order::Ordered, vec![hop("connection-0")], "v1"),
        );

        let sequence = engine.init_upgrade(
            &p,
            &c,
            unordered(&["connection-1"], "v2"),
            Timeout::at_height(0, 10),
        );
        assert_eq!(sequence, 1);
        assert!(engine.channel_upgrade(&p, &c).unwrap().is_some());

        engine.start_flushing(&p, &c);
        assert_eq!(
            engine.channel(&p, &c).unwrap().unwrap().state,
            ChannelState::Flushing
        );

        engine.complete_upgrade(&p, &c);
        let end = engine.peek_channel(&p, &c).unwrap();
        assert_eq!(end.state, ChannelState::Open);
        assert_eq!(end.version, "v2");
        assert_eq!(end.upgrade_sequence, 1);
        assert!(engine.channel_upgrade(&p, &c).unwrap().is_none());
        assert_eq!(engine.query_count(), 3);
    }
}
