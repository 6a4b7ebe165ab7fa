use chanup_core::{ChannelId, PortId};

/// Prefix of every authorized-upgrade key
pub const AUTHORIZED_UPGRADES: &str = "authorizedUpgrades";

/// Prefix of every flush-transition grant key
pub const AUTHORIZED_TRANSITIONS: &str = "authorizedTransitions";

/// Key of the authorized upgrade for one channel
pub fn authorized_upgrade(port_id: &PortId, channel_id: &ChannelId) -> String {
    format!("{AUTHORIZED_UPGRADES}/ports/{port_id}/channels/{channel_id}")
}

/// Key of the flush-complete grant for one channel and upgrade sequence
pub fn authorized_transition(port_id: &PortId, channel_id: &ChannelId, sequence: u64) -> String {
    format!("{AUTHORIZED_TRANSITIONS}/ports/{port_id}/channels/{channel_id}/sequences/{sequence}")
}
