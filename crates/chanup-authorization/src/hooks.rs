//! Upgrade lifecycle hooks
//!
//! Contract the handshake engine invokes at each phase of a channel upgrade. Only the engine
//! calls these; operators use the mutators on `UpgradeAuthorizer` instead.
//!
//! | phase | behaviour |
//! |-------|-----------|
//! | INIT / TRY | proposed fields must equal the authorized fields; returns the authorized version |
//! | ACK | accepted without checking the counterparty version |
//! | OPEN | clears the authorization and the grant for the completed sequence together |

use crate::authorizer::{upgrade_not_found, UpgradeAuthorizer};
use crate::equality::EqualityOracle;
use crate::guard::AuthorizationGuard;
use chanup_core::{
    AccountAddress, ChannelId, ChannelQueryEffects, PortId, Result, StorageEffects, Timeout,
    UpgradeError, UpgradeFields, WriteBatch,
};

/// Hooks the handshake engine calls while driving an upgrade
pub trait UpgradeLifecycleHooks {
    /// Whether `caller` may manage upgrades of the channel
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool;

    /// Whether the handshake at `upgrade_sequence` may move to FLUSHCOMPLETE
    fn can_transition_to_flush_complete(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<bool>;

    /// Deadline of the authorized upgrade
    fn get_upgrade_timeout(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Timeout>;

    /// INIT phase; returns the version to propose
    fn on_chan_upgrade_init(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        proposed: &UpgradeFields,
    ) -> Result<String>;

    /// TRY phase; returns the version to propose
    fn on_chan_upgrade_try(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        proposed: &UpgradeFields,
    ) -> Result<String>;

    /// ACK phase
    fn on_chan_upgrade_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        counterparty_version: &str,
    ) -> Result<()>;

    /// OPEN phase; the upgrade at `upgrade_sequence` completed
    fn on_chan_upgrade_open(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<()>;
}

impl<G, Q, S> UpgradeAuthorizer<G, Q, S>
where
    G: AuthorizationGuard,
    Q: ChannelQueryEffects,
    S: StorageEffects,
{
    fn authorized_version(
        &self,
        phase: &'static str,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        proposed: &UpgradeFields,
    ) -> Result<String> {
        let _lock = self.commit_lock.lock();

        let authorized = self
            .store
            .authorized_upgrade(port_id, channel_id)?
            .ok_or_else(|| upgrade_not_found(port_id, channel_id))?;

        if let Some(mismatch) = EqualityOracle::diff(&authorized.fields, proposed) {
            tracing::warn!(
                phase,
                port = %port_id,
                channel = %channel_id,
                sequence = upgrade_sequence,
                %mismatch,
                "proposed upgrade does not match authorization"
            );
            return Err(UpgradeError::UnauthorizedUpgrade {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                mismatch,
            });
        }

        tracing::debug!(
            phase,
            port = %port_id,
            channel = %channel_id,
            sequence = upgrade_sequence,
            version = %authorized.fields.version,
            "proposed upgrade matches authorization"
        );
        Ok(authorized.fields.version)
    }
}

impl<G, Q, S> UpgradeLifecycleHooks for UpgradeAuthorizer<G, Q, S>
where
    G: AuthorizationGuard,
    Q: ChannelQueryEffects,
    S: StorageEffects,
{
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        self.guard().is_authorized_upgrader(port_id, channel_id, caller)
    }

    fn can_transition_to_flush_complete(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<bool> {
        let _lock = self.commit_lock.lock();
        self.store.transition_granted(port_id, channel_id, upgrade_sequence)
    }

    fn get_upgrade_timeout(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<Timeout> {
        let _lock = self.commit_lock.lock();
        self.store
            .authorized_upgrade(port_id, channel_id)?
            .map(|upgrade| upgrade.timeout)
            .ok_or_else(|| upgrade_not_found(port_id, channel_id))
    }

    fn on_chan_upgrade_init(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        proposed: &UpgradeFields,
    ) -> Result<String> {
        self.authorized_version("init", port_id, channel_id, upgrade_sequence, proposed)
    }

    fn on_chan_upgrade_try(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        proposed: &UpgradeFields,
    ) -> Result<String> {
        self.authorized_version("try", port_id, channel_id, upgrade_sequence, proposed)
    }

    fn on_chan_upgrade_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
        counterparty_version: &str,
    ) -> Result<()> {
        // Counterparty version is trusted to the counterparty's own handshake.
        tracing::debug!(
            port = %port_id,
            channel = %channel_id,
            sequence = upgrade_sequence,
            counterparty_version,
            "upgrade ack accepted"
        );
        Ok(())
    }

    fn on_chan_upgrade_open(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<()> {
        let _lock = self.commit_lock.lock();

        let mut batch = WriteBatch::new();
        self.store.stage_delete_upgrade(&mut batch, port_id, channel_id);
        self.store.stage_delete_transition(&mut batch, port_id, channel_id, upgrade_sequence);
        self.store.commit(batch)?;

        tracing::info!(
            port = %port_id,
            channel = %channel_id,
            sequence = upgrade_sequence,
            "upgrade completed, authorization cleared"
        );
        Ok(())
    }
}
