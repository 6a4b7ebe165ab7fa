//! Typed authorization records
//!
//! Absence of an authorization is `None`. There is no sentinel record: a stored
//! `AuthorizedUpgrade` always has a non-empty connection path because only validated fields
//! are ever staged.

use crate::{codec, keys};
use chanup_core::{AuthorizedUpgrade, ChannelId, PortId, Result, StorageEffects, WriteBatch};

/// Authorization records over a storage handler
#[derive(Debug, Clone)]
pub struct AuthorizationStore<S> {
    storage: S,
}

impl<S: StorageEffects> AuthorizationStore<S> {
    /// Wrap a storage handler
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage handler
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored authorization for a channel
    pub fn authorized_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<AuthorizedUpgrade>> {
        self.storage
            .read(&keys::authorized_upgrade(port_id, channel_id))?
            .map(|bytes| codec::decode(&bytes))
            .transpose()
    }

    /// Flush-complete grant for one sequence; absent means not granted
    pub fn transition_granted(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: u64,
    ) -> Result<bool> {
        match self
            .storage
            .read(&keys::authorized_transition(port_id, channel_id, sequence))?
        {
            Some(bytes) => codec::decode(&bytes),
            None => Ok(false),
        }
    }

    /// Stage replacement of a channel's authorization
    pub fn stage_put_upgrade(
        &self,
        batch: &mut WriteBatch,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade: &AuthorizedUpgrade,
    ) -> Result<()> {
        batch.put(
            keys::authorized_upgrade(port_id, channel_id),
            codec::encode(upgrade)?,
        );
        Ok(())
    }

    /// Stage removal of a channel's authorization
    pub fn stage_delete_upgrade(
        &self,
        batch: &mut WriteBatch,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) {
        batch.delete(keys::authorized_upgrade(port_id, channel_id));
    }

    /// Stage a flush-complete grant for one sequence
    pub fn stage_grant_transition(
        &self,
        batch: &mut WriteBatch,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: u64,
    ) -> Result<()> {
        batch.put(
            keys::authorized_transition(port_id, channel_id, sequence),
            codec::encode(&true)?,
        );
        Ok(())
    }

    /// Stage removal of the grant for one sequence
    pub fn stage_delete_transition(
        &self,
        batch: &mut WriteBatch,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: u64,
    ) {
        batch.delete(keys::authorized_transition(port_id, channel_id, sequence));
    }

    /// Apply a staged batch atomically
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        tracing::trace!(ops = batch.len(), "committing authorization batch");
        self.storage.apply_batch(batch)
    }
}
