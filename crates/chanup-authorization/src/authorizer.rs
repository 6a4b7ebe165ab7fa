//! Upgrade authorizer
//!
//! Operator-facing mutators of the authorization store. The caller is checked against the
//! guard first, outside the commit lock, so guards may read the authorizer. The rest of each
//! operation runs under the commit lock: it reads the store and the engine, checks every
//! remaining precondition in a fixed order, and only then commits a single batch. A rejected
//! request writes nothing.
//!
//! # Authorization State Machine
//!
//! ```text
//! Unauthorized ──authorize──▶ Authorized ──grant(seq)──▶ FlushGranted(seq)
//!      ▲                       │   ▲  │                        │
//!      │                       │   └──┘ re-authorize          │
//!      │                       │        (channel OPEN only)   │
//!      └───── remove / open ───┴──────────────────────────────┘
//! ```

use crate::guard::{build_guard, ensure_upgrader, AuthorizationGuard};
use chanup_core::{
    AccountAddress, AuthorizationStatus, AuthorizedUpgrade, ChannelEnd, ChannelId,
    ChannelQueryEffects, ChannelState, ChanupConfig, PortId, Result, StorageEffects, Timeout,
    UpgradeError, UpgradeFields, WriteBatch,
};
use chanup_store::AuthorizationStore;
use parking_lot::Mutex;

/// Authorizer whose guard was built from configuration
pub type ConfiguredAuthorizer<Q, S> = UpgradeAuthorizer<Box<dyn AuthorizationGuard>, Q, S>;

/// Authorization-and-gating layer for one host's channel upgrades
pub struct UpgradeAuthorizer<G, Q, S> {
    guard: G,
    engine: Q,
    pub(crate) store: AuthorizationStore<S>,
    /// Serializes operations; held for the whole read-check-commit sequence
    pub(crate) commit_lock: Mutex<()>,
}

impl<Q, S> UpgradeAuthorizer<Box<dyn AuthorizationGuard>, Q, S>
where
    Q: ChannelQueryEffects,
    S: StorageEffects,
{
    /// Authorizer with the guard described by `config`
    pub fn from_config(config: &ChanupConfig, engine: Q, storage: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(build_guard(&config.guard), engine, storage))
    }
}

impl<G, Q, S> UpgradeAuthorizer<G, Q, S>
where
    G: AuthorizationGuard,
    Q: ChannelQueryEffects,
    S: StorageEffects,
{
    /// Create an authorizer
    pub fn new(guard: G, engine: Q, storage: S) -> Self {
        Self {
            guard,
            engine,
            store: AuthorizationStore::new(storage),
            commit_lock: Mutex::new(()),
        }
    }

    /// The injected guard
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// The engine query handle
    pub fn engine(&self) -> &Q {
        &self.engine
    }

    /// The typed authorization store
    pub fn store(&self) -> &AuthorizationStore<S> {
        &self.store
    }

    /// Stage (or replace) the upgrade `caller` authorizes for a channel
    ///
    /// Replacing an existing authorization is allowed only while the channel is still OPEN.
    pub fn authorize_upgrade(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
        fields: UpgradeFields,
        timeout: Timeout,
    ) -> Result<()> {
        ensure_upgrader(&self.guard, port_id, channel_id, caller)
            .and_then(|()| {
                let _lock = self.commit_lock.lock();
                self.authorize_upgrade_locked(caller, port_id, channel_id, fields, timeout)
            })
            .map_err(|e| rejected("authorize_upgrade", port_id, channel_id, caller, e))
    }

    fn authorize_upgrade_locked(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
        fields: UpgradeFields,
        timeout: Timeout,
    ) -> Result<()> {
        timeout.ensure_valid()?;
        fields.ensure_authorizable()?;

        let channel = self.require_channel(port_id, channel_id)?;
        if self.store.authorized_upgrade(port_id, channel_id)?.is_some()
            && !channel.state.is_open()
        {
            return Err(UpgradeError::CannotOverwriteUpgrade {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                state: channel.state,
            });
        }

        let upgrade = AuthorizedUpgrade::new(fields, timeout);
        let mut batch = WriteBatch::new();
        self.store.stage_put_upgrade(&mut batch, port_id, channel_id, &upgrade)?;
        self.store.commit(batch)?;

        tracing::info!(
            port = %port_id,
            channel = %channel_id,
            caller = %caller,
            ordering = %upgrade.fields.ordering,
            hops = upgrade.fields.connection_hops.len(),
            version = %upgrade.fields.version,
            "upgrade authorized"
        );
        Ok(())
    }

    /// Permit the handshake at `upgrade_sequence` to move from FLUSHING to FLUSHCOMPLETE
    ///
    /// The caller attests that in-flight packets have drained; the grant is scoped to exactly
    /// the channel's current sequence and is never revoked.
    pub fn authorize_upgrade_transition_to_flush_complete(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<()> {
        ensure_upgrader(&self.guard, port_id, channel_id, caller)
            .and_then(|()| {
                let _lock = self.commit_lock.lock();
                self.authorize_flush_locked(caller, port_id, channel_id, upgrade_sequence)
            })
            .map_err(|e| {
                rejected(
                    "authorize_upgrade_transition_to_flush_complete",
                    port_id,
                    channel_id,
                    caller,
                    e,
                )
            })
    }

    fn authorize_flush_locked(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
        upgrade_sequence: u64,
    ) -> Result<()> {
        if self.store.authorized_upgrade(port_id, channel_id)?.is_none()
            || self.engine.channel_upgrade(port_id, channel_id)?.is_none()
        {
            return Err(upgrade_not_found(port_id, channel_id));
        }

        let channel = self.require_channel(port_id, channel_id)?;
        if channel.state != ChannelState::Flushing {
            return Err(UpgradeError::ChannelNotFlushingState {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                actual: channel.state,
            });
        }
        if channel.upgrade_sequence != upgrade_sequence {
            return Err(UpgradeError::SequenceMismatch {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                requested: upgrade_sequence,
                actual: channel.upgrade_sequence,
            });
        }

        let mut batch = WriteBatch::new();
        self.store.stage_grant_transition(&mut batch, port_id, channel_id, upgrade_sequence)?;
        self.store.commit(batch)?;

        tracing::info!(
            port = %port_id,
            channel = %channel_id,
            caller = %caller,
            sequence = upgrade_sequence,
            "flush-complete transition granted"
        );
        Ok(())
    }

    /// Withdraw a channel's authorization
    ///
    /// Refused while the engine has a handshake in flight and the channel has left OPEN
    /// (or is missing from the engine). Flush grants are left in place for the completion hook.
    pub fn remove_authorized_upgrade(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<()> {
        ensure_upgrader(&self.guard, port_id, channel_id, caller)
            .and_then(|()| {
                let _lock = self.commit_lock.lock();
                self.remove_locked(caller, port_id, channel_id)
            })
            .map_err(|e| rejected("remove_authorized_upgrade", port_id, channel_id, caller, e))
    }

    fn remove_locked(
        &self,
        caller: &AccountAddress,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<()> {
        if self.store.authorized_upgrade(port_id, channel_id)?.is_none() {
            return Err(upgrade_not_found(port_id, channel_id));
        }

        if self.engine.channel_upgrade(port_id, channel_id)?.is_some() {
            // A channel the engine no longer reports counts as UNINITIALIZED.
            let state = self
                .engine
                .channel(port_id, channel_id)?
                .map_or(ChannelState::Uninitialized, |channel| channel.state);
            if !state.is_open() {
                return Err(UpgradeError::CannotRemoveInProgressUpgrade {
                    port_id: port_id.clone(),
                    channel_id: channel_id.clone(),
                    state,
                });
            }
        }

        let mut batch = WriteBatch::new();
        self.store.stage_delete_upgrade(&mut batch, port_id, channel_id);
        self.store.commit(batch)?;

        tracing::info!(
            port = %port_id,
            channel = %channel_id,
            caller = %caller,
            "authorized upgrade removed"
        );
        Ok(())
    }

    /// Stored authorization, `None` when the channel has none
    pub fn get_authorized_upgrade(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Option<AuthorizedUpgrade>> {
        let _lock = self.commit_lock.lock();
        self.store.authorized_upgrade(port_id, channel_id)
    }

    /// Where the channel sits in the authorization state machine
    ///
    /// A grant only counts when it matches the channel's current upgrade sequence.
    pub fn authorization_status(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<AuthorizationStatus> {
        let _lock = self.commit_lock.lock();

        if self.store.authorized_upgrade(port_id, channel_id)?.is_none() {
            return Ok(AuthorizationStatus::Unauthorized);
        }

        let granted = match self.engine.channel(port_id, channel_id)? {
            Some(channel) => self
                .store
                .transition_granted(port_id, channel_id, channel.upgrade_sequence)?
                .then_some(channel.upgrade_sequence),
            None => None,
        };

        Ok(match granted {
            Some(sequence) => AuthorizationStatus::FlushGranted { sequence },
            None => AuthorizationStatus::Authorized,
        })
    }

    fn require_channel(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd> {
        self.engine
            .channel(port_id, channel_id)?
            .ok_or_else(|| UpgradeError::ChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }
}

pub(crate) fn upgrade_not_found(port_id: &PortId, channel_id: &ChannelId) -> UpgradeError {
    UpgradeError::UpgradeNotFound {
        port_id: port_id.clone(),
        channel_id: channel_id.clone(),
    }
}

fn rejected(
    operation: &'static str,
    port_id: &PortId,
    channel_id: &ChannelId,
    caller: &AccountAddress,
    error: UpgradeError,
) -> UpgradeError {
    tracing::warn!(
        operation,
        port = %port_id,
        channel = %channel_id,
        caller = %caller,
        code = error.code(),
        error = %error,
        "upgrade operation rejected"
    );
    error
}
