//! Test fixtures
//!
//! Factories for identifiers and upgrade fields, plus `UpgradeHarness`, which wires a
//! single-owner authorizer to a mock engine and in-memory storage:
//!
//! - `port`, `channel`, `hop`, `addr`: identifier factories that panic on bad input
//! - `owner`, `stranger`: the harness owner and an address the guard refuses
//! - `unordered`, `ordered`, `default_fields`, `default_timeout`: upgrade parameters
//! - `UpgradeHarness`: authorizer plus the engine and storage behind it

use crate::mock_engine::MockChannelEngine;
use chanup_authorization::{SingleKeyGuard, UpgradeAuthorizer};
use chanup_core::{
    AccountAddress, ChannelEnd, ChannelId, ConnectionId, Order, PortId, Result, Timeout,
    UpgradeFields, ADDRESS_LEN,
};
use chanup_store::MemoryStorageHandler;
use std::sync::Arc;

/// Authorizer over the mock engine and in-memory storage
pub type TestAuthorizer<G = SingleKeyGuard> =
    UpgradeAuthorizer<G, Arc<MockChannelEngine>, MemoryStorageHandler>;

pub fn port(id: &str) -> PortId {
    PortId::new(id).expect("valid port id")
}

pub fn channel(id: &str) -> ChannelId {
    ChannelId::new(id).expect("valid channel id")
}

pub fn hop(id: &str) -> ConnectionId {
    ConnectionId::new(id).expect("valid connection id")
}

/// Address whose twenty bytes are all `byte`
pub fn addr(byte: u8) -> AccountAddress {
    AccountAddress::from_bytes([byte; ADDRESS_LEN])
}

pub fn owner() -> AccountAddress {
    addr(0xaa)
}

pub fn stranger() -> AccountAddress {
    addr(0xbb)
}

pub fn unordered(hops: &[&str], version: &str) -> UpgradeFields {
    UpgradeFields::new(Order::Unordered, hops.iter().map(|h| hop(h)).collect(), version)
}

pub fn ordered(hops: &[&str], version: &str) -> UpgradeFields {
    UpgradeFields::new(Order::Ordered, hops.iter().map(|h| hop(h)).collect(), version)
}

/// `UNORDERED`, `[connection-0]`, `"v1"`
pub fn default_fields() -> UpgradeFields {
    unordered(&["connection-0"], "v1")
}

/// Height-only timeout at revision height 10
pub fn default_timeout() -> Timeout {
    Timeout::at_height(0, 10)
}

/// Single-owner authorizer over one channel, with direct access to its collaborators
pub struct UpgradeHarness {
    pub engine: Arc<MockChannelEngine>,
    pub storage: MemoryStorageHandler,
    pub authorizer: TestAuthorizer,
    pub port: PortId,
    pub channel: ChannelId,
}

impl UpgradeHarness {
    /// Harness whose engine knows no channels
    pub fn new() -> Self {
        let engine = Arc::new(MockChannelEngine::new());
        let storage = MemoryStorageHandler::new();
        let authorizer = UpgradeAuthorizer::new(
            SingleKeyGuard::new(owner()),
            Arc::clone(&engine),
            storage.clone(),
        );
        Self {
            engine,
            storage,
            authorizer,
            port: port("transfer"),
            channel: channel("channel-0"),
        }
    }

    /// Harness with `transfer/channel-0` OPEN at sequence zero
    pub fn with_open_channel() -> Self {
        let harness = Self::new();
        harness.engine.insert_channel(
            &harness.port,
            &harness.channel,
            ChannelEnd::open(Order::Ordered, vec![hop("connection-0")], "v0"),
        );
        harness
    }

    /// Authorize `fields` as the owner with the default timeout
    pub fn authorize(&self, fields: UpgradeFields) -> Result<()> {
        self.authorizer.authorize_upgrade(
            &owner(),
            &self.port,
            &self.channel,
            fields,
            default_timeout(),
        )
    }

    /// Grant the flush-complete transition as the owner
    pub fn grant(&self, sequence: u64) -> Result<()> {
        self.authorizer
            .authorize_upgrade_transition_to_flush_complete(
                &owner(),
                &self.port,
                &self.channel,
                sequence,
            )
    }

    /// Remove the authorization as the owner
    pub fn remove(&self) -> Result<()> {
        self.authorizer
            .remove_authorized_upgrade(&owner(), &self.port, &self.channel)
    }

    /// Start an engine-side handshake for `fields`; returns the new sequence
    pub fn init_upgrade(&self, fields: UpgradeFields) -> u64 {
        self.engine
            .init_upgrade(&self.port, &self.channel, fields, default_timeout())
    }

    /// Start a handshake and move the channel to FLUSHING; returns the sequence
    pub fn begin_flushing(&self, fields: UpgradeFields) -> u64 {
        let sequence = self.init_upgrade(fields);
        self.engine.start_flushing(&self.port, &self.channel);
        sequence
    }
}

impl Default for UpgradeHarness {
    fn default() -> Self {
        Self::new()
    }
}
