//! Engine-owned channel read models
//!
//! These mirror what the handshake engine reports about a channel. The authorization layer
//! never mutates them; they are re-read inside every operation that depends on them.

use super::identifiers::ConnectionId;
use super::upgrade::{Order, Timeout, UpgradeFields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel handshake state as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelState {
    /// Default state, never observed for an existing channel
    Uninitialized,
    /// Opening handshake started locally
    Init,
    /// Opening handshake started by the counterparty
    TryOpen,
    /// Channel is open and no upgrade has moved it out of OPEN
    Open,
    /// Channel is closed
    Closed,
    /// Upgrade in progress, in-flight packets draining
    Flushing,
    /// Upgrade in progress, all packets drained
    FlushComplete,
}

impl ChannelState {
    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Flushing => "FLUSHING",
            Self::FlushComplete => "FLUSHCOMPLETE",
        }
    }

    /// Whether the channel is OPEN
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel end as stored by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnd {
    /// Current handshake state
    pub state: ChannelState,
    /// Current ordering
    pub ordering: Order,
    /// Current connection path
    pub connection_hops: Vec<ConnectionId>,
    /// Current application version
    pub version: String,
    /// Sequence of the latest upgrade attempt; monotonic
    pub upgrade_sequence: u64,
}

impl ChannelEnd {
    /// An OPEN channel at upgrade sequence zero
    pub fn open(
        ordering: Order,
        connection_hops: Vec<ConnectionId>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            state: ChannelState::Open,
            ordering,
            connection_hops,
            version: version.into(),
            upgrade_sequence: 0,
        }
    }
}

/// In-flight upgrade record held by the engine while a handshake runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUpgrade {
    /// Parameters being negotiated
    pub fields: UpgradeFields,
    /// Deadline the engine enforces
    pub timeout: Timeout,
    /// Next packet send sequence at the time flushing began
    pub next_sequence_send: u64,
}
