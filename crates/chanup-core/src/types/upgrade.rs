//! Upgrade parameter and deadline types

use super::identifiers::ConnectionId;
use crate::errors::{Result, UpgradeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel packet ordering
///
/// `None` is the unspecified sentinel and is never a valid upgrade target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Unspecified
    None,
    /// Packets may be delivered in any order
    Unordered,
    /// Packets are delivered in send order
    Ordered,
}

impl Order {
    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "ORDER_NONE_UNSPECIFIED",
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revisioned block height
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Height {
    /// Chain revision (incremented on chain-id upgrades)
    pub revision_number: u64,
    /// Block height within the revision
    pub revision_height: u64,
}

impl Height {
    /// Create a height
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// Both components are zero
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// Upgrade deadline
///
/// Stored and handed to the engine as-is; expiry is enforced by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeout {
    /// Deadline height on the counterparty chain
    pub height: Height,
    /// Deadline timestamp in nanoseconds since the Unix epoch
    pub timestamp: u64,
}

impl Timeout {
    /// Create a timeout with both components
    pub const fn new(height: Height, timestamp: u64) -> Self {
        Self { height, timestamp }
    }

    /// Height-only timeout
    pub const fn at_height(revision_number: u64, revision_height: u64) -> Self {
        Self::new(Height::new(revision_number, revision_height), 0)
    }

    /// Timestamp-only timeout
    pub const fn at_timestamp(timestamp: u64) -> Self {
        Self::new(Height::new(0, 0), timestamp)
    }

    /// At least one of height or timestamp is set
    pub fn is_valid(&self) -> bool {
        !self.height.is_zero() || self.timestamp != 0
    }

    /// Reject an empty timeout
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(UpgradeError::InvalidTimeout)
        }
    }
}

/// Upgradable channel parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeFields {
    /// Target ordering
    pub ordering: Order,
    /// Target connection path, in hop order
    pub connection_hops: Vec<ConnectionId>,
    /// Target application version
    pub version: String,
}

impl UpgradeFields {
    /// Create an upgrade field set
    pub fn new(
        ordering: Order,
        connection_hops: Vec<ConnectionId>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            ordering,
            connection_hops,
            version: version.into(),
        }
    }

    /// Reject an unspecified ordering or an empty connection path
    pub fn ensure_authorizable(&self) -> Result<()> {
        if self.ordering == Order::None || self.connection_hops.is_empty() {
            return Err(UpgradeError::InvalidConnectionHops);
        }
        Ok(())
    }
}

/// Upgrade an operator has authorized for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUpgrade {
    /// Parameters the handshake must propose
    pub fields: UpgradeFields,
    /// Deadline handed to the engine
    pub timeout: Timeout,
}

impl AuthorizedUpgrade {
    /// Create an authorized upgrade
    pub fn new(fields: UpgradeFields, timeout: Timeout) -> Self {
        Self { fields, timeout }
    }
}

/// First difference found between authorized and proposed upgrade fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMismatch {
    /// Orderings differ
    Ordering {
        /// Authorized ordering
        authorized: Order,
        /// Proposed ordering
        proposed: Order,
    },
    /// Connection paths have different lengths
    HopCount {
        /// Authorized hop count
        authorized: usize,
        /// Proposed hop count
        proposed: usize,
    },
    /// Connection paths differ at `index`
    Hop {
        /// Position in the path
        index: usize,
        /// Authorized hop
        authorized: ConnectionId,
        /// Proposed hop
        proposed: ConnectionId,
    },
    /// Versions differ
    Version {
        /// Authorized version
        authorized: String,
        /// Proposed version
        proposed: String,
    },
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordering {
                authorized,
                proposed,
            } => write!(f, "ordering {proposed} != authorized {authorized}"),
            Self::HopCount {
                authorized,
                proposed,
            } => write!(f, "{proposed} connection hops != authorized {authorized}"),
            Self::Hop {
                index,
                authorized,
                proposed,
            } => write!(f, "hop {index} {proposed} != authorized {authorized}"),
            Self::Version {
                authorized,
                proposed,
            } => write!(f, "version {proposed:?} != authorized {authorized:?}"),
        }
    }
}

/// Authorization-layer view of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    /// No authorization stored
    Unauthorized,
    /// Authorization stored, no flush grant for the current sequence
    Authorized,
    /// Authorization stored and flush-complete granted for `sequence`
    FlushGranted {
        /// Sequence the grant is scoped to
        sequence: u64,
    },
}
