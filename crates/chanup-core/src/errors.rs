//! Unified error system for channel-upgrade authorization
//!
//! Every precondition failure maps to exactly one variant. Variants that describe a value
//! mismatch (channel state, upgrade sequence) carry the actual value observed so callers can
//! resubmit a corrected request without a second query.

use crate::types::{AccountAddress, ChannelId, ChannelState, FieldMismatch, PortId};

/// Unified error type for all upgrade authorization operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    /// Caller failed the injected authorization guard
    #[error("caller {caller} is not an authorized upgrader for {port_id}/{channel_id}")]
    UnauthorizedUpgrader {
        /// Port of the targeted channel
        port_id: PortId,
        /// Targeted channel
        channel_id: ChannelId,
        /// Rejected caller
        caller: AccountAddress,
    },

    /// Timeout has neither a height nor a timestamp
    #[error("upgrade timeout must set a non-zero height or timestamp")]
    InvalidTimeout,

    /// Ordering is unspecified or the connection hop list is empty
    #[error("upgrade fields must specify an ordering and at least one connection hop")]
    InvalidConnectionHops,

    /// The engine has no channel at this port/channel pair
    #[error("channel {port_id}/{channel_id} not found")]
    ChannelNotFound {
        /// Port of the missing channel
        port_id: PortId,
        /// Missing channel
        channel_id: ChannelId,
    },

    /// A stored authorization exists and the channel already left OPEN
    #[error("cannot overwrite authorized upgrade for {port_id}/{channel_id} in state {state}")]
    CannotOverwriteUpgrade {
        /// Port of the channel
        port_id: PortId,
        /// Channel whose authorization is locked
        channel_id: ChannelId,
        /// Channel state at the time of the request
        state: ChannelState,
    },

    /// No authorization (or no in-flight engine upgrade) exists for the channel
    #[error("no authorized upgrade found for {port_id}/{channel_id}")]
    UpgradeNotFound {
        /// Port of the channel
        port_id: PortId,
        /// Channel without an authorization
        channel_id: ChannelId,
    },

    /// Proposed upgrade fields differ from the authorized ones
    #[error("proposed upgrade for {port_id}/{channel_id} is not authorized: {mismatch}")]
    UnauthorizedUpgrade {
        /// Port of the channel
        port_id: PortId,
        /// Channel being upgraded
        channel_id: ChannelId,
        /// First field that differs
        mismatch: FieldMismatch,
    },

    /// Removal requested while a handshake is in flight and the channel is not OPEN
    #[error("cannot remove in-progress upgrade for {port_id}/{channel_id} in state {state}")]
    CannotRemoveInProgressUpgrade {
        /// Port of the channel
        port_id: PortId,
        /// Channel with an in-flight handshake
        channel_id: ChannelId,
        /// Channel state at the time of the request
        state: ChannelState,
    },

    /// Flush-complete grant requested while the channel is not FLUSHING
    #[error("channel {port_id}/{channel_id} is not flushing (actual state {actual})")]
    ChannelNotFlushingState {
        /// Port of the channel
        port_id: PortId,
        /// Channel that is not flushing
        channel_id: ChannelId,
        /// Actual channel state
        actual: ChannelState,
    },

    /// Flush-complete grant requested for a sequence other than the current one
    #[error("upgrade sequence mismatch for {port_id}/{channel_id}: requested {requested}, actual {actual}")]
    SequenceMismatch {
        /// Port of the channel
        port_id: PortId,
        /// Channel being upgraded
        channel_id: ChannelId,
        /// Sequence named in the request
        requested: u64,
        /// Channel's current upgrade sequence
        actual: u64,
    },

    /// Identifier failed format validation
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier kind (port, channel, connection, address)
        kind: &'static str,
        /// Rejected input
        value: String,
        /// Validation failure
        reason: String,
    },

    /// Storage backend failure
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Record encoding or decoding failure
    #[error("Codec error: {message}")]
    Codec {
        /// Error message describing the codec failure
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },
}

impl UpgradeError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an identifier validation error
    pub fn invalid_identifier(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnauthorizedUpgrader { .. } => "unauthorized_upgrader",
            Self::InvalidTimeout => "invalid_timeout",
            Self::InvalidConnectionHops => "invalid_connection_hops",
            Self::ChannelNotFound { .. } => "channel_not_found",
            Self::CannotOverwriteUpgrade { .. } => "cannot_overwrite_upgrade",
            Self::UpgradeNotFound { .. } => "upgrade_not_found",
            Self::UnauthorizedUpgrade { .. } => "unauthorized_upgrade",
            Self::CannotRemoveInProgressUpgrade { .. } => "cannot_remove_in_progress_upgrade",
            Self::ChannelNotFlushingState { .. } => "channel_not_flushing_state",
            Self::SequenceMismatch { .. } => "sequence_mismatch",
            Self::InvalidIdentifier { .. } => "invalid_identifier",
            Self::Storage { .. } => "storage",
            Self::Codec { .. } => "codec",
            Self::Config { .. } => "config",
        }
    }
}

/// Standard Result type for upgrade authorization operations
pub type Result<T> = std::result::Result<T, UpgradeError>;

impl From<bincode::Error> for UpgradeError {
    fn from(err: bincode::Error) -> Self {
        Self::codec(err.to_string())
    }
}

impl From<serde_json::Error> for UpgradeError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(format!("Invalid JSON: {err}"))
    }
}

impl From<toml::de::Error> for UpgradeError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {err}"))
    }
}

impl From<std::io::Error> for UpgradeError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}
