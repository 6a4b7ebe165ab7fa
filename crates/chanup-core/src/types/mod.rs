//! Identifier and domain types

pub mod channel;
pub mod identifiers;
pub mod upgrade;

pub use channel::{ChannelEnd, ChannelState, ChannelUpgrade};
pub use identifiers::{AccountAddress, ChannelId, ConnectionId, PortId, ADDRESS_LEN};
pub use upgrade::{
    AuthorizationStatus, AuthorizedUpgrade, FieldMismatch, Height, Order, Timeout, UpgradeFields,
};
