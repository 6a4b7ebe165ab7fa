//! Host identifiers and caller addresses
//!
//! Port, channel and connection identifiers are checked on construction: non-empty and drawn
//! from `[A-Za-z0-9._+-#[]<>]`. The IBC host length bounds are an extra check callers opt into
//! with `ensure_host_bounds`. Deserialization goes through construction.

use crate::errors::{Result, UpgradeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn validate_identifier(kind: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(UpgradeError::invalid_identifier(kind, value, "must not be empty"));
    }

    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "._+-#[]<>".contains(*c)))
    {
        return Err(UpgradeError::invalid_identifier(
            kind,
            value,
            format!("invalid character {c:?}"),
        ));
    }

    Ok(())
}

fn validate_host_bounds(kind: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    if value.len() < min || value.len() > max {
        return Err(UpgradeError::invalid_identifier(
            kind,
            value,
            format!("length must be between {min} and {max}"),
        ));
    }
    Ok(())
}

macro_rules! host_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $min:literal, $max:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                validate_identifier($kind, &value)?;
                Ok(Self(value))
            }

            /// Check the IBC host length bounds for this identifier kind
            pub fn ensure_host_bounds(&self) -> Result<()> {
                validate_host_bounds($kind, &self.0, $min, $max)
            }

            /// Borrow the identifier string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = UpgradeError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = UpgradeError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

host_identifier!(
    /// Port identifier naming an application module on this chain
    PortId,
    "port",
    2,
    128
);

host_identifier!(
    /// Channel identifier, unique within a port
    ChannelId,
    "channel",
    8,
    64
);

host_identifier!(
    /// Connection identifier used as a channel hop
    ConnectionId,
    "connection",
    10,
    64
);

/// Length of an account address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Ledger account address of a caller
///
/// Rendered as `0x`-prefixed lowercase hex; parsing accepts the prefix optionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress([u8; ADDRESS_LEN]);

impl AccountAddress {
    /// Wrap raw address bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Parse a hex address with or without the `0x` prefix
    pub fn from_hex(value: &str) -> Result<Self> {
        let digits = value.strip_prefix("0x").unwrap_or(value);
        let decoded = hex::decode(digits)
            .map_err(|e| UpgradeError::invalid_identifier("address", value, e.to_string()))?;
        let bytes: [u8; ADDRESS_LEN] = decoded.try_into().map_err(|v: Vec<u8>| {
            UpgradeError::invalid_identifier(
                "address",
                value,
                format!("expected {ADDRESS_LEN} bytes, got {}", v.len()),
            )
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountAddress {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = UpgradeError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.to_string()
    }
}
