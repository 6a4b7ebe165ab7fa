//! Declarative guard policy

use crate::errors::{Result, UpgradeError};
use crate::types::{AccountAddress, PortId};
use serde::{Deserialize, Serialize};

/// Which callers may manage upgrades
///
/// A description only; `chanup-authorization` builds the matching guard from it.
///
/// ```toml
/// [guard]
/// kind = "allowlist"
/// members = ["0x00000000000000000000000000000000000000aa"]
/// ports = ["transfer"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardPolicy {
    /// One owner address manages every channel
    SingleKey {
        /// Owner address
        owner: AccountAddress,
    },
    /// Any listed address manages channels on the listed ports
    Allowlist {
        /// Permitted callers
        members: Vec<AccountAddress>,
        /// Ports the allowlist applies to; empty means every port
        #[serde(default)]
        ports: Vec<PortId>,
    },
    /// Only the module's own address (governance or self-call flows)
    SelfCall {
        /// Module address
        module: AccountAddress,
    },
    /// Caller passes if any inner policy passes
    AnyOf {
        /// Inner policies
        policies: Vec<GuardPolicy>,
    },
}

impl GuardPolicy {
    /// Reject policies that can never authorize anyone
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SingleKey { .. } | Self::SelfCall { .. } => Ok(()),
            Self::Allowlist { members, .. } => {
                if members.is_empty() {
                    return Err(UpgradeError::config("allowlist guard has no members"));
                }
                Ok(())
            }
            Self::AnyOf { policies } => {
                if policies.is_empty() {
                    return Err(UpgradeError::config("any_of guard has no policies"));
                }
                policies.iter().try_for_each(Self::validate)
            }
        }
    }
}
