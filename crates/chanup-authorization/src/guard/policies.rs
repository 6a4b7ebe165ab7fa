//! Stock guard policies

use super::AuthorizationGuard;
use chanup_core::{AccountAddress, ChannelId, GuardPolicy, PortId};
use std::collections::BTreeSet;

/// One owner manages every channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleKeyGuard {
    owner: AccountAddress,
}

impl SingleKeyGuard {
    /// Guard owned by `owner`
    pub fn new(owner: AccountAddress) -> Self {
        Self { owner }
    }

    /// Owner address
    pub fn owner(&self) -> &AccountAddress {
        &self.owner
    }
}

impl AuthorizationGuard for SingleKeyGuard {
    fn is_authorized_upgrader(&self, _: &PortId, _: &ChannelId, caller: &AccountAddress) -> bool {
        *caller == self.owner
    }
}

/// Listed members manage channels on the listed ports (every port when none are listed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowlistGuard {
    members: BTreeSet<AccountAddress>,
    ports: BTreeSet<PortId>,
}

impl AllowlistGuard {
    /// Allowlist over every port
    pub fn new(members: impl IntoIterator<Item = AccountAddress>) -> Self {
        Self {
            members: members.into_iter().collect(),
            ports: BTreeSet::new(),
        }
    }

    /// Restrict the allowlist to `ports`
    pub fn scoped_to(mut self, ports: impl IntoIterator<Item = PortId>) -> Self {
        self.ports = ports.into_iter().collect();
        self
    }

    /// Add a member
    pub fn add_member(&mut self, member: AccountAddress) -> bool {
        self.members.insert(member)
    }

    /// Remove a member
    pub fn remove_member(&mut self, member: &AccountAddress) -> bool {
        self.members.remove(member)
    }
}

impl AuthorizationGuard for AllowlistGuard {
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        _: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        (self.ports.is_empty() || self.ports.contains(port_id)) && self.members.contains(caller)
    }
}

/// Only the module itself, e.g. when upgrades are executed by its own governance call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfCallGuard {
    module: AccountAddress,
}

impl SelfCallGuard {
    /// Guard for the module at `module`
    pub fn new(module: AccountAddress) -> Self {
        Self { module }
    }
}

impl AuthorizationGuard for SelfCallGuard {
    fn is_authorized_upgrader(&self, _: &PortId, _: &ChannelId, caller: &AccountAddress) -> bool {
        *caller == self.module
    }
}

/// Passes if any inner guard passes; empty denies everyone
#[derive(Default)]
pub struct AnyOfGuard {
    guards: Vec<Box<dyn AuthorizationGuard>>,
}

impl AnyOfGuard {
    /// Empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inner guard
    pub fn with(mut self, guard: impl AuthorizationGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Add a boxed inner guard
    pub fn push(&mut self, guard: Box<dyn AuthorizationGuard>) {
        self.guards.push(guard);
    }

    /// Number of inner guards
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// No inner guards
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl std::fmt::Debug for AnyOfGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyOfGuard")
            .field("guards", &self.guards.len())
            .finish()
    }
}

impl AuthorizationGuard for AnyOfGuard {
    fn is_authorized_upgrader(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        caller: &AccountAddress,
    ) -> bool {
        self.guards
            .iter()
            .any(|g| g.is_authorized_upgrader(port_id, channel_id, caller))
    }
}

/// Build the guard a configured policy describes
pub fn build_guard(policy: &GuardPolicy) -> Box<dyn AuthorizationGuard> {
    match policy {
        GuardPolicy::SingleKey { owner } => Box::new(SingleKeyGuard::new(*owner)),
        GuardPolicy::Allowlist { members, ports } => Box::new(
            AllowlistGuard::new(members.iter().copied()).scoped_to(ports.iter().cloned()),
        ),
        GuardPolicy::SelfCall { module } => Box::new(SelfCallGuard::new(*module)),
        GuardPolicy::AnyOf { policies } => {
            let mut any = AnyOfGuard::new();
            for inner in policies {
                any.push(build_guard(inner));
            }
            Box::new(any)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> AccountAddress {
        AccountAddress::from_bytes([byte; 20])
    }

    fn port(id: &str) -> PortId {
        PortId::new(id).unwrap()
    }

    fn channel() -> ChannelId {
        ChannelId::new("channel-0").unwrap()
    }

    #[test]
    fn test_single_key() {
        let guard = SingleKeyGuard::new(addr(1));
        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(1)));
        assert!(!guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(2)));
    }

    #[test]
    fn test_allowlist_port_scope() {
        let guard = AllowlistGuard::new([addr(1), addr(2)]).scoped_to([port("transfer")]);
        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(2)));
        assert!(!guard.is_authorized_upgrader(&port("icahost"), &channel(), &addr(2)));
        assert!(!guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(3)));

        let unscoped = AllowlistGuard::new([addr(1)]);
        assert!(unscoped.is_authorized_upgrader(&port("icahost"), &channel(), &addr(1)));
    }

    #[test]
    fn test_allowlist_membership_changes() {
        let mut guard = AllowlistGuard::new([addr(1)]);
        assert!(guard.add_member(addr(2)));
        assert!(guard.remove_member(&addr(1)));
        assert!(!guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(1)));
        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(2)));
    }

    #[test]
    fn test_any_of() {
        let empty = AnyOfGuard::new();
        assert!(!empty.is_authorized_upgrader(&port("transfer"), &channel(), &addr(1)));

        let guard = AnyOfGuard::new()
            .with(SingleKeyGuard::new(addr(1)))
            .with(SelfCallGuard::new(addr(9)));
        assert_eq!(guard.len(), 2);
        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(1)));
        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(9)));
        assert!(!guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(5)));
    }

    #[test]
    fn test_build_from_policy() {
        let policy = GuardPolicy::AnyOf {
            policies: vec![
                GuardPolicy::Allowlist {
                    members: vec![addr(4)],
                    ports: vec![port("transfer")],
                },
                GuardPolicy::SelfCall { module: addr(9) },
            ],
        };
        let guard = build_guard(&policy);

        assert!(guard.is_authorized_upgrader(&port("transfer"), &channel(), &addr(4)));
        assert!(!guard.is_authorized_upgrader(&port("icahost"), &channel(), &addr(4)));
        assert!(guard.is_authorized_upgrader(&port("icahost"), &channel(), &addr(9)));
    }
}
