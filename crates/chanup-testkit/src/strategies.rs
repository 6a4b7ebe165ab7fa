//! Property test strategies for upgrade types
//!
//! Strategies generate only values the authorizer accepts: identifiers inside the host
//! length and character limits, a specified ordering, at least one hop, and a non-empty
//! timeout.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use chanup_core::{AccountAddress, ConnectionId, Height, Order, Timeout, UpgradeFields};

/// Strategy for connection identifiers `connection-N`
pub fn arb_connection_id() -> impl Strategy<Value = ConnectionId> {
    (0u32..1000).prop_map(|n| ConnectionId::new(format!("connection-{n}")).unwrap())
}

/// Strategy for a specified ordering
pub fn arb_order() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::Unordered), Just(Order::Ordered)]
}

/// Strategy for application version strings
pub fn arb_version() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}"
}

/// Strategy for authorizable upgrade fields (one to four hops)
///
/// # Example
///
/// ```rust
/// use chanup_testkit::strategies::arb_upgrade_fields;
/// use proptest::prelude::*;
///
/// proptest! {
///     #[test]
///     fn fields_are_authorizable(fields in arb_upgrade_fields()) {
///         prop_assert!(fields.ensure_authorizable().is_ok());
///     }
/// }
/// ```
pub fn arb_upgrade_fields() -> impl Strategy<Value = UpgradeFields> {
    (
        arb_order(),
        prop::collection::vec(arb_connection_id(), 1..=4),
        arb_version(),
    )
        .prop_map(|(ordering, hops, version)| UpgradeFields::new(ordering, hops, version))
}

/// Strategy for non-empty timeouts: height only, timestamp only, or both
pub fn arb_timeout() -> impl Strategy<Value = Timeout> {
    let height = (0u64..4, 1u64..1_000_000).prop_map(|(n, h)| Height::new(n, h));
    let timestamp = 1u64..u64::MAX;
    prop_oneof![
        height.clone().prop_map(|h| Timeout::new(h, 0)),
        timestamp.clone().prop_map(Timeout::at_timestamp),
        (height, timestamp).prop_map(|(h, t)| Timeout::new(h, t)),
    ]
}

/// Strategy for arbitrary account addresses
pub fn arb_address() -> impl Strategy<Value = AccountAddress> {
    any::<[u8; 20]>().prop_map(AccountAddress::from_bytes)
}
