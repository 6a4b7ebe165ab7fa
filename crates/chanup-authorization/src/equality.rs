//! Equality oracle for upgrade fields
//!
//! Structural and order-sensitive: same ordering, same hops at every index, byte-equal
//! version. No normalization or case folding.

use chanup_core::{FieldMismatch, UpgradeFields};

/// Comparator for authorized vs. proposed upgrade fields
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualityOracle;

impl EqualityOracle {
    /// Whether `a` and `b` describe the same upgrade
    pub fn equals(a: &UpgradeFields, b: &UpgradeFields) -> bool {
        Self::diff(a, b).is_none()
    }

    /// First field where `proposed` departs from `authorized`
    pub fn diff(authorized: &UpgradeFields, proposed: &UpgradeFields) -> Option<FieldMismatch> {
        if authorized.ordering != proposed.ordering {
            return Some(FieldMismatch::Ordering {
                authorized: authorized.ordering,
                proposed: proposed.ordering,
            });
        }

        if authorized.connection_hops.len() != proposed.connection_hops.len() {
            return Some(FieldMismatch::HopCount {
                authorized: authorized.connection_hops.len(),
                proposed: proposed.connection_hops.len(),
            });
        }

        if let Some((index, (a, p))) = authorized
            .connection_hops
            .iter()
            .zip(&proposed.connection_hops)
            .enumerate()
            .find(|(_, (a, p))| a != p)
        {
            return Some(FieldMismatch::Hop {
                index,
                authorized: a.clone(),
                proposed: p.clone(),
            });
        }

        if authorized.version != proposed.version {
            return Some(FieldMismatch::Version {
                authorized: authorized.version.clone(),
                proposed: proposed.version.clone(),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanup_core::{ConnectionId, Order};

    fn hops(ids: &[&str]) -> Vec<ConnectionId> {
        ids.iter().map(|id| ConnectionId::new(*id).unwrap()).collect()
    }

    fn base() -> UpgradeFields {
        UpgradeFields::new(
            Order::Ordered,
            hops(&["connection-0", "connection-1"]),
            "ics20-1",
        )
    }

    #[test]
    fn test_identical_fields_equal() {
        assert!(EqualityOracle::equals(&base(), &base()));
        assert_eq!(EqualityOracle::diff(&base(), &base()), None);
    }

    #[test]
    fn test_ordering_mismatch() {
        let mut proposed = base();
        proposed.ordering = Order::Unordered;
        assert_eq!(
            EqualityOracle::diff(&base(), &proposed),
            Some(FieldMismatch::Ordering {
                authorized: Order::Ordered,
                proposed: Order::Unordered,
            })
        );
    }

    #[test]
    fn test_hop_order_matters() {
        let mut proposed = base();
        proposed.connection_hops.reverse();
        assert_eq!(
            EqualityOracle::diff(&base(), &proposed),
            Some(FieldMismatch::Hop {
                index: 0,
                authorized: ConnectionId::new("connection-0").unwrap(),
                proposed: ConnectionId::new("connection-1").unwrap(),
            })
        );
    }

    #[test]
    fn test_hop_prefix_is_not_equal() {
        let mut proposed = base();
        proposed.connection_hops.pop();
        assert_eq!(
            EqualityOracle::diff(&base(), &proposed),
            Some(FieldMismatch::HopCount {
                authorized: 2,
                proposed: 1,
            })
        );
    }

    #[test]
    fn test_version_is_case_sensitive() {
        let mut proposed = base();
        proposed.version = "ICS20-1".to_string();
        assert!(!EqualityOracle::equals(&base(), &proposed));
        assert!(matches!(
            EqualityOracle::diff(&base(), &proposed),
            Some(FieldMismatch::Version { .. })
        ));
    }
}
