//! Engine-facing lifecycle hooks

#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use chanup_authorization::UpgradeLifecycleHooks;
use chanup_core::{
    AuthorizationStatus, ChannelState, FieldMismatch, Order, Timeout, UpgradeError,
};
use chanup_testkit::*;

/// INIT with the authorized fields returns the authorized version; a different hop fails
#[test]
fn test_init_matches_authorized_fields() {
    let h = UpgradeHarness::with_open_channel();
    h.authorize(default_fields()).unwrap();

    let version = h
        .authorizer
        .on_chan_upgrade_init(&h.port, &h.channel, 1, &default_fields())
        .unwrap();
    assert_eq!(version, "v1");

    let err = h
        .authorizer
        .on_chan_upgrade_init(&h.port, &h.channel, 1, &unordered(&["connection-1"], "v1"))
        .unwrap_err();
    assert_matches!(
        err,
        UpgradeError::UnauthorizedUpgrade {
            mismatch: FieldMismatch::Hop { index: 0, .. },
            ..
        }
    );
}

/// Short hop names are ordinary identifiers; INIT accepts the exact hop and rejects another
#[test]
fn test_init_with_short_hop_names() {
    let h = UpgradeHarness::with_open_channel();
    h.authorizer
        .authorize_upgrade(
            &owner(),
            &h.port,
            &h.channel,
            unordered(&["conn-0"], "v1"),
            Timeout::at_height(0, 10),
        )
        .unwrap();

    let version = h
        .authorizer
        .on_chan_upgrade_init(&h.port, &h.channel, 1, &unordered(&["conn-0"], "v1"))
        .unwrap();
    assert_eq!(version, "v1");

    let err = h
        .authorizer
        .on_chan_upgrade_init(&h.port, &h.channel, 1, &unordered(&["conn-1"], "v1"))
        .unwrap_err();
    assert_matches!(
        err,
        UpgradeError::UnauthorizedUpgrade {
            mismatch: FieldMismatch::Hop { index: 0, ref authorized, ref proposed },
            ..
        } if authorized.as_str() == "conn-0" && proposed.as_str() == "conn-1"
    );
}

/// TRY applies the same check as INIT
#[test]
fn test_try_matches_authorized_fields() {
    let h = UpgradeHarness::with_open_channel();
    h.authorize(ordered(&["connection-0", "connection-3"], "ics20-2"))
        .unwrap();

    let version = h
        .authorizer
        .on_chan_upgrade_try(
            &h.port,
            &h.channel,
            4,
            &ordered(&["connection-0", "connection-3"], "ics20-2"),
        )
        .unwrap();
    assert_eq!(version, "ics20-2");

    let cases = [
        unordered(&["connection-0", "connection-3"], "ics20-2"),
        ordered(&["connection-0"], "ics20-2"),
        ordered(&["connection-3", "connection-0"], "ics20-2"),
        ordered(&["connection-0", "connection-3"], "ICS20-2"),
    ];
    for proposed in cases {
        assert_matches!(
            h.authorizer
                .on_chan_upgrade_try(&h.port, &h.channel, 4, &proposed)
                .unwrap_err(),
            UpgradeError::UnauthorizedUpgrade { .. }
        );
    }
}

/// INIT and TRY fail without an authorization and never write
#[test]
fn test_propose_hooks_require_authorization() {
    let h = UpgradeHarness::with_open_channel();

    assert_matches!(
        h.authorizer
            .on_chan_upgrade_init(&h.port, &h.channel, 1, &default_fields())
            .unwrap_err(),
        UpgradeError::UpgradeNotFound { .. }
    );
    assert_matches!(
        h.authorizer
            .on_chan_upgrade_try(&h.port, &h.channel, 1, &default_fields())
            .unwrap_err(),
        UpgradeError::UpgradeNotFound { .. }
    );
    assert!(h.storage.is_empty());
}

/// ACK accepts any counterparty version
#[test]
fn test_ack_accepts_unconditionally() {
    let h = UpgradeHarness::new();
    h.authorizer
        .on_chan_upgrade_ack(&h.port, &h.channel, 1, "anything-at-all")
        .unwrap();
    assert!(h.storage.is_empty());
}

/// Timeout lookup returns the stored deadline or UpgradeNotFound
#[test]
fn test_get_upgrade_timeout() {
    let h = UpgradeHarness::with_open_channel();
    assert_matches!(
        h.authorizer
            .get_upgrade_timeout(&h.port, &h.channel)
            .unwrap_err(),
        UpgradeError::UpgradeNotFound { .. }
    );

    let deadline = Timeout::at_timestamp(1_700_000_000_000_000_000);
    h.authorizer
        .authorize_upgrade(&owner(), &h.port, &h.channel, default_fields(), deadline)
        .unwrap();

    assert_eq!(
        h.authorizer
            .get_upgrade_timeout(&h.port, &h.channel)
            .unwrap(),
        deadline
    );
}

/// The hook exposes the injected guard
#[test]
fn test_is_authorized_upgrader_delegates_to_guard() {
    let h = UpgradeHarness::new();
    assert!(h
        .authorizer
        .is_authorized_upgrader(&h.port, &h.channel, &owner()));
    assert!(!h
        .authorizer
        .is_authorized_upgrader(&h.port, &h.channel, &stranger()));
}

/// OPEN clears the authorization and the grant together, and repeats are no-ops
#[test]
fn test_open_clears_authorization_and_grant() {
    let h = UpgradeHarness::with_open_channel();
    h.authorize(default_fields()).unwrap();
    let sequence = h.begin_flushing(default_fields());
    h.grant(sequence).unwrap();
    assert_eq!(h.storage.len(), 2);

    h.engine.complete_upgrade(&h.port, &h.channel);
    h.authorizer
        .on_chan_upgrade_open(&h.port, &h.channel, sequence)
        .unwrap();

    assert_eq!(
        h.authorizer
            .get_authorized_upgrade(&h.port, &h.channel)
            .unwrap(),
        None
    );
    assert!(!h
        .authorizer
        .can_transition_to_flush_complete(&h.port, &h.channel, sequence)
        .unwrap());
    assert!(h.storage.is_empty());

    h.authorizer
        .on_chan_upgrade_open(&h.port, &h.channel, sequence)
        .unwrap();
    assert!(h.storage.is_empty());
}

/// OPEN only reaps the grant of the completed sequence
#[test]
fn test_open_leaves_other_sequences() {
    let h = UpgradeHarness::with_open_channel();
    h.authorize(default_fields()).unwrap();
    let first = h.begin_flushing(default_fields());
    h.grant(first).unwrap();

    // Handshake aborted by the engine; a second attempt starts at the next sequence.
    h.engine.set_state(&h.port, &h.channel, ChannelState::Open);
    h.engine.clear_channel_upgrade(&h.port, &h.channel);
    let second = h.begin_flushing(default_fields());
    assert_eq!(second, first + 1);
    assert_eq!(
        h.authorizer
            .authorization_status(&h.port, &h.channel)
            .unwrap(),
        AuthorizationStatus::Authorized
    );
    h.grant(second).unwrap();

    h.authorizer
        .on_chan_upgrade_open(&h.port, &h.channel, second)
        .unwrap();

    assert!(h
        .authorizer
        .can_transition_to_flush_complete(&h.port, &h.channel, first)
        .unwrap());
    assert!(!h
        .authorizer
        .can_transition_to_flush_complete(&h.port, &h.channel, second)
        .unwrap());
}

/// Full walk through the authorization state machine
#[test]
fn test_full_upgrade_handshake() {
    init_test_tracing();
    let h = UpgradeHarness::with_open_channel();
    let target = ordered(&["connection-7"], "v2");
    let status = || {
        h.authorizer
            .authorization_status(&h.port, &h.channel)
            .unwrap()
    };
    assert_eq!(status(), AuthorizationStatus::Unauthorized);

    h.authorize(target.clone()).unwrap();
    assert_eq!(status(), AuthorizationStatus::Authorized);

    let sequence = h.init_upgrade(target.clone());
    assert_eq!(
        h.authorizer
            .on_chan_upgrade_init(&h.port, &h.channel, sequence, &target)
            .unwrap(),
        "v2"
    );
    h.authorizer
        .on_chan_upgrade_ack(&h.port, &h.channel, sequence, "v2")
        .unwrap();

    h.engine.start_flushing(&h.port, &h.channel);
    h.grant(sequence).unwrap();
    assert_eq!(status(), AuthorizationStatus::FlushGranted { sequence });

    h.engine.complete_upgrade(&h.port, &h.channel);
    h.authorizer
        .on_chan_upgrade_open(&h.port, &h.channel, sequence)
        .unwrap();
    assert_eq!(status(), AuthorizationStatus::Unauthorized);

    let end = h.engine.peek_channel(&h.port, &h.channel).unwrap();
    assert_eq!(end.ordering, Order::Ordered);
    assert_eq!(end.version, "v2");
}
