//! Authorizers built from configuration, and behaviour when storage fails

#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use chanup_authorization::{ConfiguredAuthorizer, UpgradeAuthorizer, UpgradeLifecycleHooks};
use chanup_core::{
    ChannelEnd, ChanupConfig, GuardPolicy, Order, Result, StorageEffects, UpgradeError,
    WriteBatch,
};
use chanup_store::MemoryStorageHandler;
use chanup_testkit::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn open_engine() -> Arc<MockChannelEngine> {
    let engine = Arc::new(MockChannelEngine::new());
    engine.insert_channel(
        &port("transfer"),
        &channel("channel-0"),
        ChannelEnd::open(Order::Unordered, vec![hop("connection-0")], "v0"),
    );
    engine
}

/// Any-of policy loaded from TOML admits each listed principal
#[test]
fn test_authorizer_from_toml_policy() {
    let config = ChanupConfig::from_toml_str(&format!(
        r#"
[guard]
kind = "any_of"

[[guard.policies]]
kind = "single_key"
owner = "{}"

[[guard.policies]]
kind = "allowlist"
members = ["{}"]
ports = ["icahost"]
"#,
        owner(),
        addr(3),
    ))
    .unwrap();

    let authorizer: ConfiguredAuthorizer<_, _> =
        UpgradeAuthorizer::from_config(&config, open_engine(), MemoryStorageHandler::new())
            .unwrap();

    let (p, c) = (port("transfer"), channel("channel-0"));
    assert!(authorizer.is_authorized_upgrader(&p, &c, &owner()));
    assert!(!authorizer.is_authorized_upgrader(&p, &c, &addr(3)));
    assert!(authorizer.is_authorized_upgrader(&port("icahost"), &c, &addr(3)));

    authorizer
        .authorize_upgrade(&owner(), &p, &c, default_fields(), default_timeout())
        .unwrap();
}

/// Invalid policies are rejected before an authorizer exists
#[test]
fn test_from_config_rejects_empty_allowlist() {
    let config = ChanupConfig::new(GuardPolicy::Allowlist {
        members: vec![],
        ports: vec![],
    });

    let result = UpgradeAuthorizer::from_config(&config, open_engine(), MemoryStorageHandler::new());

    assert_matches!(result.err(), Some(UpgradeError::Config { .. }));
}

/// Storage whose batch writes can be switched off
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorageHandler,
    fail_writes: AtomicBool,
}

impl StorageEffects for FlakyStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.read(key)
    }

    fn apply_batch(&self, batch: WriteBatch) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(UpgradeError::storage("disk full"));
        }
        self.inner.apply_batch(batch)
    }
}

/// A failed commit surfaces as a storage error and leaves prior state intact
#[test]
fn test_failed_commit_leaves_state_unchanged() {
    let storage = Arc::new(FlakyStorage::default());
    let authorizer = UpgradeAuthorizer::new(
        chanup_authorization::SingleKeyGuard::new(owner()),
        open_engine(),
        Arc::clone(&storage),
    );
    let (p, c) = (port("transfer"), channel("channel-0"));
    authorizer
        .authorize_upgrade(&owner(), &p, &c, default_fields(), default_timeout())
        .unwrap();

    storage.fail_writes.store(true, Ordering::SeqCst);
    let err = authorizer
        .authorize_upgrade(&owner(), &p, &c, ordered(&["connection-1"], "v2"), default_timeout())
        .unwrap_err();
    assert_matches!(err, UpgradeError::Storage { .. });
    assert_eq!(err.code(), "storage");

    let err = authorizer.on_chan_upgrade_open(&p, &c, 1).unwrap_err();
    assert_matches!(err, UpgradeError::Storage { .. });

    let stored = authorizer.get_authorized_upgrade(&p, &c).unwrap().unwrap();
    assert_eq!(stored.fields, default_fields());
}
