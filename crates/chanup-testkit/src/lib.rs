//! Chanup Testing Infrastructure
//!
//! Shared setup for tests across the workspace: a scriptable handshake engine, identifier
//! and field factories, a ready-wired authorizer harness, and proptest strategies.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chanup_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     let harness = UpgradeHarness::with_open_channel();
//!     harness.authorize(unordered(&["connection-0"], "v1")).unwrap();
//! }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

pub mod fixtures;
pub mod mock_engine;
pub mod strategies;

pub use fixtures::*;
pub use mock_engine::MockChannelEngine;

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
