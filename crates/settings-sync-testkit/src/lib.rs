//! # Settings Sync Testkit
//!
//! Testing utilities for settings sync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Exact request bodies and known responses with the
//!   decisions they must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Devices with controllable clocks sharing an in-memory server
//!
//! ## Golden Vectors
//!
//! ```rust
//! use settings_sync_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use settings_sync_testkit::generators::setting;
//!
//! proptest! {
//!     #[test]
//!     fn values_match_their_key((key, value) in setting()) {
//!         prop_assert_eq!(value.kind(), key.kind());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use settings_sync_testkit::fixtures::TestFixture;
//! use settings_sync_core::{SettingKey, SettingValue};
//!
//! let fixture = TestFixture::new();
//! fixture.edit(SettingKey::SkipForward, SettingValue::Seconds(45));
//! assert!(fixture.needs_sync(SettingKey::SkipForward));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{at, multi_device_fixtures, TestFixture};
pub use generators::{instant, setting, setting_key, value_of, LocalSetting};
pub use vectors::{
    legacy_request_vectors, request_vectors, response_vectors, verify_all_vectors, RequestVector,
    ResponseVector,
};
