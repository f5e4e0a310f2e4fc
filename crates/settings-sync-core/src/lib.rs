//! # Settings Sync Core
//!
//! Pure primitives for settings sync: the set of synchronizable settings,
//! their typed values, and the wire codec.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`SettingKey`] - One of the statically known synchronizable settings
//! - [`SettingValue`] - A typed value for a setting
//! - [`SettingDescriptor`] - Registry entry: wire name, kind, default
//! - [`WireValue`] - The encoded form sent to the server
//!
//! ## Codec
//!
//! Encoding never fails. Decoding returns `Option` and never raises; see the
//! [`codec`] module.

pub mod codec;
pub mod error;
pub mod registry;
pub mod types;

pub use codec::{decode, encode, wire_integer, WireValue};
pub use error::CoreError;
pub use registry::{SettingDescriptor, SettingKey, REGISTRY};
pub use types::{
    AutoArchiveAfterPlaying, AutoArchiveInactive, PodcastsSortType, SettingKind, SettingValue,
};
