//! Foundation types for heir, the manifest inheritance resolver.
//!
//! This crate provides the document and value types shared by every other
//! heir crate. Nothing here performs I/O or merging; it is pure data.
//!
//! # Key Types
//!
//! - [`ManifestDocument`] -- A parsed manifest: global properties, named
//!   application blocks, and an optional parent reference
//! - [`PropertySet`] -- Tagged-variant map from field key to [`FieldValue`]
//! - [`ScalarValue`] -- A single loosely-typed manifest value
//! - [`ByteQuantity`] -- Memory / disk sizes such as `256M` or `1G`
//! - [`HealthCheckType`] -- `port`, `process`, `http`, or `none`
//! - [`ResolvedApplication`] -- The flattened, immutable result for one app

pub mod application;
pub mod document;
pub mod error;
pub mod location;
pub mod property;
pub mod quantity;

pub use application::{HealthCheckType, ResolvedApplication, ResolvedApplicationBuilder};
pub use document::{ApplicationBlock, ManifestDocument};
pub use error::TypeError;
pub use location::{normalize_path, resolve_relative};
pub use property::{FieldValue, PropertySet, ScalarValue};
pub use quantity::ByteQuantity;
