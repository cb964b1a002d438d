//! Merge engine for heir.
//!
//! Turns an [`InheritanceChain`] into one [`ResolvedApplication`] per
//! application name. Every field key has a merge policy from a fixed table
//! ([`PolicyTable`]):
//!
//! - **override** (scalars): the last present value wins
//! - **append** (lists): every present list is concatenated, duplicates kept
//! - **key-merge** (maps): maps fold left-to-right, later keys win
//!
//! # Precedence
//!
//! Merging happens in two passes over the chain, not one pass per level.
//! The input sequence for application `app` is
//!
//! ```text
//! global(root), ..., global(leaf), app(root), ..., app(leaf)
//! ```
//!
//! so an application-scoped value at *any* level outranks a global value at
//! *every* level, including the leaf. Within one scope the leaf wins.
//!
//! [`InheritanceChain`]: heir_chain::InheritanceChain
//! [`ResolvedApplication`]: heir_types::ResolvedApplication

pub mod engine;
pub mod error;
pub mod merged;
pub mod policy;

pub use engine::{application_names, segments, MergeEngine, Scope, Segment};
pub use error::{MergeError, MergeResult};
pub use merged::{MergedProperties, Origin};
pub use policy::{FieldPolicy, MergeKind, PolicyTable, TypeHint};
