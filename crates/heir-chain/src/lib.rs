//! Inheritance chain construction for heir.
//!
//! A manifest may name a parent with `inherit:`, and the parent may name its
//! own parent. [`ChainBuilder`] follows those references from the leaf (the
//! manifest handed to the deploy command) up to the root ancestor and
//! produces an [`InheritanceChain`] ordered **root-first**. The merge engine
//! depends on that ordering.
//!
//! # Invariants
//!
//! - No document appears twice in a chain. Revisiting a path is reported as
//!   [`ChainError::CycleDetected`] instead of looping.
//! - The chain is built iteratively; depth is bounded by
//!   [`ChainBuilder::max_depth`], not by the call stack.
//! - Documents are never modified once they enter the builder.

pub mod builder;
pub mod chain;
pub mod error;

pub use builder::{ChainBuilder, DEFAULT_MAX_DEPTH};
pub use chain::InheritanceChain;
pub use error::{ChainError, ChainResult};
