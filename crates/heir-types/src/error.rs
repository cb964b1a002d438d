use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid byte quantity {0:?}: expected an integer with a unit of K, M, G, or T (e.g. 256M, 1G)")]
    InvalidByteQuantity(String),

    #[error("invalid health check type {0:?}: expected one of port, process, http, none")]
    InvalidHealthCheckType(String),

    #[error("value cannot be represented as text: {0}")]
    NotRepresentable(String),
}
