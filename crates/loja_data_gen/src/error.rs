//! Error types for data generation.

use thiserror::Error;

/// Errors raised while building catalogs or generating entities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// A sale needs at least one persisted row in every reference table.
    #[error("no candidate rows in table '{table}': seed reference data before sales")]
    EmptySelection { table: &'static str },

    /// `delivery_status` was called with nothing to choose from.
    #[error("delivery status list is empty")]
    EmptyStatusList,

    /// A weighted table is empty, has a negative weight, or does not sum to 1.0.
    #[error("invalid weights for {table}: {reason}")]
    InvalidWeights { table: String, reason: String },

    /// A stored label does not match any known value.
    #[error("unknown {kind} label: {label:?}")]
    UnknownLabel { kind: &'static str, label: String },
}
