//! Error types for logistics reads, exchanges and transfers.

use thiserror::Error;

use crate::resource::ResourceId;
use crate::transfer::TransferError;

/// Errors surfaced by the logistics core.
///
/// Stock or capacity shortfalls are not errors: exchanges report them by
/// returning less than was requested.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LogisticsError {
    /// A dormant resource node has a missing or non-numeric value.
    #[error("malformed snapshot: {resource} field `{field}` is {}", describe(.value))]
    MalformedSnapshot {
        resource: ResourceId,
        field: String,
        value: Option<String>,
    },

    /// A dormant resource node's `name` value disagrees with its resource.
    #[error("snapshot node for {expected} is named `{found}`")]
    SnapshotNameMismatch { expected: ResourceId, found: String },

    #[error(transparent)]
    InvalidTransfer(#[from] TransferError),
}

fn describe(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("not a number ({v:?})"),
        None => "missing".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, LogisticsError>;
