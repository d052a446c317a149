//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::record::Role;

/// Domain errors represent data-integrity faults found while building a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot assemble a tree from an empty record list")]
    EmptyRecords,

    #[error("record at position {position} has no value (role: {role:?})")]
    RecordWithoutValue { position: usize, role: Role },

    #[error("block {parent} declares child {child} which was never fetched")]
    DanglingChild { parent: String, child: String },

    #[error("cycle detected in block hierarchy: {0}")]
    CycleDetected(String),

    #[error("invalid page id: {0}")]
    InvalidPageId(String),
}
