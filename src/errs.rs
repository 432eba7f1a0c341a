// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use thiserror::Error;

use crate::skiplist::NodeId;

pub type Result<T> = std::result::Result<T, SkipListError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipListError {
    /// The handle is stale or was never handed out by this list.
    #[error("invalid argument: node {0} does not belong to this skip list")]
    UnknownNode(NodeId),
    /// The predecessor has no successor, or its successor is the sentinel.
    #[error("invalid argument: node {0} has no successor to remove")]
    NoSuccessor(NodeId),
    #[error("promotion probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
    #[error("level count must be non-zero and match the list, got {0}")]
    InvalidLevels(usize),
    #[error("skip list invariant violated: {0}")]
    InvariantViolation(String),
}

impl SkipListError {
    /// Whether this error is a caller-contract violation on an operation
    /// argument, as opposed to a construction or consistency failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SkipListError::UnknownNode(_) | SkipListError::NoSuccessor(_))
    }
}
