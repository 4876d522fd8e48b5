use std::fmt;

use thiserror::Error;

/// Counts reported when a bulk removal is refused by the safety gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedRemoval {
    pub total: usize,
    pub duplicate_groups: usize,
    pub duplicates: usize,
    pub would_remove: usize,
    pub max_allowed: usize,
}

impl fmt::Display for BlockedRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Refusing to remove {} listings: at most {} (50% of {}) may be removed in one run",
            self.would_remove, self.max_allowed, self.total
        )
    }
}

/// Errors surfaced by the listing maintenance operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Bad request input, rejected before any store access
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to read from store: {0:#}")]
    StoreRead(anyhow::Error),

    #[error("Failed to write to store: {0:#}")]
    StoreWrite(anyhow::Error),

    /// Not a fault: the caller should narrow the scope and try again
    #[error("{0}")]
    SafetyGate(BlockedRemoval),

    #[error("Another maintenance run is in progress for scope {0}")]
    ScopeBusy(String),
}

impl DirectoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
