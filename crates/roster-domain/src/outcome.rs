//! Structured outcomes for lifecycle writes (create/update/delete).
//!
//! The lifecycle triad never surfaces a storage conflict as an error; it
//! returns a failed outcome carrying one or more `(code, description)` pairs
//! so callers can tell a duplicate apart from a lost update without matching
//! on error types.

use serde::Serialize;

/// Stable failure codes carried by [`OperationFailure`].
pub mod codes {
    /// A unique index rejected the write (duplicate normalized name/email).
    pub const DUPLICATE_VALUE: &str = "DUPLICATE_VALUE";
    /// The stored concurrency token no longer matches (lost update).
    pub const CONCURRENCY_CONFLICT: &str = "CONCURRENCY_CONFLICT";
    /// A non-unique constraint rejected the write.
    pub const CONSTRAINT_VIOLATION: &str = "CONSTRAINT_VIOLATION";
    /// The storage layer failed for a reason outside the taxonomy.
    pub const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
}

/// One `(code, description)` pair inside a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub code: String,
    pub description: String,
}

impl OperationFailure {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn duplicate_value(detail: &str) -> Self {
        Self::new(codes::DUPLICATE_VALUE, detail)
    }

    pub fn concurrency_conflict() -> Self {
        Self::new(
            codes::CONCURRENCY_CONFLICT,
            "the record was changed or removed by another writer",
        )
    }

    pub fn constraint_violation(detail: &str) -> Self {
        Self::new(codes::CONSTRAINT_VIOLATION, detail)
    }

    pub fn storage_failure(detail: &str) -> Self {
        Self::new(codes::STORAGE_FAILURE, detail)
    }
}

/// Result of a lifecycle write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OperationOutcome {
    Succeeded,
    Failed(Vec<OperationFailure>),
}

impl OperationOutcome {
    pub fn succeeded() -> Self {
        Self::Succeeded
    }

    pub fn failed(failures: impl IntoIterator<Item = OperationFailure>) -> Self {
        Self::Failed(failures.into_iter().collect())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Failures carried by this outcome; empty on success.
    pub fn failures(&self) -> &[OperationFailure] {
        match self {
            Self::Succeeded => &[],
            Self::Failed(failures) => failures,
        }
    }

    /// True if any failure carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.failures().iter().any(|f| f.code == code)
    }
}
