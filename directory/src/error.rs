/// Directory error variants for non-lifecycle operations.
///
/// Lifecycle writes (create/update/delete) never return these for storage
/// conflicts; those surface as failed `OperationOutcome`s instead.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("required value missing: {0}")]
    InvalidArgument(&'static str),
    #[error("store has been disposed")]
    Disposed,
    #[error("operation cancelled")]
    Cancelled,
    #[error("role not found")]
    RoleNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DirectoryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Disposed => "DISPOSED",
            Self::Cancelled => "CANCELLED",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }
}
