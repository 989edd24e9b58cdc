use sea_orm::{DbErr, SqlErr};

use roster_domain::outcome::OperationFailure;

/// Classify a write-path database error into a structured failure.
///
/// Unique-index rejections and constraint violations get their own codes so
/// callers can tell "duplicate" from "conflict" without inspecting the
/// underlying driver error; everything else falls through to a generic
/// storage-failure code.
pub trait WriteErrorExt {
    fn to_failure(&self) -> OperationFailure;
}

impl WriteErrorExt for DbErr {
    fn to_failure(&self) -> OperationFailure {
        match self.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                OperationFailure::duplicate_value(&detail)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                OperationFailure::constraint_violation(&detail)
            }
            _ => match self {
                DbErr::RecordNotUpdated => OperationFailure::concurrency_conflict(),
                other => OperationFailure::storage_failure(&other.to_string()),
            },
        }
    }
}
