//! Credential directory persistence layer.
//!
//! Two adapters — [`infra::db::DbUserStore`] and [`infra::db::DbRoleStore`] —
//! implement the capability traits in [`domain::repository`] on top of
//! SeaORM. Lifecycle writes (create/update/delete) return a structured
//! [`roster_domain::outcome::OperationOutcome`] instead of an error on
//! storage conflicts; every other operation propagates
//! [`error::DirectoryError`] unless documented as best-effort.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
