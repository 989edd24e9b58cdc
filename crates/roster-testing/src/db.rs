//! In-memory database harness for store tests.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use roster_directory_migration::Migrator;

/// Connect to a fresh in-memory SQLite database with the full directory
/// schema applied. Each call returns an isolated database.
///
/// The pool is capped at one connection: every checkout must see the same
/// `:memory:` database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}
