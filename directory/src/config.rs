use sea_orm::{Database, DatabaseConnection, DbErr};

/// Directory configuration loaded from environment variables.
#[derive(Debug)]
pub struct DirectoryConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
}

impl DirectoryConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
        }
    }

    /// Open a connection pool against the configured database.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        Database::connect(&self.database_url).await
    }
}
