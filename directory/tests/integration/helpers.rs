use sea_orm::DatabaseConnection;

use roster_directory::domain::types::{Role, User};
use roster_directory::infra::db::{DbRoleStore, DbUserStore};
use roster_testing::db::memory_db;
use roster_testing::rng::SampleRng;

/// Fresh in-memory database plus both stores sharing its pool.
pub async fn stores() -> (DatabaseConnection, DbUserStore, DbRoleStore) {
    let db = memory_db().await;
    let user_store = DbUserStore::new(db.clone());
    let role_store = DbRoleStore::new(db.clone());
    (db, user_store, role_store)
}

pub fn sample_user(rng: &mut SampleRng) -> User {
    let user_name = rng.user_name();
    let email = rng.email();
    User::new(&user_name, &email)
}

pub fn sample_role(rng: &mut SampleRng) -> Role {
    Role::new(&rng.role_name())
}
