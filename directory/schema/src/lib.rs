//! SeaORM entity definitions for the roster directory containers.
//!
//! Dependent records (role claims, user-role links, user logins) reference
//! their owner by id only — the backing store enforces no referential
//! integrity, so dependent cleanup belongs to the store adapters.

pub mod role_claims;
pub mod roles;
pub mod user_logins;
pub mod user_roles;
pub mod users;
