#![allow(async_fn_in_trait)]

//! Capability traits for the directory stores.
//!
//! One narrow trait per capability so callers depend only on what they use.
//! Async operations check the cancellation token at entry, before any I/O;
//! there is no mid-flight cancellation. Synchronous accessors touch only the
//! passed entity and fail fast once the store is disposed.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use roster_domain::outcome::OperationOutcome;

use crate::domain::types::{Claim, LoginInfo, Role, User};
use crate::error::DirectoryError;

/// Core user lifecycle and naming.
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with `InvalidArgument` on empty user name
    /// or email; storage conflicts surface as a failed outcome.
    async fn create(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    /// Persist mutated attributes via compare-and-swap on the etag. On
    /// success the entity's in-memory etag is refreshed.
    async fn update(
        &self,
        user: &mut User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    /// Remove the user record. Dependent login and membership rows are NOT
    /// swept — see the role store's delete for the cascading variant.
    async fn delete(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    /// Point read by id (the single-partition path).
    async fn find_by_id(
        &self,
        id: Uuid,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError>;

    async fn find_by_normalized_user_name(
        &self,
        normalized_user_name: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError>;

    /// All user records.
    async fn users(&self, ct: &CancellationToken) -> Result<Vec<User>, DirectoryError>;

    fn user_id(&self, user: &User) -> Result<Uuid, DirectoryError>;
    fn user_name(&self, user: &User) -> Result<String, DirectoryError>;
    fn set_user_name(&self, user: &mut User, user_name: &str) -> Result<(), DirectoryError>;
    fn normalized_user_name(&self, user: &User) -> Result<String, DirectoryError>;
    /// Rejects an empty value.
    fn set_normalized_user_name(
        &self,
        user: &mut User,
        normalized_user_name: &str,
    ) -> Result<(), DirectoryError>;
}

/// Email attributes and email-based lookup.
pub trait UserEmailStore: Send + Sync {
    fn email(&self, user: &User) -> Result<String, DirectoryError>;
    /// Rejects an empty value.
    fn set_email(&self, user: &mut User, email: &str) -> Result<(), DirectoryError>;
    fn email_confirmed(&self, user: &User) -> Result<bool, DirectoryError>;
    fn set_email_confirmed(&self, user: &mut User, confirmed: bool) -> Result<(), DirectoryError>;
    fn normalized_email(&self, user: &User) -> Result<String, DirectoryError>;
    /// Rejects an empty value.
    fn set_normalized_email(
        &self,
        user: &mut User,
        normalized_email: &str,
    ) -> Result<(), DirectoryError>;

    async fn find_by_normalized_email(
        &self,
        normalized_email: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError>;
}

/// Password-hash attribute.
pub trait UserPasswordStore: Send + Sync {
    fn password_hash(&self, user: &User) -> Result<Option<String>, DirectoryError>;
    fn set_password_hash(&self, user: &mut User, password_hash: &str)
    -> Result<(), DirectoryError>;
    fn has_password(&self, user: &User) -> Result<bool, DirectoryError>;
}

/// Phone-number attributes.
pub trait UserPhoneStore: Send + Sync {
    fn phone_number(&self, user: &User) -> Result<Option<String>, DirectoryError>;
    fn set_phone_number(&self, user: &mut User, phone_number: &str)
    -> Result<(), DirectoryError>;
    fn phone_number_confirmed(&self, user: &User) -> Result<bool, DirectoryError>;
    fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
    ) -> Result<(), DirectoryError>;
}

/// External-provider logins.
pub trait UserLoginStore: Send + Sync {
    /// Attach a login to the user. Storage errors propagate — adding a
    /// login is never best-effort.
    async fn add_login(
        &self,
        user: &User,
        login: &LoginInfo,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    /// Detach a login. Best-effort: storage errors are absorbed and logged.
    async fn remove_login(
        &self,
        user: &User,
        provider: &str,
        provider_key: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    async fn logins(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<Vec<LoginInfo>, DirectoryError>;

    /// Resolve the user owning the `(provider, provider_key)` login.
    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError>;
}

/// Role memberships.
pub trait UserMembershipStore: Send + Sync {
    /// Add the user to the role with the given normalized name. Fails with
    /// `RoleNotFound` if no such role exists; a duplicate membership is
    /// absorbed as a no-op.
    async fn add_to_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    /// Remove the membership. Best-effort: storage errors are absorbed and
    /// logged; a missing role or membership is a no-op.
    async fn remove_from_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    /// Names of the roles the user belongs to.
    async fn roles_of(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<Vec<String>, DirectoryError>;

    async fn is_in_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<bool, DirectoryError>;

    async fn users_in_role(
        &self,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<Vec<User>, DirectoryError>;
}

/// Core role lifecycle and naming.
pub trait RoleStore: Send + Sync {
    async fn create(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    async fn update(
        &self,
        role: &mut Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    /// Remove the role AND every role-claim and user-role row referencing
    /// it, in one transaction.
    async fn delete(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError>;

    async fn find_by_id(
        &self,
        id: Uuid,
        ct: &CancellationToken,
    ) -> Result<Option<Role>, DirectoryError>;

    async fn find_by_normalized_name(
        &self,
        normalized_name: &str,
        ct: &CancellationToken,
    ) -> Result<Option<Role>, DirectoryError>;

    /// All role records.
    async fn roles(&self, ct: &CancellationToken) -> Result<Vec<Role>, DirectoryError>;

    fn role_id(&self, role: &Role) -> Result<Uuid, DirectoryError>;
    fn role_name(&self, role: &Role) -> Result<String, DirectoryError>;
    fn set_role_name(&self, role: &mut Role, name: &str) -> Result<(), DirectoryError>;
    fn normalized_role_name(&self, role: &Role) -> Result<String, DirectoryError>;
    /// Rejects an empty value.
    fn set_normalized_role_name(
        &self,
        role: &mut Role,
        normalized_name: &str,
    ) -> Result<(), DirectoryError>;
}

/// Role claims.
pub trait RoleClaimStore: Send + Sync {
    async fn add_claim(
        &self,
        role: &Role,
        claim: &Claim,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    /// Remove every claim on the role matching the `(type, value)` pair.
    async fn remove_claim(
        &self,
        role: &Role,
        claim: &Claim,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError>;

    async fn claims(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<Vec<Claim>, DirectoryError>;
}
