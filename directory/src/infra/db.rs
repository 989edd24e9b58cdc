use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionError, TransactionTrait, sea_query::Expr,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use roster_core::sea_ext::WriteErrorExt as _;
use roster_directory_schema::{role_claims, roles, user_logins, user_roles, users};
use roster_domain::outcome::{OperationFailure, OperationOutcome};

use crate::domain::repository::{
    RoleClaimStore, RoleStore, UserEmailStore, UserLoginStore, UserMembershipStore,
    UserPasswordStore, UserPhoneStore, UserStore,
};
use crate::domain::types::{Claim, LoginInfo, Role, User};
use crate::error::DirectoryError;

// ── Shared store plumbing ────────────────────────────────────────────────────

/// One-way disposal latch. Once tripped, every subsequent operation on the
/// owning store fails fast with `Disposed`.
#[derive(Debug, Default)]
struct DisposalFlag(AtomicBool);

impl DisposalFlag {
    fn trip(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

fn require(value: &str, name: &'static str) -> Result<(), DirectoryError> {
    if value.is_empty() {
        return Err(DirectoryError::InvalidArgument(name));
    }
    Ok(())
}

// ── User store ───────────────────────────────────────────────────────────────

/// SeaORM-backed user store. Single-owner: dispose when the scope that
/// acquired it ends.
pub struct DbUserStore {
    db: DatabaseConnection,
    disposed: DisposalFlag,
}

impl DbUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            disposed: DisposalFlag::default(),
        }
    }

    /// Trip the disposal latch. Idempotent in effect: later calls fail fast.
    pub fn dispose(&self) {
        self.disposed.trip();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_tripped()
    }

    /// Entry check for async operations: cancellation first, then disposal.
    fn checkpoint(&self, ct: &CancellationToken) -> Result<(), DirectoryError> {
        if ct.is_cancelled() {
            return Err(DirectoryError::Cancelled);
        }
        self.ensure_live()
    }

    fn ensure_live(&self) -> Result<(), DirectoryError> {
        if self.disposed.is_tripped() {
            return Err(DirectoryError::Disposed);
        }
        Ok(())
    }

    async fn load_user(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn resolve_role(&self, normalized_name: &str) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find()
            .filter(roles::Column::NormalizedName.eq(normalized_name))
            .one(&self.db)
            .await
    }
}

impl UserStore for DbUserStore {
    async fn create(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;
        require(&user.email, "email")?;
        require(&user.user_name, "user_name")?;

        let insert = users::ActiveModel {
            id: Set(user.id),
            user_name: Set(user.user_name.clone()),
            normalized_user_name: Set(user.normalized_user_name.clone()),
            email: Set(user.email.clone()),
            normalized_email: Set(user.normalized_email.clone()),
            email_confirmed: Set(user.email_confirmed),
            phone_number: Set(user.phone_number.clone()),
            phone_number_confirmed: Set(user.phone_number_confirmed),
            password_hash: Set(user.password_hash.clone()),
            etag: Set(user.etag),
        };
        match insert.insert(&self.db).await {
            Ok(_) => Ok(OperationOutcome::succeeded()),
            Err(e) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn update(
        &self,
        user: &mut User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;

        let next_etag = Uuid::new_v4();
        let result = users::Entity::update_many()
            .col_expr(users::Column::UserName, Expr::value(user.user_name.clone()))
            .col_expr(
                users::Column::NormalizedUserName,
                Expr::value(user.normalized_user_name.clone()),
            )
            .col_expr(users::Column::Email, Expr::value(user.email.clone()))
            .col_expr(
                users::Column::NormalizedEmail,
                Expr::value(user.normalized_email.clone()),
            )
            .col_expr(
                users::Column::EmailConfirmed,
                Expr::value(user.email_confirmed),
            )
            .col_expr(
                users::Column::PhoneNumber,
                Expr::value(user.phone_number.clone()),
            )
            .col_expr(
                users::Column::PhoneNumberConfirmed,
                Expr::value(user.phone_number_confirmed),
            )
            .col_expr(
                users::Column::PasswordHash,
                Expr::value(user.password_hash.clone()),
            )
            .col_expr(users::Column::Etag, Expr::value(next_etag))
            .filter(users::Column::Id.eq(user.id))
            .filter(users::Column::Etag.eq(user.etag))
            .exec(&self.db)
            .await;

        match result {
            Ok(updated) if updated.rows_affected == 0 => {
                Ok(OperationOutcome::failed([
                    OperationFailure::concurrency_conflict(),
                ]))
            }
            Ok(_) => {
                user.etag = next_etag;
                Ok(OperationOutcome::succeeded())
            }
            Err(e) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn delete(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;

        // Dependent user_roles/user_logins rows are left behind on purpose;
        // see the role store's delete for the cascading variant.
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(user.id))
            .filter(users::Column::Etag.eq(user.etag))
            .exec(&self.db)
            .await;

        match result {
            Ok(deleted) if deleted.rows_affected == 0 => {
                Ok(OperationOutcome::failed([
                    OperationFailure::concurrency_conflict(),
                ]))
            }
            Ok(_) => Ok(OperationOutcome::succeeded()),
            Err(e) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError> {
        self.checkpoint(ct)?;
        self.load_user(id).await
    }

    async fn find_by_normalized_user_name(
        &self,
        normalized_user_name: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_user_name, "normalized_user_name")?;

        let model = users::Entity::find()
            .filter(users::Column::NormalizedUserName.eq(normalized_user_name))
            .one(&self.db)
            .await
            .context("find user by normalized name")?;
        Ok(model.map(user_from_model))
    }

    async fn users(&self, ct: &CancellationToken) -> Result<Vec<User>, DirectoryError> {
        self.checkpoint(ct)?;
        let models = users::Entity::find()
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    fn user_id(&self, user: &User) -> Result<Uuid, DirectoryError> {
        self.ensure_live()?;
        Ok(user.id)
    }

    fn user_name(&self, user: &User) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(user.user_name.clone())
    }

    fn set_user_name(&self, user: &mut User, user_name: &str) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        user.user_name = user_name.to_owned();
        Ok(())
    }

    fn normalized_user_name(&self, user: &User) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(user.normalized_user_name.clone())
    }

    fn set_normalized_user_name(
        &self,
        user: &mut User,
        normalized_user_name: &str,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        require(normalized_user_name, "normalized_user_name")?;
        user.normalized_user_name = normalized_user_name.to_owned();
        Ok(())
    }
}

impl UserEmailStore for DbUserStore {
    fn email(&self, user: &User) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(user.email.clone())
    }

    fn set_email(&self, user: &mut User, email: &str) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        require(email, "email")?;
        user.email = email.to_owned();
        Ok(())
    }

    fn email_confirmed(&self, user: &User) -> Result<bool, DirectoryError> {
        self.ensure_live()?;
        Ok(user.email_confirmed)
    }

    fn set_email_confirmed(&self, user: &mut User, confirmed: bool) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        user.email_confirmed = confirmed;
        Ok(())
    }

    fn normalized_email(&self, user: &User) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(user.normalized_email.clone())
    }

    fn set_normalized_email(
        &self,
        user: &mut User,
        normalized_email: &str,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        require(normalized_email, "normalized_email")?;
        user.normalized_email = normalized_email.to_owned();
        Ok(())
    }

    async fn find_by_normalized_email(
        &self,
        normalized_email: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_email, "normalized_email")?;

        let model = users::Entity::find()
            .filter(users::Column::NormalizedEmail.eq(normalized_email))
            .one(&self.db)
            .await
            .context("find user by normalized email")?;
        Ok(model.map(user_from_model))
    }
}

impl UserPasswordStore for DbUserStore {
    fn password_hash(&self, user: &User) -> Result<Option<String>, DirectoryError> {
        self.ensure_live()?;
        Ok(user.password_hash.clone())
    }

    fn set_password_hash(
        &self,
        user: &mut User,
        password_hash: &str,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        user.password_hash = Some(password_hash.to_owned());
        Ok(())
    }

    fn has_password(&self, user: &User) -> Result<bool, DirectoryError> {
        self.ensure_live()?;
        Ok(user.password_hash.as_deref().is_some_and(|h| !h.is_empty()))
    }
}

impl UserPhoneStore for DbUserStore {
    fn phone_number(&self, user: &User) -> Result<Option<String>, DirectoryError> {
        self.ensure_live()?;
        Ok(user.phone_number.clone())
    }

    fn set_phone_number(
        &self,
        user: &mut User,
        phone_number: &str,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        user.phone_number = Some(phone_number.to_owned());
        Ok(())
    }

    fn phone_number_confirmed(&self, user: &User) -> Result<bool, DirectoryError> {
        self.ensure_live()?;
        Ok(user.phone_number_confirmed)
    }

    fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        user.phone_number_confirmed = confirmed;
        Ok(())
    }
}

impl UserLoginStore for DbUserStore {
    async fn add_login(
        &self,
        user: &User,
        login: &LoginInfo,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(&login.provider, "provider")?;
        require(&login.provider_key, "provider_key")?;

        user_logins::ActiveModel {
            login_provider: Set(login.provider.clone()),
            provider_key: Set(login.provider_key.clone()),
            user_id: Set(user.id),
            provider_display_name: Set(login.provider_display_name.clone()),
        }
        .insert(&self.db)
        .await
        .context("add login")?;
        Ok(())
    }

    async fn remove_login(
        &self,
        user: &User,
        provider: &str,
        provider_key: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(provider, "provider")?;
        require(provider_key, "provider_key")?;

        let result = user_logins::Entity::delete_many()
            .filter(user_logins::Column::UserId.eq(user.id))
            .filter(user_logins::Column::LoginProvider.eq(provider))
            .filter(user_logins::Column::ProviderKey.eq(provider_key))
            .exec(&self.db)
            .await;
        if let Err(e) = result {
            // Login removal is best-effort by contract.
            tracing::warn!(error = %e, user_id = %user.id, "login removal failed; ignoring");
        }
        Ok(())
    }

    async fn logins(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<Vec<LoginInfo>, DirectoryError> {
        self.checkpoint(ct)?;
        let models = user_logins::Entity::find()
            .filter(user_logins::Column::UserId.eq(user.id))
            .all(&self.db)
            .await
            .context("list logins for user")?;
        Ok(models.into_iter().map(login_from_model).collect())
    }

    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        ct: &CancellationToken,
    ) -> Result<Option<User>, DirectoryError> {
        self.checkpoint(ct)?;
        require(provider, "provider")?;
        require(provider_key, "provider_key")?;

        let login = user_logins::Entity::find_by_id((provider.to_owned(), provider_key.to_owned()))
            .one(&self.db)
            .await
            .context("find login by provider key")?;
        match login {
            Some(row) => self.load_user(row.user_id).await,
            None => Ok(None),
        }
    }
}

impl UserMembershipStore for DbUserStore {
    async fn add_to_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_role_name, "normalized_role_name")?;

        let role = self
            .resolve_role(normalized_role_name)
            .await
            .context("resolve role for membership add")?
            .ok_or(DirectoryError::RoleNotFound)?;

        let insert = user_roles::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(role.id),
        }
        .insert(&self.db)
        .await;
        if let Err(e) = insert {
            // Duplicate membership is a no-op.
            tracing::warn!(error = %e, user_id = %user.id, role_id = %role.id, "membership add failed; ignoring");
        }
        Ok(())
    }

    async fn remove_from_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_role_name, "normalized_role_name")?;

        // Membership removal is best-effort by contract, lookup included.
        match self.resolve_role(normalized_role_name).await {
            Ok(Some(role)) => {
                let result = user_roles::Entity::delete_many()
                    .filter(user_roles::Column::UserId.eq(user.id))
                    .filter(user_roles::Column::RoleId.eq(role.id))
                    .exec(&self.db)
                    .await;
                if let Err(e) = result {
                    tracing::warn!(error = %e, user_id = %user.id, role_id = %role.id, "membership removal failed; ignoring");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "role lookup for membership removal failed; ignoring");
            }
        }
        Ok(())
    }

    async fn roles_of(
        &self,
        user: &User,
        ct: &CancellationToken,
    ) -> Result<Vec<String>, DirectoryError> {
        self.checkpoint(ct)?;

        // Two-step membership join: collect role ids, then filter the roles
        // container by membership in that id set.
        let memberships = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user.id))
            .all(&self.db)
            .await
            .context("list memberships for user")?;
        let role_ids: Vec<Uuid> = memberships.into_iter().map(|m| m.role_id).collect();

        let models = roles::Entity::find()
            .filter(roles::Column::Id.is_in(role_ids))
            .all(&self.db)
            .await
            .context("load roles by id set")?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn is_in_role(
        &self,
        user: &User,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<bool, DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_role_name, "normalized_role_name")?;

        let Some(role) = self
            .resolve_role(normalized_role_name)
            .await
            .context("resolve role for membership check")?
        else {
            return Ok(false);
        };

        let membership = user_roles::Entity::find_by_id((user.id, role.id))
            .one(&self.db)
            .await
            .context("check membership")?;
        Ok(membership.is_some())
    }

    async fn users_in_role(
        &self,
        normalized_role_name: &str,
        ct: &CancellationToken,
    ) -> Result<Vec<User>, DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_role_name, "normalized_role_name")?;

        let Some(role) = self
            .resolve_role(normalized_role_name)
            .await
            .context("resolve role for member listing")?
        else {
            return Ok(Vec::new());
        };

        let memberships = user_roles::Entity::find()
            .filter(user_roles::Column::RoleId.eq(role.id))
            .all(&self.db)
            .await
            .context("list memberships for role")?;
        let user_ids: Vec<Uuid> = memberships.into_iter().map(|m| m.user_id).collect();

        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .context("load users by id set")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        user_name: model.user_name,
        normalized_user_name: model.normalized_user_name,
        email: model.email,
        normalized_email: model.normalized_email,
        email_confirmed: model.email_confirmed,
        phone_number: model.phone_number,
        phone_number_confirmed: model.phone_number_confirmed,
        password_hash: model.password_hash,
        etag: model.etag,
    }
}

fn login_from_model(model: user_logins::Model) -> LoginInfo {
    LoginInfo {
        provider: model.login_provider,
        provider_key: model.provider_key,
        provider_display_name: model.provider_display_name,
    }
}

// ── Role store ───────────────────────────────────────────────────────────────

/// SeaORM-backed role store. Single-owner, same disposal semantics as the
/// user store.
pub struct DbRoleStore {
    db: DatabaseConnection,
    disposed: DisposalFlag,
}

impl DbRoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            disposed: DisposalFlag::default(),
        }
    }

    pub fn dispose(&self) {
        self.disposed.trip();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_tripped()
    }

    fn checkpoint(&self, ct: &CancellationToken) -> Result<(), DirectoryError> {
        if ct.is_cancelled() {
            return Err(DirectoryError::Cancelled);
        }
        self.ensure_live()
    }

    fn ensure_live(&self) -> Result<(), DirectoryError> {
        if self.disposed.is_tripped() {
            return Err(DirectoryError::Disposed);
        }
        Ok(())
    }
}

impl RoleStore for DbRoleStore {
    async fn create(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;
        require(&role.name, "name")?;

        let insert = roles::ActiveModel {
            id: Set(role.id),
            name: Set(role.name.clone()),
            normalized_name: Set(role.normalized_name.clone()),
            etag: Set(role.etag),
        };
        match insert.insert(&self.db).await {
            Ok(_) => Ok(OperationOutcome::succeeded()),
            Err(e) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn update(
        &self,
        role: &mut Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;

        let next_etag = Uuid::new_v4();
        let result = roles::Entity::update_many()
            .col_expr(roles::Column::Name, Expr::value(role.name.clone()))
            .col_expr(
                roles::Column::NormalizedName,
                Expr::value(role.normalized_name.clone()),
            )
            .col_expr(roles::Column::Etag, Expr::value(next_etag))
            .filter(roles::Column::Id.eq(role.id))
            .filter(roles::Column::Etag.eq(role.etag))
            .exec(&self.db)
            .await;

        match result {
            Ok(updated) if updated.rows_affected == 0 => {
                Ok(OperationOutcome::failed([
                    OperationFailure::concurrency_conflict(),
                ]))
            }
            Ok(_) => {
                role.etag = next_etag;
                Ok(OperationOutcome::succeeded())
            }
            Err(e) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn delete(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<OperationOutcome, DirectoryError> {
        self.checkpoint(ct)?;

        // Sweep dependent claims and memberships with the role itself; a
        // stale etag rolls the whole sweep back.
        let role_id = role.id;
        let etag = role.etag;
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    role_claims::Entity::delete_many()
                        .filter(role_claims::Column::RoleId.eq(role_id))
                        .exec(txn)
                        .await?;
                    user_roles::Entity::delete_many()
                        .filter(user_roles::Column::RoleId.eq(role_id))
                        .exec(txn)
                        .await?;
                    let deleted = roles::Entity::delete_many()
                        .filter(roles::Column::Id.eq(role_id))
                        .filter(roles::Column::Etag.eq(etag))
                        .exec(txn)
                        .await?;
                    if deleted.rows_affected == 0 {
                        return Err(DbErr::RecordNotUpdated);
                    }
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(OperationOutcome::succeeded()),
            Err(TransactionError::Transaction(e)) => {
                Ok(OperationOutcome::failed([e.to_failure()]))
            }
            Err(TransactionError::Connection(e)) => Ok(OperationOutcome::failed([e.to_failure()])),
        }
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        ct: &CancellationToken,
    ) -> Result<Option<Role>, DirectoryError> {
        self.checkpoint(ct)?;
        let model = roles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_normalized_name(
        &self,
        normalized_name: &str,
        ct: &CancellationToken,
    ) -> Result<Option<Role>, DirectoryError> {
        self.checkpoint(ct)?;
        require(normalized_name, "normalized_name")?;

        let model = roles::Entity::find()
            .filter(roles::Column::NormalizedName.eq(normalized_name))
            .one(&self.db)
            .await
            .context("find role by normalized name")?;
        Ok(model.map(role_from_model))
    }

    async fn roles(&self, ct: &CancellationToken) -> Result<Vec<Role>, DirectoryError> {
        self.checkpoint(ct)?;
        let models = roles::Entity::find()
            .all(&self.db)
            .await
            .context("list roles")?;
        Ok(models.into_iter().map(role_from_model).collect())
    }

    fn role_id(&self, role: &Role) -> Result<Uuid, DirectoryError> {
        self.ensure_live()?;
        Ok(role.id)
    }

    fn role_name(&self, role: &Role) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(role.name.clone())
    }

    fn set_role_name(&self, role: &mut Role, name: &str) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        role.name = name.to_owned();
        Ok(())
    }

    fn normalized_role_name(&self, role: &Role) -> Result<String, DirectoryError> {
        self.ensure_live()?;
        Ok(role.normalized_name.clone())
    }

    fn set_normalized_role_name(
        &self,
        role: &mut Role,
        normalized_name: &str,
    ) -> Result<(), DirectoryError> {
        self.ensure_live()?;
        require(normalized_name, "normalized_name")?;
        role.normalized_name = normalized_name.to_owned();
        Ok(())
    }
}

impl RoleClaimStore for DbRoleStore {
    async fn add_claim(
        &self,
        role: &Role,
        claim: &Claim,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(&claim.claim_type, "claim_type")?;

        // Claim ids are numeric but keyed as text; allocate max+1 by the
        // same query-before-insert convention used for name uniqueness.
        let models = role_claims::Entity::find()
            .all(&self.db)
            .await
            .context("scan claim ids")?;
        let next_id = models
            .iter()
            .filter_map(|m| m.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        role_claims::ActiveModel {
            id: Set(next_id.to_string()),
            role_id: Set(role.id),
            claim_type: Set(claim.claim_type.clone()),
            claim_value: Set(claim.claim_value.clone()),
        }
        .insert(&self.db)
        .await
        .context("add role claim")?;
        Ok(())
    }

    async fn remove_claim(
        &self,
        role: &Role,
        claim: &Claim,
        ct: &CancellationToken,
    ) -> Result<(), DirectoryError> {
        self.checkpoint(ct)?;
        require(&claim.claim_type, "claim_type")?;

        role_claims::Entity::delete_many()
            .filter(role_claims::Column::RoleId.eq(role.id))
            .filter(role_claims::Column::ClaimType.eq(&claim.claim_type))
            .filter(role_claims::Column::ClaimValue.eq(&claim.claim_value))
            .exec(&self.db)
            .await
            .context("remove role claim")?;
        Ok(())
    }

    async fn claims(
        &self,
        role: &Role,
        ct: &CancellationToken,
    ) -> Result<Vec<Claim>, DirectoryError> {
        self.checkpoint(ct)?;
        let models = role_claims::Entity::find()
            .filter(role_claims::Column::RoleId.eq(role.id))
            .all(&self.db)
            .await
            .context("list role claims")?;
        Ok(models
            .into_iter()
            .map(|m| Claim {
                claim_type: m.claim_type,
                claim_value: m.claim_value,
            })
            .collect())
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        normalized_name: model.normalized_name,
        etag: model.etag,
    }
}
