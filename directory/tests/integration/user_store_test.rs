use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio_util::sync::CancellationToken;

use roster_directory::domain::repository::{
    RoleStore, UserEmailStore, UserLoginStore, UserMembershipStore, UserPasswordStore,
    UserPhoneStore, UserStore,
};
use roster_directory::domain::types::{LoginInfo, User};
use roster_directory::error::DirectoryError;
use roster_directory_schema::{user_logins, user_roles};
use roster_domain::outcome::codes;
use roster_testing::rng::SampleRng;

use crate::helpers::{sample_role, sample_user, stores};

#[tokio::test]
async fn should_reject_create_without_email_or_name() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();

    let mut no_email = User::new("somebody", "x@example.com");
    no_email.email = String::new();
    assert!(matches!(
        user_store.create(&no_email, &ct).await,
        Err(DirectoryError::InvalidArgument("email"))
    ));

    let mut no_name = User::new("somebody", "x@example.com");
    no_name.user_name = String::new();
    assert!(matches!(
        user_store.create(&no_name, &ct).await,
        Err(DirectoryError::InvalidArgument("user_name"))
    ));
}

#[tokio::test]
async fn should_find_created_user_by_id_name_and_email() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(201);

    let user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    let by_id = user_store.find_by_id(user.id, &ct).await.unwrap().unwrap();
    assert_eq!(by_id.id, user.id);

    let by_name = user_store
        .find_by_normalized_user_name(&user.normalized_user_name, &ct)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, user.id);

    let by_email = user_store
        .find_by_normalized_email(&user.normalized_email, &ct)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn should_return_none_for_unknown_lookups() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();

    assert!(
        user_store
            .find_by_normalized_user_name("NOBODY", &ct)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        user_store
            .find_by_login("github", "missing-key", &ct)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn should_report_duplicate_value_for_same_normalized_email() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(202);

    let user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    let mut twin = sample_user(&mut rng);
    twin.email = user.email.clone();
    twin.normalized_email = user.normalized_email.clone();
    let outcome = user_store.create(&twin, &ct).await.unwrap();
    assert!(!outcome.is_success());
    assert!(outcome.has_code(codes::DUPLICATE_VALUE));
}

#[tokio::test]
async fn should_reflect_attribute_setters_before_update() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(203);

    let mut user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    user_store
        .set_email(&mut user, "new@example.com")
        .unwrap();
    user_store.set_email_confirmed(&mut user, true).unwrap();
    user_store.set_phone_number(&mut user, "5550100").unwrap();

    assert_eq!(user_store.email(&user).unwrap(), "new@example.com");
    assert!(user_store.email_confirmed(&user).unwrap());
    assert_eq!(
        user_store.phone_number(&user).unwrap().as_deref(),
        Some("5550100")
    );

    // Nothing persisted yet.
    let stored = user_store.find_by_id(user.id, &ct).await.unwrap().unwrap();
    assert_ne!(stored.email, "new@example.com");
    assert!(!stored.email_confirmed);
}

#[tokio::test]
async fn should_reject_empty_email_and_normalized_values() {
    let (_db, user_store, _role_store) = stores().await;
    let mut rng = SampleRng::seeded(204);

    let mut user = sample_user(&mut rng);
    assert!(matches!(
        user_store.set_email(&mut user, ""),
        Err(DirectoryError::InvalidArgument("email"))
    ));
    assert!(matches!(
        user_store.set_normalized_email(&mut user, ""),
        Err(DirectoryError::InvalidArgument("normalized_email"))
    ));
    assert!(matches!(
        user_store.set_normalized_user_name(&mut user, ""),
        Err(DirectoryError::InvalidArgument("normalized_user_name"))
    ));
}

#[tokio::test]
async fn should_persist_attribute_changes_on_update() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(205);

    let mut user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    user_store
        .set_email(&mut user, "changed@example.com")
        .unwrap();
    user_store
        .set_normalized_email(&mut user, "CHANGED@EXAMPLE.COM")
        .unwrap();
    user_store.set_email_confirmed(&mut user, true).unwrap();
    user_store.set_phone_number(&mut user, "5550123").unwrap();
    user_store
        .set_phone_number_confirmed(&mut user, true)
        .unwrap();
    user_store
        .set_password_hash(&mut user, "pbkdf2$stub$hash")
        .unwrap();

    let outcome = user_store.update(&mut user, &ct).await.unwrap();
    assert!(outcome.is_success());

    let stored = user_store.find_by_id(user.id, &ct).await.unwrap().unwrap();
    assert_eq!(stored.email, "changed@example.com");
    assert_eq!(stored.normalized_email, "CHANGED@EXAMPLE.COM");
    assert!(stored.email_confirmed);
    assert_eq!(stored.phone_number.as_deref(), Some("5550123"));
    assert!(stored.phone_number_confirmed);
    assert_eq!(stored.password_hash.as_deref(), Some("pbkdf2$stub$hash"));
}

#[tokio::test]
async fn should_track_password_presence() {
    let (_db, user_store, _role_store) = stores().await;
    let mut rng = SampleRng::seeded(206);

    let mut user = sample_user(&mut rng);
    assert!(!user_store.has_password(&user).unwrap());
    user_store.set_password_hash(&mut user, "argon2$hash").unwrap();
    assert!(user_store.has_password(&user).unwrap());
}

#[tokio::test]
async fn should_add_list_resolve_and_remove_logins() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(207);

    let user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    let login = LoginInfo::new("github", "gh-12345", Some("GitHub"));
    user_store.add_login(&user, &login, &ct).await.unwrap();

    let logins = user_store.logins(&user, &ct).await.unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].provider, "github");
    assert_eq!(logins[0].provider_display_name.as_deref(), Some("GitHub"));

    let resolved = user_store
        .find_by_login("github", "gh-12345", &ct)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.id, user.id);

    user_store
        .remove_login(&user, "github", "gh-12345", &ct)
        .await
        .unwrap();
    assert!(user_store.logins(&user, &ct).await.unwrap().is_empty());

    // Removing an absent login stays quiet.
    user_store
        .remove_login(&user, "github", "gh-12345", &ct)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_propagate_duplicate_login_error() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(208);

    let user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    let login = LoginInfo::new("gitlab", "gl-1", None);
    user_store.add_login(&user, &login, &ct).await.unwrap();
    let second = user_store.add_login(&user, &login, &ct).await;
    assert!(matches!(second, Err(DirectoryError::Internal(_))));
}

#[tokio::test]
async fn should_manage_role_membership() {
    let (_db, user_store, role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(209);

    let user = sample_user(&mut rng);
    let role = sample_role(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());
    assert!(role_store.create(&role, &ct).await.unwrap().is_success());

    assert!(matches!(
        user_store.add_to_role(&user, "NO-SUCH-ROLE", &ct).await,
        Err(DirectoryError::RoleNotFound)
    ));

    user_store
        .add_to_role(&user, &role.normalized_name, &ct)
        .await
        .unwrap();
    assert!(
        user_store
            .is_in_role(&user, &role.normalized_name, &ct)
            .await
            .unwrap()
    );
    assert_eq!(
        user_store.roles_of(&user, &ct).await.unwrap(),
        vec![role.name.clone()]
    );
    let members = user_store
        .users_in_role(&role.normalized_name, &ct)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, user.id);

    // Re-adding the same membership is a no-op.
    user_store
        .add_to_role(&user, &role.normalized_name, &ct)
        .await
        .unwrap();
    assert_eq!(user_store.roles_of(&user, &ct).await.unwrap().len(), 1);

    user_store
        .remove_from_role(&user, &role.normalized_name, &ct)
        .await
        .unwrap();
    assert!(
        !user_store
            .is_in_role(&user, &role.normalized_name, &ct)
            .await
            .unwrap()
    );

    // Removing against a missing role stays quiet.
    user_store
        .remove_from_role(&user, "NO-SUCH-ROLE", &ct)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_leave_dependents_behind_on_user_delete() {
    let (db, user_store, role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(210);

    let user = sample_user(&mut rng);
    let role = sample_role(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());
    assert!(role_store.create(&role, &ct).await.unwrap().is_success());
    user_store
        .add_login(&user, &LoginInfo::new("github", "gh-9", None), &ct)
        .await
        .unwrap();
    user_store
        .add_to_role(&user, &role.normalized_name, &ct)
        .await
        .unwrap();

    let outcome = user_store.delete(&user, &ct).await.unwrap();
    assert!(outcome.is_success());
    assert!(user_store.find_by_id(user.id, &ct).await.unwrap().is_none());

    // User delete does not sweep dependents; only role delete does.
    let orphan_logins = user_logins::Entity::find()
        .filter(user_logins::Column::UserId.eq(user.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(orphan_logins, 1);
    let orphan_memberships = user_roles::Entity::find()
        .filter(user_roles::Column::UserId.eq(user.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(orphan_memberships, 1);
}

#[tokio::test]
async fn should_report_concurrency_conflict_for_stale_user() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(211);

    let mut user = sample_user(&mut rng);
    assert!(user_store.create(&user, &ct).await.unwrap().is_success());

    let mut stale = user.clone();
    user_store.set_email_confirmed(&mut user, true).unwrap();
    assert!(user_store.update(&mut user, &ct).await.unwrap().is_success());

    user_store.set_email_confirmed(&mut stale, true).unwrap();
    let outcome = user_store.update(&mut stale, &ct).await.unwrap();
    assert!(!outcome.is_success());
    assert!(outcome.has_code(codes::CONCURRENCY_CONFLICT));
}

#[tokio::test]
async fn should_fail_every_operation_after_dispose() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(212);

    let mut user = sample_user(&mut rng);
    user_store.dispose();

    assert!(matches!(
        user_store.create(&user, &ct).await,
        Err(DirectoryError::Disposed)
    ));
    assert!(matches!(
        user_store.find_by_id(user.id, &ct).await,
        Err(DirectoryError::Disposed)
    ));
    assert!(matches!(
        user_store.email(&user),
        Err(DirectoryError::Disposed)
    ));
    assert!(matches!(
        user_store.set_email(&mut user, "still@example.com"),
        Err(DirectoryError::Disposed)
    ));
    assert!(user_store.is_disposed());
}

#[tokio::test]
async fn should_fail_with_cancelled_before_any_io() {
    let (_db, user_store, _role_store) = stores().await;
    let mut rng = SampleRng::seeded(213);

    let user = sample_user(&mut rng);
    let ct = CancellationToken::new();
    ct.cancel();

    assert!(matches!(
        user_store.create(&user, &ct).await,
        Err(DirectoryError::Cancelled)
    ));
    assert!(matches!(
        user_store.users(&ct).await,
        Err(DirectoryError::Cancelled)
    ));
}

#[tokio::test]
async fn should_list_all_users() {
    let (_db, user_store, _role_store) = stores().await;
    let ct = CancellationToken::new();
    let mut rng = SampleRng::seeded(214);

    let before = user_store.users(&ct).await.unwrap().len();
    for _ in 0..3 {
        let user = sample_user(&mut rng);
        assert!(user_store.create(&user, &ct).await.unwrap().is_success());
    }
    let after = user_store.users(&ct).await.unwrap().len();
    assert_eq!(after, before + 3);
}
