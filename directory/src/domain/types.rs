use uuid::Uuid;

use roster_domain::normalize::normalize;

/// A user principal.
///
/// Setter methods on the stores mutate these fields in memory only;
/// persistence happens on a later `update`. `etag` is the concurrency
/// token compared at write time and refreshed on every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub password_hash: Option<String>,
    pub etag: Uuid,
}

impl User {
    /// A fresh user with normalized fields derived from the given name and
    /// email. The caller may overwrite the normalized forms afterwards.
    pub fn new(user_name: &str, email: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_name: user_name.to_owned(),
            normalized_user_name: normalize(user_name),
            email: email.to_owned(),
            normalized_email: normalize(email),
            email_confirmed: false,
            phone_number: None,
            phone_number_confirmed: false,
            password_hash: None,
            etag: Uuid::new_v4(),
        }
    }
}

/// A role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub normalized_name: String,
    pub etag: Uuid,
}

impl Role {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            normalized_name: normalize(name),
            etag: Uuid::new_v4(),
        }
    }
}

/// A claim attached to a role. Identity for removal is the
/// `(claim_type, claim_value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: String,
    pub claim_value: String,
}

impl Claim {
    pub fn new(claim_type: &str, claim_value: &str) -> Self {
        Self {
            claim_type: claim_type.to_owned(),
            claim_value: claim_value.to_owned(),
        }
    }
}

/// An external-provider login. Identity is the `(provider, provider_key)`
/// pair; the display name is informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInfo {
    pub provider: String,
    pub provider_key: String,
    pub provider_display_name: Option<String>,
}

impl LoginInfo {
    pub fn new(provider: &str, provider_key: &str, display_name: Option<&str>) -> Self {
        Self {
            provider: provider.to_owned(),
            provider_key: provider_key.to_owned(),
            provider_display_name: display_name.map(str::to_owned),
        }
    }
}
