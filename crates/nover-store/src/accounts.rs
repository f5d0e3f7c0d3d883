//! Registration, login and author upgrade

use uuid::Uuid;

use crate::error::{StoreError, StoreResult, UniqueField};
use crate::password::{hash_password, verify_password};
use crate::reference::ReferenceStore;
use crate::user::{AuthorProfile, NewUser, User, UserStore};

/// Sign-up fields as submitted
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub pen_name: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
}

/// Trim an optional field, treating blank input as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Create a local account.
///
/// Email and username share one conflict code so a caller cannot probe
/// which of the two is registered.
pub async fn register(users: &dyn UserStore, registration: Registration) -> StoreResult<User> {
    let pen_name = non_empty(registration.pen_name);

    if users.find_by_email(&registration.email).await?.is_some()
        || users.find_by_username(&registration.username).await?.is_some()
    {
        return Err(StoreError::AlreadyExists(UniqueField::EmailOrUsername));
    }
    if let Some(pen_name) = &pen_name {
        if users.is_pen_name_taken(pen_name, None).await? {
            return Err(StoreError::AlreadyExists(UniqueField::PenName));
        }
    }

    let password_hash = hash_password(&registration.password)?;
    let user_id = users
        .insert_user(NewUser {
            user_code: Uuid::new_v4().simple().to_string(),
            email: registration.email,
            password_hash,
            full_name: registration.full_name.trim().to_owned(),
            username: registration.username,
            pen_name,
            phone: non_empty(registration.phone),
            instagram: non_empty(registration.instagram),
        })
        .await?;

    tracing::info!(user_id, "Registered user");

    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| StoreError::Storage(format!("user {user_id} vanished after insert")))
}

/// Check a username/password pair. Unknown users and wrong passwords are
/// reported identically.
pub async fn authenticate(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> StoreResult<User> {
    let Some(credentials) = users.credentials_for(username).await? else {
        return Err(StoreError::InvalidCredentials);
    };
    if !verify_password(password, &credentials.password_hash)? {
        tracing::debug!(username, "Password mismatch");
        return Err(StoreError::InvalidCredentials);
    }
    Ok(credentials.user)
}

/// Flag a user as an author and store their payout details
pub async fn upgrade_to_author(
    users: &dyn UserStore,
    reference: &dyn ReferenceStore,
    user_id: i64,
    profile: AuthorProfile,
) -> StoreResult<User> {
    if users.is_pen_name_taken(&profile.pen_name, Some(user_id)).await? {
        return Err(StoreError::AlreadyExists(UniqueField::PenName));
    }
    if reference.find_active_bank(profile.bank_id).await?.is_none() {
        return Err(StoreError::InvalidInput(format!(
            "Unknown bank {}",
            profile.bank_id
        )));
    }

    let profile = AuthorProfile {
        instagram: non_empty(profile.instagram),
        ..profile
    };
    users.update_to_author(user_id, &profile).await?;

    tracing::info!(user_id, "User upgraded to author");

    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
}
