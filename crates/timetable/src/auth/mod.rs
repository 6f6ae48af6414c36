//! Accounts, credentials and sessions.

pub mod password;
pub mod session;

pub use session::{SessionKey, SessionStore, SessionUser};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::BootstrapAdmin;
use crate::db::{NewUser, Role, Storage, StorageError, User};
use crate::validation::{LoginForm, SignupForm};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Returned by login and signup.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Creates a regular user account and logs it in.
pub fn signup(
    storage: &dyn Storage,
    sessions: &SessionStore,
    form: SignupForm,
) -> Result<AuthResponse, AuthError> {
    let user = create_account(storage, &form.username, &form.email, &form.password, Role::User)?;
    info!(user = %user.username, "Registered new user");

    Ok(AuthResponse {
        token: sessions.issue(&user),
        user,
    })
}

/// Checks credentials and starts a session.
pub fn login(
    storage: &dyn Storage,
    sessions: &SessionStore,
    form: LoginForm,
) -> Result<AuthResponse, AuthError> {
    let user = match storage.find_user_by_username(&form.username)? {
        Some(user) if password::verify_password(&form.password, &user.password_hash) => Some(user),
        Some(_) => None,
        None => {
            password::verify_unknown_user(&form.password);
            None
        }
    };

    let Some(user) = user else {
        warn!(user = %form.username, "Rejected login");
        return Err(AuthError::InvalidCredentials);
    };

    Ok(AuthResponse {
        token: sessions.issue(&user),
        user,
    })
}

pub fn logout(sessions: &SessionStore, token: &str) -> bool {
    sessions.revoke(token)
}

/// Creates the configured admin account unless the username already exists.
///
/// Returns true if an account was created.
pub fn ensure_bootstrap_admin(
    storage: &dyn Storage,
    admin: &BootstrapAdmin,
) -> Result<bool, AuthError> {
    if storage.find_user_by_username(&admin.username)?.is_some() {
        return Ok(false);
    }

    create_account(
        storage,
        &admin.username,
        &admin.email.to_lowercase(),
        &admin.password,
        Role::Admin,
    )?;
    info!(user = %admin.username, "Created bootstrap admin account");
    Ok(true)
}

fn create_account(
    storage: &dyn Storage,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AuthError> {
    if storage.find_user_by_username(username)?.is_some() {
        return Err(AuthError::UsernameTaken);
    }
    if storage.find_user_by_email(email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password::hash_password(password)?,
        role,
    };

    match storage.create_user(&new_user) {
        Ok(user) => Ok(user),
        // lost a race with a concurrent signup
        Err(StorageError::Duplicate(_)) => Err(AuthError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStorage;
    use std::time::Duration;

    fn setup() -> (SqliteStorage, SessionStore) {
        (
            SqliteStorage::in_memory().unwrap(),
            SessionStore::new(Duration::from_secs(60)),
        )
    }

    fn signup_form(username: &str, email: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret-pass".to_string(),
        }
    }

    #[test]
    fn test_signup_then_login() {
        let (storage, sessions) = setup();

        let signed_up = signup(&storage, &sessions, signup_form("alice", "a@example.edu")).unwrap();
        assert_eq!(signed_up.user.role, Role::User);
        assert!(sessions.resolve(&signed_up.token).is_some());

        let logged_in = login(
            &storage,
            &sessions,
            LoginForm {
                username: "alice".to_string(),
                password: "secret-pass".to_string(),
            },
        )
        .unwrap();
        assert_eq!(logged_in.user.id, signed_up.user.id);
        assert_ne!(logged_in.token, signed_up.token);
    }

    #[test]
    fn test_wrong_password_and_unknown_user() {
        let (storage, sessions) = setup();
        signup(&storage, &sessions, signup_form("alice", "a@example.edu")).unwrap();

        for (username, password) in [("alice", "wrong-pass"), ("bob", "secret-pass")] {
            let err = login(
                &storage,
                &sessions,
                LoginForm {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
    }

    #[test]
    fn test_duplicate_signup() {
        let (storage, sessions) = setup();
        signup(&storage, &sessions, signup_form("alice", "a@example.edu")).unwrap();

        assert!(matches!(
            signup(&storage, &sessions, signup_form("alice", "other@example.edu")).unwrap_err(),
            AuthError::UsernameTaken
        ));
        assert!(matches!(
            signup(&storage, &sessions, signup_form("alicia", "a@example.edu")).unwrap_err(),
            AuthError::EmailTaken
        ));
    }

    #[test]
    fn test_bootstrap_admin_is_idempotent() {
        let (storage, _) = setup();
        let admin = BootstrapAdmin {
            username: "admin".to_string(),
            email: "Admin@Example.edu".to_string(),
            password: "change-me".to_string(),
        };

        assert!(ensure_bootstrap_admin(&storage, &admin).unwrap());
        assert!(!ensure_bootstrap_admin(&storage, &admin).unwrap());

        let stored = storage.find_user_by_username("admin").unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert_eq!(stored.email, "admin@example.edu");
    }

    #[test]
    fn test_logout_revokes_token() {
        let (storage, sessions) = setup();
        let auth = signup(&storage, &sessions, signup_form("alice", "a@example.edu")).unwrap();

        assert!(logout(&sessions, &auth.token));
        assert!(sessions.resolve(&auth.token).is_none());
    }
}
