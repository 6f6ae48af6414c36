//! TTL-based bearer-token sessions.

use dashmap::DashMap;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

use crate::db::{Role, User};

const TOKEN_BYTES: usize = 32;

/// Lookup key for a session, derived from the bearer token.
///
/// Only the hash is kept so the store never holds a usable token.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        Self(hex::encode(&hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

/// The authenticated caller, as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Clone)]
struct Session {
    user: SessionUser,
    issued_at: Instant,
}

/// Thread-safe session store.
pub struct SessionStore {
    sessions: DashMap<SessionKey, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Starts a session for `user` and returns the raw token to hand to the client.
    ///
    /// Expired sessions are swept first, so abandoned tokens do not outlive
    /// the next login.
    pub fn issue(&self, user: &User) -> String {
        self.cleanup_expired();
        let token = generate_token();
        self.sessions.insert(
            SessionKey::from_token(&token),
            Session {
                user: SessionUser::from(user),
                issued_at: Instant::now(),
            },
        );
        token
    }

    /// Returns the session owner if the token is known and not expired.
    pub fn resolve(&self, token: &str) -> Option<SessionUser> {
        let key = SessionKey::from_token(token);
        self.sessions.get(&key).and_then(|session| {
            if session.issued_at.elapsed() < self.ttl {
                Some(session.user.clone())
            } else {
                drop(session);
                self.sessions.remove(&key);
                None
            }
        })
    }

    /// Ends a session. Returns false if there was none.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .remove(&SessionKey::from_token(token))
            .is_some()
    }

    /// Removes expired sessions, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.issued_at.elapsed() < self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of sessions held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(&bytes)
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.edu".to_string(),
            password_hash: String::new(),
            role,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_session_key_hashing() {
        let key1 = SessionKey::from_token("token123");
        let key2 = SessionKey::from_token("token123");
        let key3 = SessionKey::from_token("token456");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_eq!(key1.as_str().len(), 64);
        assert!(key1.to_string().ends_with("..."));
    }

    #[test]
    fn test_issue_and_resolve() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue(&user(Role::Admin));

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        let resolved = store.resolve(&token).unwrap();
        assert_eq!(resolved.username, "alice");
        assert!(resolved.is_admin());
        assert!(store.resolve("not-a-token").is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.issue(&user(Role::User));
        let b = store.issue(&user(Role::User));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue(&user(Role::User));

        assert!(store.revoke(&token));
        assert!(!store.revoke(&token));
        assert!(store.resolve(&token).is_none());
    }

    #[test]
    fn test_expired_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.issue(&user(Role::User));
        store.issue(&user(Role::User));

        assert!(store.resolve(&token).is_none());
        assert_eq!(store.len(), 1);

        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_issue_sweeps_abandoned_sessions() {
        let store = SessionStore::new(Duration::from_millis(20));
        for _ in 0..3 {
            store.issue(&user(Role::User));
        }
        assert_eq!(store.len(), 3);

        std::thread::sleep(Duration::from_millis(40));
        let fresh = store.issue(&user(Role::Admin));

        assert_eq!(store.len(), 1);
        assert!(store.resolve(&fresh).unwrap().is_admin());
    }
}
