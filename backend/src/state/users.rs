//! Credential store
//!
//! Registered users keyed by username. Records are never updated or removed.

use crate::error::AppError;
use std::collections::HashMap;

/// A registered user
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique username
    pub username: String,
    /// Email as entered, not validated
    pub email: String,
    /// Argon2 PHC hash of the password
    pub password_hash: String,
}

/// Username -> user registry
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, User>,
}

impl UserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user
    ///
    /// Fails with `AppError::UserAlreadyExists` if the username is taken;
    /// the existing record is left untouched.
    pub fn insert(&mut self, user: User) -> Result<(), AppError> {
        if self.users.contains_key(&user.username) {
            return Err(AppError::UserAlreadyExists(user.username));
        }
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Get a user by username
    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// Whether the username is registered
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Copy of the stored password hash, so it can be verified off the lock
    pub fn password_hash(&self, username: &str) -> Option<String> {
        self.users.get(username).map(|user| user.password_hash.clone())
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no user is registered
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::credentials;

    fn authenticate(store: &UserStore, username: &str, password: &str) -> bool {
        store
            .password_hash(username)
            .is_some_and(|hash| credentials::verify_password(password, &hash))
    }

    fn user(username: &str, email: &str, password: &str) -> User {
        User {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: credentials::hash_password(password).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_lookup_hash() {
        let mut store = UserStore::new();
        store.insert(user("alice", "a@x.com", "pw")).unwrap();

        assert!(store.contains("alice"));
        assert!(authenticate(&store, "alice", "pw"));
        assert!(!authenticate(&store, "alice", "wrong"));
        assert!(!authenticate(&store, "nobody", "pw"));
        assert!(store.password_hash("nobody").is_none());
    }

    #[test]
    fn test_duplicate_username_keeps_first_record() {
        let mut store = UserStore::new();
        store.insert(user("alice", "first@x.com", "pw1")).unwrap();

        let result = store.insert(user("alice", "second@x.com", "pw2"));
        assert!(matches!(result, Err(AppError::UserAlreadyExists(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("alice").unwrap().email, "first@x.com");
        assert!(authenticate(&store, "alice", "pw1"));
        assert!(!authenticate(&store, "alice", "pw2"));
    }
}
