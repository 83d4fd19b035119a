use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{password, AuthError, Principal};
use crate::database::Store;

// Verified against when the username is unknown so both failure paths pay for one Argon2 run
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| password::hash_password("sat-unknown-user-placeholder").ok());

/// Checks a submitted username/password pair against the user store
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn Store>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Returns the account's principal, or `InvalidCredentials` whether the
    /// user is unknown or the password is wrong.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let Some(user) = self.store.find_user_by_name(username).await? else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = password::verify_password(password, hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Principal::new(user.name, user.roles))
    }
}
