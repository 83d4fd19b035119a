use std::sync::Arc;

use uuid::Uuid;

use crate::api::{AccountUpdate, NewAccount, UserView};
use crate::auth::{password, Principal, DEFAULT_ROLE};
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::{DatabaseError, Store};
use crate::error::{ApiError, ErrorInfo};

use super::validation::{is_valid_email, FieldErrors, PASSWORD_MIN_LEN};

/// Account registration, lookup and self-service updates
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn register(&self, account: NewAccount) -> Result<UserView, ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_username("name", &account.name);
        errors.check_min_len("password", &account.password, PASSWORD_MIN_LEN);
        errors.into_result()?;

        let email = account.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(ErrorInfo::MailInvalid.into());
        }
        if self.store.find_user_by_name(&account.name).await?.is_some() {
            return Err(ErrorInfo::LoginAlreadyInUse.into());
        }
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ErrorInfo::MailAlreadyInUse.into());
        }

        let password_hash = password::hash_password(&account.password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: account.name,
                email,
                password_hash,
                roles: vec![DEFAULT_ROLE.to_string()],
            })
            .await
            .map_err(unique_violation)?;

        tracing::info!(user_id = %user.id, username = %user.name, "Registered user");
        Ok(user.into())
    }

    /// Looks a user up by id, falling back to the user name
    pub async fn lookup(&self, key: &str) -> Result<UserView, ApiError> {
        let user = match Uuid::parse_str(key) {
            Ok(id) => self.store.find_user_by_id(id).await?,
            Err(_) => self.store.find_user_by_name(key).await?,
        };
        user.map(UserView::from)
            .ok_or_else(|| ErrorInfo::UserNotFound.into())
    }

    pub async fn current(&self, principal: &Principal) -> Result<UserView, ApiError> {
        self.account_of(principal).await.map(UserView::from)
    }

    /// Changes the caller's own email and/or password
    pub async fn update(
        &self,
        principal: &Principal,
        update: AccountUpdate,
    ) -> Result<UserView, ApiError> {
        if let Some(name) = &update.name {
            if name != &principal.username {
                return Err(ApiError::forbidden("Users may only update their own account"));
            }
        }
        if update.email.is_none() && update.password.is_none() {
            return Err(ApiError::bad_request("Nothing to update: provide email or password"));
        }

        if let Some(password) = &update.password {
            let mut errors = FieldErrors::new();
            errors.check_min_len("password", password, PASSWORD_MIN_LEN);
            errors.into_result()?;
        }

        let user = self.account_of(principal).await?;

        let email = update.email.map(|e| e.trim().to_string());
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(ErrorInfo::MailInvalid.into());
            }
            if let Some(holder) = self.store.find_user_by_email(email).await? {
                if holder.id != user.id {
                    return Err(ErrorInfo::MailAlreadyInUse.into());
                }
            }
        }

        let password_hash = update
            .password
            .as_deref()
            .map(password::hash_password)
            .transpose()?;

        let updated = self
            .store
            .update_user(user.id, UserChanges { email, password_hash })
            .await
            .map_err(unique_violation)?;

        tracing::info!(user_id = %updated.id, "Updated account");
        Ok(updated.into())
    }

    async fn account_of(&self, principal: &Principal) -> Result<User, ApiError> {
        self.store
            .find_user_by_name(&principal.username)
            .await?
            .ok_or_else(|| ErrorInfo::UserNotFound.into())
    }
}

/// Maps a unique violation that raced past the pre-checks to its business error
fn unique_violation(err: DatabaseError) -> ApiError {
    match &err {
        DatabaseError::Conflict(constraint) if constraint.contains("email") => {
            ErrorInfo::MailAlreadyInUse.into()
        }
        DatabaseError::Conflict(constraint) if constraint.contains("name") => {
            ErrorInfo::LoginAlreadyInUse.into()
        }
        _ => err.into(),
    }
}
