pub mod password;
pub mod token;
pub mod verifier;

use std::collections::BTreeSet;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{TokenCodec, TokenError};
pub use verifier::CredentialVerifier;

/// Header carrying the session token in both directions
pub const AUTH_HEADER: &str = "x-auth-token";

/// Role granted to every self-registered account
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Identity asserted for the lifetime of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of the authentication layers, stored as a request extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Authentication {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl Authentication {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Authentication::Anonymous => None,
            Authentication::Authenticated(principal) => Some(principal),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed credentials")]
    MalformedCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Token could not be issued: {0}")]
    TokenIssue(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedCredentials => "MALFORMED_CREDENTIALS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::TokenIssue(_) | AuthError::Database(_) | AuthError::Password(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Issue(msg) => AuthError::TokenIssue(msg),
            _ => AuthError::InvalidOrExpiredToken,
        }
    }
}

/// Handlers take `Principal` as an argument to require an authenticated caller.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authentication>()
            .and_then(Authentication::principal)
            .cloned()
            .ok_or(ApiError::Authentication(AuthError::Unauthorized))
    }
}
