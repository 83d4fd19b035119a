// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{AuthError, PasswordError};
use crate::database::DatabaseError;

/// Numbered business errors reported to clients as `errCode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorInfo {
    // Users
    MailAlreadyInUse,
    MailInvalid,
    LoginAlreadyInUse,
    UserNotFound,
    // Events
    EventOwnerNotFound,
    EventNotFound,
    AlreadyJoined,
    // Other
    Conflict,
}

impl ErrorInfo {
    pub fn err_code(&self) -> u16 {
        match self {
            ErrorInfo::MailAlreadyInUse => 4000,
            ErrorInfo::MailInvalid => 4001,
            ErrorInfo::LoginAlreadyInUse => 4002,
            ErrorInfo::UserNotFound => 4003,
            ErrorInfo::EventOwnerNotFound => 4101,
            ErrorInfo::EventNotFound => 4102,
            ErrorInfo::AlreadyJoined => 4103,
            ErrorInfo::Conflict => 4999,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorInfo::MailAlreadyInUse => "Mail already in use",
            ErrorInfo::MailInvalid => "Invalid mail",
            ErrorInfo::LoginAlreadyInUse => "Login already in use",
            ErrorInfo::UserNotFound => "User not found",
            ErrorInfo::EventOwnerNotFound => "There is no such owner",
            ErrorInfo::EventNotFound => "Event not found",
            ErrorInfo::AlreadyJoined => "User already joined event",
            ErrorInfo::Conflict => "Conflict",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorInfo::MailAlreadyInUse => "MAIL_ALREADY_IN_USE",
            ErrorInfo::MailInvalid => "MAIL_INVALID",
            ErrorInfo::LoginAlreadyInUse => "LOGIN_ALREADY_IN_USE",
            ErrorInfo::UserNotFound => "USER_NOT_FOUND",
            ErrorInfo::EventOwnerNotFound => "EVENT_OWNER_NOT_FOUND",
            ErrorInfo::EventNotFound => "EVENT_NOT_FOUND",
            ErrorInfo::AlreadyJoined => "ALREADY_JOINED",
            ErrorInfo::Conflict => "CONFLICT",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ErrorInfo::MailInvalid => 400,
            ErrorInfo::UserNotFound | ErrorInfo::EventOwnerNotFound | ErrorInfo::EventNotFound => 404,
            ErrorInfo::MailAlreadyInUse
            | ErrorInfo::LoginAlreadyInUse
            | ErrorInfo::AlreadyJoined
            | ErrorInfo::Conflict => 409,
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized (authentication failures carry their own code)
    Authentication(AuthError),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // Numbered business error, status depends on the info
    Business(ErrorInfo),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Authentication(err) => match err {
                AuthError::TokenIssue(_) | AuthError::Database(_) | AuthError::Password(_) => 500,
                _ => 401,
            },
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Business(info) => info.status_code(),
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::ValidationError { message, .. } => message.clone(),
            ApiError::Authentication(err) => match err {
                AuthError::TokenIssue(_) | AuthError::Database(_) | AuthError::Password(_) => {
                    "An error occurred while processing your request".to_string()
                }
                other => other.to_string(),
            },
            ApiError::Forbidden(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Business(info) => info.description().to_string(),
            ApiError::InternalServerError(msg) => msg.clone(),
            ApiError::ServiceUnavailable(msg) => msg.clone(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Authentication(err) => err.code(),
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Business(info) => info.code(),
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        match self {
            ApiError::ValidationError {
                field_errors: Some(field_errors),
                ..
            } => {
                response["field_errors"] = json!(field_errors);
            }
            ApiError::Business(info) => {
                response["errCode"] = json!(info.err_code());
            }
            _ => {}
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Authentication(AuthError::Unauthorized)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ErrorInfo> for ApiError {
    fn from(info: ErrorInfo) -> Self {
        ApiError::Business(info)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::TokenIssue(msg) => tracing::error!("Token issue error: {}", msg),
            AuthError::Database(db_err) => tracing::error!("Database error during authentication: {}", db_err),
            AuthError::Password(pw_err) => tracing::error!("Password error during authentication: {}", pw_err),
            _ => {}
        }
        ApiError::Authentication(err)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(constraint) => {
                tracing::warn!("Unique constraint violated: {}", constraint);
                ApiError::Business(ErrorInfo::Conflict)
            }
            other @ (DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl) => {
                tracing::error!("Database configuration error: {}", other);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::validation_error(format!("Invalid request body: {}", rejection.body_text()), None)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation_error(format!("Invalid query: {}", rejection.body_text()), None)
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
