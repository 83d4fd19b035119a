use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{AuthError, Authentication, AUTH_HEADER};
use crate::error::ApiError;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/api/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parses `username:password`. The password may itself contain colons.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        let (username, password) = raw
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MalformedCredentials);
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Login middleware.
///
/// Intercepts `POST /api/login`, reads `username:password` from the
/// `Authorization` header or, failing that, the raw body, and on success
/// marks the request authenticated and returns a fresh token in the
/// `X-AUTH-TOKEN` response header. Every other request passes through.
pub async fn login(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::POST || request.uri().path() != LOGIN_PATH {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let credentials =
        match read_credentials(&parts.headers, body, state.config.api.max_request_size_bytes).await {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::debug!("Login rejected: {}", err);
                return ApiError::from(err).into_response();
            }
        };

    let principal = match state
        .verifier
        .verify(&credentials.username, &credentials.password)
        .await
    {
        Ok(principal) => principal,
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                tracing::warn!("Failed login attempt");
            }
            return ApiError::from(err).into_response();
        }
    };

    let token = match state.tokens.issue(&principal) {
        Ok(token) => token,
        Err(err) => return ApiError::from(AuthError::from(err)).into_response(),
    };
    let token_value = match HeaderValue::from_str(&token) {
        Ok(value) => value,
        Err(_) => {
            return ApiError::internal_server_error("Failed to encode session token").into_response()
        }
    };

    tracing::info!(username = %principal.username, "Login succeeded");

    let mut request = Request::from_parts(parts, Body::empty());
    request
        .extensions_mut()
        .insert(Authentication::Authenticated(principal));

    let mut response = next.run(request).await;
    if response.status().is_success() {
        let headers = response.headers_mut();
        headers.insert(AUTH_HEADER, token_value);
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("X-AUTH-TOKEN"),
        );
    }
    response
}

async fn read_credentials(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<Credentials, AuthError> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::MalformedCredentials))
        .transpose()?
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "null");

    if let Some(raw) = from_header {
        return Credentials::parse(raw);
    }

    let bytes = to_bytes(body, limit)
        .await
        .map_err(|_| AuthError::MalformedCredentials)?;
    let raw = std::str::from_utf8(&bytes).map_err(|_| AuthError::MalformedCredentials)?;
    Credentials::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_username_and_password() {
        let credentials = Credentials::parse("alice:secret123").unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret123");
    }

    #[test]
    fn password_may_contain_colons() {
        let credentials = Credentials::parse("alice:a:b:c").unwrap();
        assert_eq!(credentials.password, "a:b:c");
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let credentials = Credentials::parse("alice:secret123\r\n").unwrap();
        assert_eq!(credentials.password, "secret123");
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "alice", ":secret", "alice:", ":"] {
            assert!(
                matches!(Credentials::parse(raw), Err(AuthError::MalformedCredentials)),
                "accepted {:?}",
                raw
            );
        }
    }

    #[tokio::test]
    async fn header_takes_precedence_over_body() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("alice:fromheader"));

        let credentials = read_credentials(&headers, Body::from("bob:frombody"), 1024)
            .await
            .unwrap();
        assert_eq!(credentials.username, "alice");
    }

    #[tokio::test]
    async fn null_header_falls_back_to_body() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("null"));

        let credentials = read_credentials(&headers, Body::from("bob:frombody"), 1024)
            .await
            .unwrap();
        assert_eq!(credentials.username, "bob");
    }

    #[tokio::test]
    async fn oversized_body_is_malformed() {
        let body = Body::from(format!("alice:{}", "x".repeat(64)));
        assert!(matches!(
            read_credentials(&HeaderMap::new(), body, 16).await,
            Err(AuthError::MalformedCredentials)
        ));
    }
}
