use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{AuthError, Authentication, TokenError, AUTH_HEADER};
use crate::error::ApiError;
use crate::state::AppState;

/// Token authentication middleware.
///
/// Resolves the `X-AUTH-TOKEN` header into an [`Authentication`] extension.
/// A request already authenticated further out (the login step) is left
/// untouched. A missing token, or one the codec rejects, leaves the request
/// anonymous unless `reject_invalid_tokens` is configured.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let already_authenticated = request
        .extensions()
        .get::<Authentication>()
        .is_some_and(Authentication::is_authenticated);
    if already_authenticated {
        return next.run(request).await;
    }

    let authentication = match extract_token(request.headers()) {
        None => Authentication::Anonymous,
        Some(token) => match token.and_then(|t| state.tokens.parse(t)) {
            Ok(principal) => {
                tracing::debug!(username = %principal.username, "Token accepted");
                Authentication::Authenticated(principal)
            }
            Err(err) => {
                tracing::debug!(reason = %err, "Token rejected");
                if state.config.security.reject_invalid_tokens {
                    return ApiError::from(AuthError::from(err)).into_response();
                }
                Authentication::Anonymous
            }
        },
    };

    request.extensions_mut().insert(authentication);
    next.run(request).await
}

/// `None` when no token was sent. Browsers send the literal `null` after logout.
fn extract_token(headers: &HeaderMap) -> Option<Result<&str, TokenError>> {
    let value = headers.get(AUTH_HEADER)?;
    let Ok(value) = value.to_str() else {
        return Some(Err(TokenError::Malformed));
    };

    let value = value.trim();
    if value.is_empty() || value == "null" {
        return None;
    }
    Some(Ok(value))
}
