use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::UserView;
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/login - reached only after the login middleware verified the
/// credentials; the token itself is attached to the response on the way out.
pub async fn login(principal: Principal) -> StatusCode {
    tracing::debug!(username = %principal.username, "Session opened");
    StatusCode::OK
}

/// POST /api/logout
///
/// Tokens are stateless, so nothing is revoked server side; the client is
/// expected to discard its token.
pub async fn logout(State(state): State<AppState>, principal: Principal) -> Response {
    tracing::info!(username = %principal.username, "Logged out");

    match &state.config.security.logout_redirect {
        Some(target) => Redirect::to(target).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /me - the caller's own account
pub async fn me(State(state): State<AppState>, principal: Principal) -> ApiResult<UserView> {
    let user = state.users.current(&principal).await?;
    Ok(ApiResponse::success(user))
}
