use axum::extract::{Path, State};

use crate::api::{ApiJson, AccountUpdate, UserView};
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/users/:id - by id or user name
pub async fn user_get(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<UserView> {
    let user = state.users.lookup(&id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/users - update the caller's email and/or password
pub async fn user_update(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(update): ApiJson<AccountUpdate>,
) -> ApiResult<UserView> {
    let user = state.users.update(&principal, update).await?;
    Ok(ApiResponse::success(user))
}
