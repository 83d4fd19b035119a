use axum::extract::State;

use crate::api::{ApiJson, NewAccount, UserView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/users - self-registration
///
/// Returns 201 with the new account. The password is hashed before storage
/// and never echoed back.
pub async fn user_create(
    State(state): State<AppState>,
    ApiJson(account): ApiJson<NewAccount>,
) -> ApiResult<UserView> {
    let user = state.users.register(account).await?;
    Ok(ApiResponse::created(user))
}
