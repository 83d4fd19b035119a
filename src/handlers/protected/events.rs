use axum::extract::{Path, State};

use crate::api::{ApiJson, ApiQuery, EventDraft, EventSearch, EventView};
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/events - list, optionally filtered by date window, owner, name or place
pub async fn event_list(
    State(state): State<AppState>,
    _principal: Principal,
    ApiQuery(search): ApiQuery<EventSearch>,
) -> ApiResult<Vec<EventView>> {
    let events = state.events.search(search).await?;
    Ok(ApiResponse::success(events))
}

/// POST /api/events - create an event owned by the caller
pub async fn event_create(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(draft): ApiJson<EventDraft>,
) -> ApiResult<EventView> {
    let event = state.events.create(&principal, draft).await?;
    Ok(ApiResponse::created(event))
}

/// GET /api/events/:id
pub async fn event_get(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<EventView> {
    let event = state.events.get(&id).await?;
    Ok(ApiResponse::success(event))
}

/// DELETE /api/events/:id - owner only
pub async fn event_delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.events.delete(&principal, &id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /api/events/:id/me - join as a participant
pub async fn event_join(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<EventView> {
    let event = state.events.join(&principal, &id).await?;
    Ok(ApiResponse::success(event))
}
