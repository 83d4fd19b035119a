use axum::extract::{Path, State};

use crate::api::{ApiJson, NewsDraft, NewsView};
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /event/:id/news
pub async fn news_create(
    State(state): State<AppState>,
    _principal: Principal,
    Path(event_id): Path<String>,
    ApiJson(draft): ApiJson<NewsDraft>,
) -> ApiResult<NewsView> {
    let news = state.events.add_news(&event_id, draft).await?;
    Ok(ApiResponse::created(news))
}

/// GET /event/:id/news - newest first
pub async fn news_list(
    State(state): State<AppState>,
    _principal: Principal,
    Path(event_id): Path<String>,
) -> ApiResult<Vec<NewsView>> {
    let news = state.events.list_news(&event_id).await?;
    Ok(ApiResponse::success(news))
}
