use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AUTH_HEADER;
use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{authenticate, authorize, login, LOGIN_PATH};
use crate::state::AppState;

/// Builds the full router.
///
/// Requests pass, outermost first: tracing, CORS, login, token
/// authentication, the authorization gate, then the handler.
pub fn app(state: AppState) -> Router {
    let security_chain = ServiceBuilder::new()
        .layer(from_fn_with_state(state.clone(), login))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(state.clone(), authorize));

    let router = Router::new()
        .merge(public_routes())
        .merge(session_routes())
        .merge(user_routes())
        .merge(event_routes())
        .merge(news_routes())
        .layer(security_chain)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    let router = match cors_layer(&state.config.security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
}

fn session_routes() -> Router<AppState> {
    use protected::session;

    Router::new()
        .route(LOGIN_PATH, post(session::login))
        .route("/api/logout", post(session::logout))
        .route("/me", get(session::me))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route(
            "/api/users",
            post(public::user_create).put(users::user_update),
        )
        .route("/api/users/:id", get(users::user_get))
}

fn event_routes() -> Router<AppState> {
    use protected::events;

    Router::new()
        .route(
            "/api/events",
            get(events::event_list).post(events::event_create),
        )
        .route(
            "/api/events/:id",
            get(events::event_get).delete(events::event_delete),
        )
        .route("/api/events/:id/me", post(events::event_join))
}

fn news_routes() -> Router<AppState> {
    use protected::news;

    Router::new().route(
        "/event/:id/news",
        get(news::news_list).post(news::news_create),
    )
}

/// `None` when CORS is disabled. A `*` origin allows any origin without
/// credentials; an explicit list allows credentials.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let auth_header = HeaderName::from_static(AUTH_HEADER);
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            auth_header.clone(),
        ])
        .expose_headers([auth_header]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(AllowOrigin::any()));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
    )
}
