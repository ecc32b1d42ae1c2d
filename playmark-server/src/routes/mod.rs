use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use playmark_config::CorsConfig;
use playmark_core::api::routes::{contents, health, users};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::auth_middleware,
    handlers::{
        health::{health_handler, ping_handler},
        history::{continue_watching_handler, viewing_history_handler},
        playback::{
            final_position_handler, history_handler, playback_handler,
            stream_handler,
        },
    },
    infra::app_state::AppState,
};

/// Authenticated `/api` routes.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(contents::STREAM, get(stream_handler))
        .route(contents::PLAYBACK, post(playback_handler))
        .route(contents::FINAL_POSITION, post(final_position_handler))
        .route(contents::HISTORY, post(history_handler))
        .route(users::CONTINUE_WATCHING, get(continue_watching_handler))
        .route(users::VIEWING_HISTORY, get(viewing_history_handler))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Liveness endpoints plus the API, without transport layers.
pub fn create_app_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(health::PING, get(ping_handler))
        .route(health::HEALTH, get(health_handler))
        .merge(create_api_router(state))
}

/// Full application: routes, CORS and request tracing, with state applied.
pub fn build_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.cors, state.config.dev_mode);

    create_app_router(state.clone())
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive in dev mode, allow-list otherwise.
pub fn build_cors_layer(cors: &CorsConfig, dev_mode: bool) -> CorsLayer {
    if dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s.trim()).ok())
        .collect();
    // Credentials cannot be combined with a wildcard origin.
    let allow_credentials = cors.allow_credentials && !origins.is_empty();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}
