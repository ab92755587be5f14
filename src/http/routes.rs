use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/memos/record/start", post(handlers::start_recording))
        .route("/memos/record/stop", post(handlers::stop_recording))
        .route("/memos/record/level", get(handlers::recording_level))
        // Memo list
        .route(
            "/memos",
            get(handlers::list_memos).delete(handlers::clear_memos),
        )
        .route("/memos/:memo_id/waveform", get(handlers::get_waveform))
        // Playback
        .route("/memos/:memo_id/toggle", post(handlers::toggle_playback))
        .route("/memos/:memo_id/playback", get(handlers::get_playback))
        .route("/memos/:memo_id/player", delete(handlers::unload_player))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
