use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session state
        .route("/session", get(handlers::get_session))
        // Transcription subsystem callbacks
        .route("/session/signal", post(handlers::post_signal))
        .route("/session/transcript", post(handlers::post_transcript))
        .route(
            "/session/transcript/complete",
            post(handlers::post_transcript_complete),
        )
        // Recording control
        .route("/session/record/start", post(handlers::start_recording))
        .route("/session/record/stop", post(handlers::stop_recording))
        // Editing
        .route("/session/note", put(handlers::put_note))
        .route("/session/title", put(handlers::put_title))
        .route("/session/title/commit", post(handlers::commit_title))
        .route("/session/title/cancel", post(handlers::cancel_title))
        // Views and summary
        .route("/session/view", post(handlers::post_view))
        .route(
            "/session/summary/regenerate",
            post(handlers::regenerate_summary),
        )
        .route("/session/keywords/open", post(handlers::open_keyword))
        // Save and navigation
        .route("/session/save", post(handlers::save))
        .route("/session/leave", post(handlers::leave))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
