use super::state::AppState;
use crate::session::{ActiveView, SaveOutcome, SessionSnapshot};
use crate::transcription::{CompletedTranscript, RecordingSignal};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusSignalRequest {
    /// Free-text status line
    pub text: Option<String>,
    /// Typed signal; takes precedence over `text`
    pub signal: Option<RecordingSignal>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptUpdateRequest {
    pub text: String,
    pub recording: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub view: ActiveView,
}

#[derive(Debug, Deserialize)]
pub struct KeywordRequest {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn save_response(outcome: SaveOutcome) -> axum::response::Response {
    let status = match &outcome {
        SaveOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
        SaveOutcome::MissingUser => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(outcome)).into_response()
}

async fn snapshot(state: &AppState) -> Json<SessionSnapshot> {
    Json(state.controller.snapshot().await)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    snapshot(&state).await
}

/// POST /session/signal
pub async fn post_signal(
    State(state): State<AppState>,
    Json(req): Json<StatusSignalRequest>,
) -> impl IntoResponse {
    match (req.signal, req.text) {
        (Some(signal), _) => state.controller.on_recording_signal(signal).await,
        (None, Some(text)) => state.controller.on_status_signal(&text).await,
        (None, None) => {
            return error(StatusCode::BAD_REQUEST, "Either signal or text is required");
        }
    }
    snapshot(&state).await.into_response()
}

/// POST /session/transcript
pub async fn post_transcript(
    State(state): State<AppState>,
    Json(req): Json<TranscriptUpdateRequest>,
) -> impl IntoResponse {
    state
        .controller
        .on_transcript_update(&req.text, req.recording)
        .await;
    snapshot(&state).await
}

/// POST /session/transcript/complete
pub async fn post_transcript_complete(
    State(state): State<AppState>,
    Json(done): Json<CompletedTranscript>,
) -> impl IntoResponse {
    save_response(state.controller.on_transcript_complete(done).await)
}

/// PUT /session/note
pub async fn put_note(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> impl IntoResponse {
    state.controller.set_note_text(&req.text).await;
    StatusCode::NO_CONTENT
}

/// PUT /session/title
pub async fn put_title(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> impl IntoResponse {
    state.controller.begin_title_edit().await;
    state.controller.set_title(&req.text).await;
    StatusCode::NO_CONTENT
}

/// POST /session/title/commit
pub async fn commit_title(State(state): State<AppState>) -> impl IntoResponse {
    save_response(state.controller.commit_title().await)
}

/// POST /session/title/cancel
pub async fn cancel_title(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.cancel_title_edit().await;
    snapshot(&state).await
}

/// POST /session/view
pub async fn post_view(
    State(state): State<AppState>,
    Json(req): Json<ViewRequest>,
) -> impl IntoResponse {
    if !state.controller.select_view(req.view).await {
        return error(StatusCode::CONFLICT, "Summary view is not available");
    }
    snapshot(&state).await.into_response()
}

/// POST /session/summary/regenerate
pub async fn regenerate_summary(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.regenerate_summary().await;
    snapshot(&state).await
}

/// POST /session/save
pub async fn save(State(state): State<AppState>) -> impl IntoResponse {
    info!("Save requested");
    save_response(state.controller.save().await)
}

/// POST /session/leave
pub async fn leave(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.leave().await;
    StatusCode::NO_CONTENT
}

/// POST /session/record/start
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.request_start().await;
    StatusCode::ACCEPTED
}

/// POST /session/record/stop
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.request_stop().await;
    StatusCode::ACCEPTED
}

/// POST /session/keywords/open
pub async fn open_keyword(
    State(state): State<AppState>,
    Json(req): Json<KeywordRequest>,
) -> impl IntoResponse {
    match state.controller.open_keyword(&req.keyword).await {
        Some(url) => (StatusCode::OK, Json(LinkResponse { url })).into_response(),
        None => error(StatusCode::BAD_REQUEST, "Keyword is empty"),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
