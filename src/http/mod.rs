//! HTTP control surface for a notebook session
//!
//! This module exposes the session controller to the view layer:
//! - POST /session/signal, /session/transcript, /session/transcript/complete -
//!   transcription callbacks
//! - PUT /session/note, /session/title - editing
//! - POST /session/view, /session/summary/regenerate - summary pane
//! - POST /session/save, /session/leave - persistence and navigation
//! - GET /session - current state
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
