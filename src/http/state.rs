use crate::session::SessionController;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The notebook session this surface controls
    pub controller: SessionController,
}

impl AppState {
    pub fn new(controller: SessionController) -> Self {
        Self { controller }
    }
}
