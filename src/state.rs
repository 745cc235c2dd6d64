//! Shared application state for request handlers.

use std::sync::Arc;

use crate::camera::Camera;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Configuration is consumed at startup (listen address, frame source), so
/// handlers only need the camera.
#[derive(Clone, Debug)]
pub struct AppState {
    pub camera: Arc<Camera>,
}

impl AppState {
    /// Creates a new application state around the given camera.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera: Arc::new(camera),
        }
    }
}
