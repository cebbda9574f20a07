use std::path::PathBuf;

use thiserror::Error;

use crate::render::shaders::ShaderKind;

/// Failures that abort scene setup before the frame loop starts.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("{kind} shader source unavailable at {}: {reason}", .path.display())]
    ShaderSourceUnavailable {
        kind: ShaderKind,
        path: PathBuf,
        reason: String,
    },

    #[error("Geometry rejected: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Vertex and index sets must not be empty")]
    Empty,
}

/// Failures of the windowing collaborator, detected before any rendering.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create window: {0}")]
    WindowCreationFailed(String),

    #[error("Required GL capability missing: {0}")]
    RequiredCapabilityMissing(&'static str),
}
