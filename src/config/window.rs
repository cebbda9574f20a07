use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Requested OpenGL core-profile version as `[major, minor]`.
    pub gl_version: [u8; 2],
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Y_Shader".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            gl_version: [3, 3],
            vsync: true,
        }
    }
}
