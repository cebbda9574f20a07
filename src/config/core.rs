use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::shaders::ShaderConfig;
use super::window::WindowConfig;

pub const DEFAULT_CONFIG_FILE: &str = "y_shader.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
