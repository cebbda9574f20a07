pub mod core;
pub mod logging;
pub mod shaders;
pub mod window;

pub use self::core::{AppConfig, DEFAULT_CONFIG_FILE};
pub use logging::{LoggingConfig, DEFAULT_LOG_FILE};
pub use shaders::ShaderConfig;
pub use window::WindowConfig;
