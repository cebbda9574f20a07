pub mod config;
pub mod input;
pub mod render;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use config::AppConfig;
pub use input::{InputHandler, KeyAction, TerminationSignal};
pub use render::frame_loop::{FrameLoop, FramePlatform, LoopState};
pub use render::scene::prepare_scene;
pub use utils::error::{GeometryError, SceneError, StartupError};
pub use window::GlWindow;
