pub mod error;

pub use error::{GeometryError, SceneError, StartupError};
