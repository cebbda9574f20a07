use glam::Vec3;

/// Per-frame values derived from wall-clock time. Recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the program started.
    pub elapsed: f32,
    /// Offset applied to every vertex: `(sin(t) / 2, cos(t) / 2, 0)`.
    pub shift: Vec3,
}

impl FrameState {
    pub fn at(elapsed: f32) -> Self {
        Self {
            elapsed,
            shift: Vec3::new(elapsed.sin() / 2.0, elapsed.cos() / 2.0, 0.0),
        }
    }
}
