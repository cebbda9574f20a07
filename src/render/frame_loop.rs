use std::rc::Rc;

use gl::types::GLint;

use super::frame::FrameState;
use super::gpu::GpuApi;
use super::mesh::GeometryBuffer;
use super::program::Program;
use crate::input::InputHandler;

pub const SHIFT_UNIFORM: &str = "shift";

/// What the frame loop needs from the window system.
pub trait FramePlatform {
    /// Drains every pending window event without blocking, handing key
    /// events to `input` as they come.
    fn poll_events(&mut self, input: &mut InputHandler);

    /// Wall-clock seconds since the platform was started.
    fn elapsed(&self) -> f32;

    /// Shows the finished frame. May block until the display takes it.
    fn present(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Owns the one live program and the quad geometry for the whole run.
pub struct FrameLoop<G: GpuApi> {
    gpu: Rc<G>,
    program: Program<G>,
    geometry: GeometryBuffer<G>,
    input: InputHandler,
    state: LoopState,
    frames: u64,
}

impl<G: GpuApi> FrameLoop<G> {
    pub fn new(gpu: Rc<G>, program: Program<G>, geometry: GeometryBuffer<G>) -> Self {
        program.set_used();
        geometry.bind();
        if program.uniform_location(SHIFT_UNIFORM).is_none() {
            log::warn!("Program {} has no active '{}' uniform", program.id(), SHIFT_UNIFORM);
        }

        Self {
            gpu,
            program,
            geometry,
            input: InputHandler::new(),
            state: LoopState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn program(&self) -> &Program<G> {
        &self.program
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    /// Runs until the termination signal is seen. Returns the number of
    /// frames presented.
    pub fn run<P: FramePlatform>(&mut self, platform: &mut P) -> u64 {
        log::info!("Entering frame loop");
        while self.run_iteration(platform) == LoopState::Running {}
        log::info!("Frame loop stopped after {} frames", self.frames);
        self.frames
    }

    /// One full iteration. Termination is checked once, before anything
    /// else; an iteration that has started always presents.
    pub fn run_iteration<P: FramePlatform>(&mut self, platform: &mut P) -> LoopState {
        if self.state == LoopState::Stopped || self.input.termination_requested() {
            self.state = LoopState::Stopped;
            return self.state;
        }

        platform.poll_events(&mut self.input);
        self.render(platform.elapsed());
        platform.present();
        self.frames += 1;

        self.state
    }

    /// Clears, writes the shift uniform for `elapsed` and draws the quad.
    pub fn render(&mut self, elapsed: f32) -> FrameState {
        self.gpu.clear_color(0.0, 0.0, 0.0, 1.0);
        self.gpu.clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);

        let frame = FrameState::at(elapsed);
        self.program
            .set_uniform_3f(SHIFT_UNIFORM, frame.shift.x, frame.shift.y, frame.shift.z);

        self.gpu.draw_elements_u32(self.geometry.index_count() as GLint);

        let error = self.gpu.get_error();
        if error != gl::NO_ERROR {
            log::warn!("GL error 0x{:04X} after frame {}", error, self.frames);
        }

        frame
    }
}
