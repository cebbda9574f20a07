use winit::event::ElementState;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

impl KeyAction {
    pub fn from_winit(state: ElementState, repeat: bool) -> Self {
        match (state, repeat) {
            (ElementState::Pressed, false) => KeyAction::Press,
            (ElementState::Pressed, true) => KeyAction::Repeat,
            (ElementState::Released, _) => KeyAction::Release,
        }
    }
}

/// Loop-termination flag. Starts lowered and, once raised, stays raised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TerminationSignal(bool);

impl TerminationSignal {
    pub fn raise(&mut self) {
        self.0 = true;
    }

    pub fn is_raised(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct InputHandler {
    termination: TerminationSignal,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape pressed raises the termination signal. Every other key or
    /// action is ignored.
    pub fn on_key_event(&mut self, key: KeyCode, action: KeyAction) {
        if key == KeyCode::Escape && action == KeyAction::Press && !self.termination.is_raised() {
            log::info!("Escape pressed, termination requested");
            self.termination.raise();
        }
    }

    /// The window's close button asks for the same shutdown as Escape.
    pub fn on_close_requested(&mut self) {
        if !self.termination.is_raised() {
            log::info!("Window close requested");
            self.termination.raise();
        }
    }

    pub fn termination(&self) -> TerminationSignal {
        self.termination
    }

    pub fn termination_requested(&self) -> bool {
        self.termination.is_raised()
    }
}
