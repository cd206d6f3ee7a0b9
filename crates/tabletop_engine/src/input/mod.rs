//! Input handling
//!
//! Maps raw pointer, scroll, and key state onto the camera and the view
//! context. The window layer feeds events in; nothing here touches a window
//! directly, so the controller runs the same under tests.

use bitflags::bitflags;

use crate::render::camera::CameraMovement;
use crate::render::view::{ProjectionMode, ViewContext};

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Move forward
    W,
    /// Strafe left
    A,
    /// Move backward
    S,
    /// Strafe right
    D,
    /// Rise
    Q,
    /// Sink
    E,
    /// Perspective projection
    P,
    /// Orthographic projection
    O,
    /// Quit
    Escape,
}

impl KeyCode {
    const fn flag(self) -> KeySet {
        match self {
            Self::W => KeySet::W,
            Self::A => KeySet::A,
            Self::S => KeySet::S,
            Self::D => KeySet::D,
            Self::Q => KeySet::Q,
            Self::E => KeySet::E,
            Self::P => KeySet::P,
            Self::O => KeySet::O,
            Self::Escape => KeySet::ESCAPE,
        }
    }
}

bitflags! {
    /// Set of held keys
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeySet: u16 {
        /// W held
        const W = 1 << 0;
        /// A held
        const A = 1 << 1;
        /// S held
        const S = 1 << 2;
        /// D held
        const D = 1 << 3;
        /// Q held
        const Q = 1 << 4;
        /// E held
        const E = 1 << 5;
        /// P held
        const P = 1 << 6;
        /// O held
        const O = 1 << 7;
        /// Escape held
        const ESCAPE = 1 << 8;
    }
}

/// Per-frame key state query
pub trait KeyInput {
    /// True while `key` is held
    fn is_pressed(&self, key: KeyCode) -> bool;
}

/// Key state tracked from press/release events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: KeySet,
}

impl KeyState {
    /// Create with nothing held
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the given keys held
    #[must_use]
    pub fn with_pressed(keys: &[KeyCode]) -> Self {
        let mut state = Self::new();
        for &key in keys {
            state.press(key);
        }
        state
    }

    /// Mark `key` held
    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key.flag());
    }

    /// Mark `key` released
    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(key.flag());
    }

    /// Currently held keys
    #[must_use]
    pub const fn held(&self) -> KeySet {
        self.held
    }
}

impl KeyInput for KeyState {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(key.flag())
    }
}

const MOVEMENT_BINDINGS: [(KeyCode, CameraMovement); 6] = [
    (KeyCode::W, CameraMovement::Forward),
    (KeyCode::S, CameraMovement::Backward),
    (KeyCode::A, CameraMovement::Left),
    (KeyCode::D, CameraMovement::Right),
    (KeyCode::Q, CameraMovement::Up),
    (KeyCode::E, CameraMovement::Down),
];

/// Translates input events into camera and view-context changes
#[derive(Debug, Clone)]
pub struct CameraController {
    last_pointer: Option<(f64, f64)>,
}

impl CameraController {
    /// Create a controller that has not yet seen the pointer
    #[must_use]
    pub const fn new() -> Self {
        Self { last_pointer: None }
    }

    /// Handle an absolute pointer position
    ///
    /// The first event only latches the reference position. Later events
    /// rotate by the delta, with screen-up motion raising the pitch.
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_pointer_moved(&mut self, context: &mut ViewContext, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            log::trace!("Pointer reference latched at ({:.1}, {:.1})", x, y);
            return;
        };
        let x_offset = (x - last_x) as f32;
        let y_offset = (last_y - y) as f32;
        context.camera.process_mouse_movement(x_offset, y_offset);
    }

    /// Handle a vertical scroll offset
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_scroll(&mut self, context: &mut ViewContext, y_offset: f64) {
        context.camera.process_mouse_scroll(y_offset as f32);
    }

    /// Apply held keys for one frame
    ///
    /// Movement keys translate by `delta_time * movement_speed`. P and O are
    /// checked in that order, so O wins when both are held.
    pub fn poll_keys<I: KeyInput + ?Sized>(&self, context: &mut ViewContext, input: &I, delta_time: f32) {
        if input.is_pressed(KeyCode::Escape) {
            context.request_close();
        }

        for (key, movement) in MOVEMENT_BINDINGS {
            if input.is_pressed(key) {
                context.camera.process_keyboard(movement, delta_time);
            }
        }

        if input.is_pressed(KeyCode::P) {
            context.set_projection_mode(ProjectionMode::Perspective);
        }
        if input.is_pressed(KeyCode::O) {
            context.set_projection_mode(ProjectionMode::Orthographic);
        }
    }

    /// True once the pointer reference has been latched
    #[must_use]
    pub const fn has_pointer_reference(&self) -> bool {
        self.last_pointer.is_some()
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
