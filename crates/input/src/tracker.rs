use drivescene_common::CameraMode;

use crate::action::{Binding, Control};
use crate::bindings::KeyBindings;

/// Snapshot of control state read once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pressed: [bool; 4],
    camera_mode: CameraMode,
}

impl InputState {
    pub fn is_pressed(&self, control: Control) -> bool {
        self.pressed[control.index()]
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    /// Builder used by scripted drives and tests.
    pub fn with_pressed(mut self, control: Control, pressed: bool) -> Self {
        self.pressed[control.index()] = pressed;
        self
    }

    pub fn with_camera_mode(mut self, mode: CameraMode) -> Self {
        self.camera_mode = mode;
        self
    }
}

/// Live input state written by key event handlers.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    state: InputState,
    bindings: KeyBindings,
}

impl InputTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            state: InputState::default(),
            bindings,
        }
    }

    pub fn set_pressed(&mut self, control: Control, pressed: bool) {
        self.state.pressed[control.index()] = pressed;
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.state.is_pressed(control)
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        self.state.camera_mode = mode;
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.state.camera_mode
    }

    /// Release every held control. The camera mode is left alone.
    pub fn release_all(&mut self) {
        self.state.pressed = [false; 4];
    }

    /// Copy of the current state for one frame's update.
    pub fn snapshot(&self) -> InputState {
        self.state
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Handle a key-down event. Returns whether the key was bound.
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.bindings.resolve(key) {
            Some(Binding::Control(control)) => {
                self.set_pressed(control, true);
                true
            }
            Some(Binding::Camera(mode)) => {
                self.set_camera_mode(mode);
                true
            }
            None => {
                tracing::trace!(key, "ignoring unbound key-down");
                false
            }
        }
    }

    /// Handle a key-up event. Camera keys have no release action.
    pub fn key_up(&mut self, key: &str) -> bool {
        match self.bindings.resolve(key) {
            Some(Binding::Control(control)) => {
                self.set_pressed(control, false);
                true
            }
            Some(Binding::Camera(_)) => true,
            None => {
                tracing::trace!(key, "ignoring unbound key-up");
                false
            }
        }
    }
}
