//! # Input Manager
//!
//! Tracks the keys the viewer reacts to. Held keys drive the orbit camera;
//! key presses (a released-to-pressed transition between frames) trigger
//! one-shot actions.

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

const KEY_CODES: [KeyCode; 7] = [
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
    KeyCode::PageUp,
    KeyCode::PageDown,
    KeyCode::Tab,
];

/// Current and previous frame state of every tracked key.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
}

impl InputManager {
    /// Creates an input manager with every tracked key released.
    pub fn new() -> Self {
        let mut keyboard_inputs_old = HashMap::new();
        let mut keyboard_inputs_new = HashMap::new();
        for key_code in KEY_CODES {
            keyboard_inputs_old.insert(key_code, false);
            keyboard_inputs_new.insert(key_code, false);
        }

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
        }
    }

    /// Copies the current state into the previous state.
    ///
    /// Call once at the end of each frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
            ..
        } = event
        {
            self.set_key(*key, *state == ElementState::Pressed);
        }
    }

    /// Records the state of a key. Untracked keys are ignored.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Whether `key` is currently held.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keyboard_inputs_new.get(&key).copied().unwrap_or(false)
    }

    /// Whether `key` went down since the last [`InputManager::move_old_states`].
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.is_held(key) && !self.keyboard_inputs_old.get(&key).copied().unwrap_or(false)
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn reset_inputs(&mut self) {
        for state in self
            .keyboard_inputs_new
            .values_mut()
            .chain(self.keyboard_inputs_old.values_mut())
        {
            *state = false;
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
