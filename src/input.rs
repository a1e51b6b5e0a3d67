// Copyright 2018 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::collections::HashSet;

pub use glutin::VirtualKeyCode;

/// Key that closes the window.
pub const CLOSE_KEY: VirtualKeyCode = VirtualKeyCode::Escape;

/// Which keys are currently held down, as reported by the window's keyboard events.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pressed: HashSet<VirtualKeyCode>,
}

impl InputState {
    /// Create an `InputState` with no keys held.
    pub fn new() -> Self {
        InputState::default()
    }

    /// Fold one raw keyboard event into the state. Events without a virtual key code are
    /// ignored.
    pub fn handle_keyboard_input(&mut self, event: glutin::KeyboardInput) {
        if let Some(key) = event.virtual_keycode {
            match event.state {
                glutin::ElementState::Pressed => self.press(key),
                glutin::ElementState::Released => self.release(key),
            }
        }
    }

    /// Mark `key` as held.
    pub fn press(&mut self, key: VirtualKeyCode) {
        self.pressed.insert(key);
    }

    /// Mark `key` as released.
    pub fn release(&mut self, key: VirtualKeyCode) {
        self.pressed.remove(&key);
    }

    /// Release every key.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    /// Returns `true` iff `key` is currently held.
    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.pressed.contains(&key)
    }
}
