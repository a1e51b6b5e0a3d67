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


/// RGBA color with `f32` components in `[0, 1]`, the way the GPU consumes it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

/// Dark teal-gray the frame is cleared to.
pub const BACKGROUND: Color = Color::new(0.2, 0.3, 0.3, 1.0);

impl Color {
    /// New `Color` from R, G, B and A components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// New fully opaque `Color` from R, G, and B components.
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0)
    }

    /// Components in `[r, g, b, a]` order.
    ///
    /// ```
    /// # use redline::resources::color::{Color, BACKGROUND};
    /// assert_eq!(Color::opaque(1.0, 0.0, 0.0).to_array(), [1.0, 0.0, 0.0, 1.0]);
    /// assert_eq!(BACKGROUND.to_array(), [0.2, 0.3, 0.3, 1.0]);
    /// ```
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
