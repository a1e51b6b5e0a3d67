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


//! `redline` is the smallest useful OpenGL program: it opens a window, brings up a core
//! profile context, builds a two-stage shader program and draws one red line every frame
//! until the window is closed or escape is pressed.
//!
//! # Example
//!
//! ```no_run
//! use redline::engine::Engine;
//! use redline::window::WindowBuilder;
//!
//! pub fn main() {
//!     let engine = Engine::new(WindowBuilder::default()).unwrap();
//!     // `run()` consumes the `Engine`, and tears the window down when it returns.
//!     let stats = engine.run().unwrap();
//!     println!("rendered {} frames", stats.frames);
//! }
//! ```

#![deny(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate hamcrest;

/// Bootstrap sequence and frame loop.
pub mod engine;

/// API for interacting with the low-level rendering system.
pub mod graphics;

/// Keyboard state.
pub mod input;

/// Static data: colors and shader sources.
pub mod resources;

/// Routines for creating and managing the window and its GL context.
pub mod window;

#[cfg(test)]
pub(crate) mod testing;
