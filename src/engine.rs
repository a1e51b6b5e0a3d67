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


use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

use log::info;

use crate::graphics::device::LoadError;
use crate::graphics::render::{FrameStats, Renderer};
use crate::graphics::shader::BuildError;
use crate::input::CLOSE_KEY;
use crate::resources::color::{self, Color};
use crate::window::{Surface, Window, WindowBuilder, WindowError};


/// Process exit status for any fatal error.
pub const EXIT_FAILURE: i32 = -1;

/// `EngineError` is any error that ends the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Error from the window system.
    Window(WindowError),
    /// The GL entry points could not be loaded.
    Load(LoadError),
    /// The line program failed to build.
    Build(BuildError),
}

impl EngineError {
    /// Exit status the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Window(e) => write!(f, "{}", e),
            EngineError::Load(e) => write!(f, "{}", e),
            EngineError::Build(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Window(e) => Some(e),
            EngineError::Load(e) => Some(e),
            EngineError::Build(e) => Some(e),
        }
    }
}

impl From<WindowError> for EngineError {
    fn from(e: WindowError) -> Self {
        EngineError::Window(e)
    }
}

impl From<LoadError> for EngineError {
    fn from(e: LoadError) -> Self {
        EngineError::Load(e)
    }
}

impl From<BuildError> for EngineError {
    fn from(e: BuildError) -> Self {
        EngineError::Build(e)
    }
}

/// `Engine` drives a surface: it sets up the GPU state for the line and runs the frame loop
/// until the surface is told to close.
pub struct Engine<S: Surface> {
    surface: S,
    clear_color: Color,
}

impl Engine<Window> {
    /// Open a window from `builder` and wrap it in an engine.
    pub fn new(builder: WindowBuilder) -> Result<Self, EngineError> {
        let window = builder.build()?;
        Ok(Engine::with_surface(window))
    }
}

impl<S: Surface> Engine<S> {
    /// Wrap an existing surface. Its context must already be current.
    pub fn with_surface(surface: S) -> Self {
        Engine {
            surface,
            clear_color: color::BACKGROUND,
        }
    }

    /// Set the color each frame is cleared to.
    pub fn with_clear_color(mut self, clear_color: Color) -> Self {
        self.clear_color = clear_color;

        self
    }

    /// Load the GPU, build the line and render until the surface should close. Consumes the
    /// engine; the window is torn down when this returns, on success or failure.
    pub fn run(self) -> Result<FrameStats, EngineError> {
        let Engine {
            mut surface,
            clear_color,
        } = self;

        let device = surface.load_device()?;

        let (width, height) = surface.framebuffer_size();
        device.viewport(0, 0, viewport_extent(width), viewport_extent(height));
        let resize_device = Rc::clone(&device);
        surface.set_framebuffer_size_callback(Box::new(move |width, height| {
            resize_device.viewport(0, 0, viewport_extent(width), viewport_extent(height));
        }));

        // Declared after `surface`, so dropped first on every return path.
        let mut renderer = Renderer::new(device, clear_color)?;

        info!("starting up");
        while !surface.should_close() {
            if surface.input().is_pressed(CLOSE_KEY) {
                surface.set_should_close(true);
            }

            renderer.render_frame();

            surface.swap_buffers()?;
            surface.poll_events();
        }

        let stats = renderer.stats();
        drop(renderer);
        info!("clean shutdown after {} frames", stats.frames);

        Ok(stats)
    }
}

// GL takes viewport extents as signed ints; sizes past `i32::MAX` saturate.
fn viewport_extent(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}
