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

use std::any::Any;
use std::fmt;
use std::panic;
use std::rc::Rc;

use glutin::dpi::{LogicalSize, PhysicalSize};
use log::{debug, info};

use crate::graphics::device::{Device, GlDevice, LoadError};
use crate::input::InputState;

const GL_MAJOR_VERSION: u8 = 3;
const GL_MINOR_VERSION: u8 = 3;

const DEFAULT_TITLE: &str = "OpenGL Window";
const DEFAULT_WIDTH: u32 = 1000;
const DEFAULT_HEIGHT: u32 = 800;

/// `WindowError` represents an error that occurred in the window system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The windowing layer could not be initialized (no usable display backend).
    PlatformInit(String),
    /// The window or its GL context could not be created.
    Creation(String),
    /// The GL context could not be made current on this thread.
    ContextActivation(String),
    /// Presenting the frame failed, usually because the context was lost.
    SwapBuffers(String),
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::PlatformInit(e) => write!(f, "failed to initialize windowing: {}", e),
            WindowError::Creation(e) => write!(f, "failed to create window: {}", e),
            WindowError::ContextActivation(e) => {
                write!(f, "failed to make GL context current: {}", e)
            }
            WindowError::SwapBuffers(e) => write!(f, "failed to swap buffers: {}", e),
        }
    }
}

impl std::error::Error for WindowError {}

/// Everything the frame loop needs from a window: the GL context behind it, its
/// framebuffer, its input and its close flag.
pub trait Surface {
    /// Resolve GPU entry points against this surface's context.
    fn load_device(&mut self) -> Result<Rc<dyn Device>, LoadError>;

    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Register a callback invoked with the new size whenever the framebuffer is resized.
    /// Replaces any previously registered callback.
    fn set_framebuffer_size_callback(&mut self, callback: Box<dyn FnMut(u32, u32)>);

    /// Keyboard state as of the last `poll_events`.
    fn input(&self) -> &InputState;

    /// Whether the window has been told to close.
    fn should_close(&self) -> bool;

    /// Set or clear the close flag.
    fn set_should_close(&mut self, should_close: bool);

    /// Present the back buffer.
    fn swap_buffers(&mut self) -> Result<(), WindowError>;

    /// Process pending window and input events without blocking.
    fn poll_events(&mut self);
}

/// Helper for constructing windows.
#[derive(Clone, Debug)]
pub struct WindowBuilder {
    title: String,
    width: u32,
    height: u32,
    resizable: bool,
    vsync: bool,
    gl_version: (u8, u8),
}

impl Default for WindowBuilder {
    fn default() -> Self {
        WindowBuilder::new(DEFAULT_TITLE, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl WindowBuilder {
    /// Create a new `WindowBuilder` with the given title and size in pixels.
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        WindowBuilder {
            title: title.to_string(),
            width,
            height,
            resizable: true,
            vsync: true,
            gl_version: (GL_MAJOR_VERSION, GL_MINOR_VERSION),
        }
    }

    /// Allow or forbid resizing by the user.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;

        self
    }

    /// Enable/disable vsync.
    pub fn with_vsync(mut self, enable: bool) -> Self {
        self.vsync = enable;

        self
    }


    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Requested OpenGL version.
    pub fn gl_version(&self) -> (u8, u8) {
        self.gl_version
    }

    pub(crate) fn window_builder(&self) -> glutin::WindowBuilder {
        let size = LogicalSize::from_physical(
            PhysicalSize::new(self.width as f64, self.height as f64),
            1.0,
        );
        glutin::WindowBuilder::new()
            .with_title(self.title.clone())
            .with_dimensions(size)
            .with_resizable(self.resizable)
    }

    pub(crate) fn context_builder(&self) -> glutin::ContextBuilder<'static, glutin::NotCurrent> {
        glutin::ContextBuilder::new()
            .with_gl(glutin::GlRequest::Specific(
                glutin::Api::OpenGl,
                self.gl_version,
            ))
            .with_gl_profile(glutin::GlProfile::Core)
            .with_vsync(self.vsync)
            .with_double_buffer(Some(true))
    }

    /// Build the window and make its context current on the calling thread.
    pub fn build(self) -> Result<Window, WindowError> {
        info!("Window dimensions {}x{}", self.width, self.height);

        let events_loop = init_events_loop()?;

        // On failure the events loop is dropped here, which tears the windowing layer down.
        let context = self
            .context_builder()
            .build_windowed(self.window_builder(), &events_loop)
            .map_err(|e| WindowError::Creation(e.to_string()))?;

        let context = unsafe { context.make_current() }
            .map_err(|(_, e)| WindowError::ContextActivation(e.to_string()))?;

        let hidpi_factor = context.window().get_hidpi_factor();
        let logical = context.window().get_inner_size().unwrap_or_else(|| {
            LogicalSize::from_physical(
                PhysicalSize::new(self.width as f64, self.height as f64),
                hidpi_factor,
            )
        });
        info!(
            "physical size: {:?} (hidpi factor {})",
            logical.to_physical(hidpi_factor),
            hidpi_factor
        );

        Ok(Window {
            context,
            events_loop,
            state: WindowState::new(logical, hidpi_factor),
        })
    }
}

fn init_events_loop() -> Result<glutin::EventsLoop, WindowError> {
    // winit panics instead of returning an error when no display backend is usable.
    catch_silently(glutin::EventsLoop::new).map_err(WindowError::PlatformInit)
}

// Runs `f`, turning a panic into its message folded onto one line. The panic hook is
// swapped out for the call so nothing reaches stderr.
fn catch_silently<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(hook);
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| String::from("unknown error"));
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_pixels(size: PhysicalSize) -> (u32, u32) {
    (size.width.round() as u32, size.height.round() as u32)
}

/// What the frame loop reads from a window, kept up to date from its events. Owns no OS
/// resources.
pub(crate) struct WindowState {
    input: InputState,
    should_close: bool,
    hidpi_factor: f64,
    logical_size: LogicalSize,
    framebuffer_size: (u32, u32),
    framebuffer_size_callback: Option<Box<dyn FnMut(u32, u32)>>,
}

impl WindowState {
    pub(crate) fn new(logical_size: LogicalSize, hidpi_factor: f64) -> Self {
        WindowState {
            input: InputState::new(),
            should_close: false,
            hidpi_factor,
            logical_size,
            framebuffer_size: to_pixels(logical_size.to_physical(hidpi_factor)),
            framebuffer_size_callback: None,
        }
    }

    /// Fold one window event into the state. Returns the new drawable size when the event
    /// resized the window, whether or not the pixel size actually changed.
    pub(crate) fn handle_window_event(
        &mut self,
        event: glutin::WindowEvent,
    ) -> Option<PhysicalSize> {
        match event {
            glutin::WindowEvent::CloseRequested | glutin::WindowEvent::Destroyed => {
                self.should_close = true;
                None
            }
            glutin::WindowEvent::KeyboardInput { input, .. } => {
                self.input.handle_keyboard_input(input);
                None
            }
            glutin::WindowEvent::Focused(false) => {
                // Key releases that happen while unfocused are never delivered.
                self.input.release_all();
                None
            }
            glutin::WindowEvent::Resized(logical) => {
                self.logical_size = logical;
                Some(self.resize_framebuffer())
            }
            glutin::WindowEvent::HiDpiFactorChanged(factor) => {
                self.hidpi_factor = factor;
                Some(self.resize_framebuffer())
            }
            _ => None,
        }
    }

    fn resize_framebuffer(&mut self) -> PhysicalSize {
        let physical = self.logical_size.to_physical(self.hidpi_factor);
        let size = to_pixels(physical);
        if size != self.framebuffer_size {
            debug!("framebuffer resized to {}x{}", size.0, size.1);
            self.framebuffer_size = size;
            if let Some(callback) = self.framebuffer_size_callback.as_mut() {
                callback(size.0, size.1);
            }
        }
        physical
    }

    pub(crate) fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer_size
    }

    pub(crate) fn set_framebuffer_size_callback(&mut self, callback: Box<dyn FnMut(u32, u32)>) {
        self.framebuffer_size_callback = Some(callback);
    }

    pub(crate) fn input(&self) -> &InputState {
        &self.input
    }

    pub(crate) fn should_close(&self) -> bool {
        self.should_close
    }

    pub(crate) fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }
}

/// `Window` owns the OS window, its current GL context and the events loop feeding it.
pub struct Window {
    // Field order is drop order: the context must go before the events loop.
    context: glutin::WindowedContext<glutin::PossiblyCurrent>,
    events_loop: glutin::EventsLoop,

    state: WindowState,
}

impl Surface for Window {
    fn load_device(&mut self) -> Result<Rc<dyn Device>, LoadError> {
        let context = &self.context;
        // `build` made the context current on this thread and nothing else takes it away.
        let device =
            unsafe { GlDevice::load(|symbol| context.get_proc_address(symbol) as *const _)? };
        Ok(Rc::new(device))
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.state.framebuffer_size()
    }

    fn set_framebuffer_size_callback(&mut self, callback: Box<dyn FnMut(u32, u32)>) {
        self.state.set_framebuffer_size_callback(callback);
    }

    fn input(&self) -> &InputState {
        self.state.input()
    }

    fn should_close(&self) -> bool {
        self.state.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.state.set_should_close(should_close);
    }

    fn swap_buffers(&mut self) -> Result<(), WindowError> {
        self.context
            .swap_buffers()
            .map_err(|e| WindowError::SwapBuffers(e.to_string()))
    }

    fn poll_events(&mut self) {
        let mut events = Vec::new();
        self.events_loop.poll_events(|event| events.push(event));
        for event in events {
            if let glutin::Event::WindowEvent { event, .. } = event {
                if let Some(physical) = self.state.handle_window_event(event) {
                    self.context.resize(physical);
                }
            }
        }
    }
}
