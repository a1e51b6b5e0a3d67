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


//! Headless stand-ins for the GPU and the window, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use glutin::dpi::LogicalSize;

use crate::graphics::device::{Device, LoadError, ObjectId};
use crate::graphics::mesh::VertexAttribute;
use crate::graphics::shader::ShaderStage;
use crate::input::{InputState, VirtualKeyCode};
use crate::resources::color::Color;
use crate::window::{Surface, WindowError, WindowState};

/// One recorded GPU call (status and log queries are not recorded). `SwapBuffers` and
/// `PollEvents` are pushed by `ScriptedSurface` so frame boundaries show up in the stream.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    CreateShader(ShaderStage, ObjectId),
    ShaderSource(ObjectId, String),
    CompileShader(ObjectId),
    DeleteShader(ObjectId),
    CreateProgram(ObjectId),
    AttachShader(ObjectId, ObjectId),
    LinkProgram(ObjectId),
    UseProgram(ObjectId),
    DeleteProgram(ObjectId),
    CreateVertexArray(ObjectId),
    BindVertexArray(ObjectId),
    DeleteVertexArray(ObjectId),
    CreateBuffer(ObjectId),
    BindArrayBuffer(ObjectId),
    ArrayBufferData(Vec<f32>),
    VertexAttribPointer(VertexAttribute),
    EnableVertexAttribArray(u32),
    DeleteBuffer(ObjectId),
    DrawLines(i32, i32),
    SwapBuffers,
    PollEvents,
}

/// `Device` that records every call and hands out increasing object names.
pub(crate) struct RecordingDevice {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<ObjectId>,
    shader_stages: RefCell<HashMap<ObjectId, ShaderStage>>,
    compile_failure: RefCell<Option<(ShaderStage, String)>>,
    link_failure: RefCell<Option<String>>,
}

impl RecordingDevice {
    pub(crate) fn new() -> Self {
        RecordingDevice {
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            shader_stages: RefCell::new(HashMap::new()),
            compile_failure: RefCell::new(None),
            link_failure: RefCell::new(None),
        }
    }

    /// Make every compile of `stage` fail with `log`.
    pub(crate) fn fail_compile(&self, stage: ShaderStage, log: &str) {
        *self.compile_failure.borrow_mut() = Some((stage, log.to_string()));
    }

    /// Make every link fail with `log`.
    pub(crate) fn fail_link(&self, log: &str) {
        *self.link_failure.borrow_mut() = Some(log.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&Call) -> bool,
    {
        self.calls.borrow().iter().filter(|c| pred(*c)).count()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> ObjectId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn failing_stage(&self, shader: ObjectId) -> Option<String> {
        let stage = *self.shader_stages.borrow().get(&shader)?;
        match &*self.compile_failure.borrow() {
            Some((failing, log)) if *failing == stage => Some(log.clone()),
            _ => None,
        }
    }
}

impl Device for RecordingDevice {
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, color: Color) {
        self.record(Call::ClearColor(color.to_array()));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn create_shader(&self, stage: ShaderStage) -> ObjectId {
        let id = self.next();
        self.shader_stages.borrow_mut().insert(id, stage);
        self.record(Call::CreateShader(stage, id));
        id
    }

    fn shader_source(&self, shader: ObjectId, source: &str) {
        self.record(Call::ShaderSource(shader, source.to_string()));
    }

    fn compile_shader(&self, shader: ObjectId) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ObjectId) -> bool {
        self.failing_stage(shader).is_none()
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        self.failing_stage(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: ObjectId) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> ObjectId {
        let id = self.next();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: ObjectId) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: ObjectId) -> bool {
        self.link_failure.borrow().is_none()
    }

    fn program_info_log(&self, _program: ObjectId) -> String {
        self.link_failure.borrow().clone().unwrap_or_default()
    }

    fn use_program(&self, program: ObjectId) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: ObjectId) {
        self.record(Call::DeleteProgram(program));
    }

    fn create_vertex_array(&self) -> ObjectId {
        let id = self.next();
        self.record(Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vertex_array: ObjectId) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: ObjectId) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> ObjectId {
        let id = self.next();
        self.record(Call::CreateBuffer(id));
        id
    }

    fn bind_array_buffer(&self, buffer: ObjectId) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[f32]) {
        self.record(Call::ArrayBufferData(data.to_vec()));
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        self.record(Call::VertexAttribPointer(*attribute));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn delete_buffer(&self, buffer: ObjectId) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn draw_lines(&self, first: i32, count: i32) {
        self.record(Call::DrawLines(first, count));
    }
}

/// Something that happens to a `ScriptedSurface` during one `poll_events`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum SurfaceEvent {
    KeyPress(VirtualKeyCode),
    KeyRelease(VirtualKeyCode),
    Resize(u32, u32),
    CloseRequested,
}

impl SurfaceEvent {
    /// The glutin event a real window would receive, at a hidpi factor of 1.0.
    fn to_window_event(self) -> glutin::WindowEvent {
        let key = |key, state| glutin::WindowEvent::KeyboardInput {
            device_id: unsafe { glutin::DeviceId::dummy() },
            input: glutin::KeyboardInput {
                scancode: 0,
                state,
                virtual_keycode: Some(key),
                modifiers: glutin::ModifiersState::default(),
            },
        };
        match self {
            SurfaceEvent::KeyPress(k) => key(k, glutin::ElementState::Pressed),
            SurfaceEvent::KeyRelease(k) => key(k, glutin::ElementState::Released),
            SurfaceEvent::Resize(width, height) => {
                glutin::WindowEvent::Resized(LogicalSize::new(width as f64, height as f64))
            }
            SurfaceEvent::CloseRequested => glutin::WindowEvent::CloseRequested,
        }
    }
}

/// `Surface` driven by a script: each `poll_events` delivers the next batch of events
/// through the same `WindowState` a real `Window` uses. Once the script runs out the
/// surface asks to close, so a test can't spin forever.
pub(crate) struct ScriptedSurface {
    device: Rc<RecordingDevice>,
    script: VecDeque<Vec<SurfaceEvent>>,
    state: WindowState,
    fail_load: bool,
    fail_swap: bool,
}

impl ScriptedSurface {
    pub(crate) fn new(device: &Rc<RecordingDevice>, width: u32, height: u32) -> Self {
        ScriptedSurface {
            device: Rc::clone(device),
            script: VecDeque::new(),
            state: WindowState::new(LogicalSize::new(width as f64, height as f64), 1.0),
            fail_load: false,
            fail_swap: false,
        }
    }

    /// Append one poll's worth of events.
    pub(crate) fn then(mut self, events: Vec<SurfaceEvent>) -> Self {
        self.script.push_back(events);
        self
    }

    pub(crate) fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub(crate) fn failing_swap(mut self) -> Self {
        self.fail_swap = true;
        self
    }
}

impl Surface for ScriptedSurface {
    fn load_device(&mut self) -> Result<Rc<dyn Device>, LoadError> {
        if self.fail_load {
            return Err(LoadError {
                missing: vec!["glGenVertexArrays"],
            });
        }
        let device: Rc<dyn Device> = self.device.clone();
        Ok(device)
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
        if self.fail_swap {
            return Err(WindowError::SwapBuffers("context lost".to_string()));
        }
        self.device.record(Call::SwapBuffers);
        Ok(())
    }

    fn poll_events(&mut self) {
        self.device.record(Call::PollEvents);
        match self.script.pop_front() {
            Some(events) => {
                for event in events {
                    self.state.handle_window_event(event.to_window_event());
                }
            }
            None => self.state.set_should_close(true),
        }
    }
}
