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


use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_void;

use gl::types::{GLboolean, GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use log::info;

use crate::graphics::mesh::VertexAttribute;
use crate::graphics::shader::ShaderStage;
use crate::resources::color::Color;

/// Name of a GL object (shader, program, buffer, vertex array). `0` is the "none" object.
pub type ObjectId = GLuint;

/// The GPU entry points the renderer uses. All methods assume the owning context is current
/// on the calling thread.
pub trait Device {
    /// Set the viewport rectangle.
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// Set the color `clear` fills the color buffer with.
    fn clear_color(&self, color: Color);
    /// Clear the color buffer.
    fn clear(&self);

    /// Create an empty shader object for the given stage.
    fn create_shader(&self, stage: ShaderStage) -> ObjectId;
    /// Replace the source of a shader object.
    fn shader_source(&self, shader: ObjectId, source: &str);
    /// Compile a shader object.
    fn compile_shader(&self, shader: ObjectId);
    /// Whether the last compile of `shader` succeeded.
    fn shader_compile_status(&self, shader: ObjectId) -> bool;
    /// Driver log from the last compile of `shader`.
    fn shader_info_log(&self, shader: ObjectId) -> String;
    /// Delete a shader object.
    fn delete_shader(&self, shader: ObjectId);

    /// Create an empty program object.
    fn create_program(&self) -> ObjectId;
    /// Attach a compiled shader to a program.
    fn attach_shader(&self, program: ObjectId, shader: ObjectId);
    /// Link a program.
    fn link_program(&self, program: ObjectId);
    /// Whether the last link of `program` succeeded.
    fn program_link_status(&self, program: ObjectId) -> bool;
    /// Driver log from the last link of `program`.
    fn program_info_log(&self, program: ObjectId) -> String;
    /// Make `program` current; `0` unbinds.
    fn use_program(&self, program: ObjectId);
    /// Delete a program object.
    fn delete_program(&self, program: ObjectId);

    /// Create a vertex array object.
    fn create_vertex_array(&self) -> ObjectId;
    /// Bind a vertex array; `0` unbinds.
    fn bind_vertex_array(&self, vertex_array: ObjectId);
    /// Delete a vertex array object.
    fn delete_vertex_array(&self, vertex_array: ObjectId);

    /// Create a buffer object.
    fn create_buffer(&self) -> ObjectId;
    /// Bind a buffer to the array buffer target; `0` unbinds.
    fn bind_array_buffer(&self, buffer: ObjectId);
    /// Upload `data` into the bound array buffer with static usage.
    fn array_buffer_data(&self, data: &[f32]);
    /// Describe a float vertex attribute sourced from the bound array buffer.
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute);
    /// Enable a vertex attribute slot on the bound vertex array.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Delete a buffer object.
    fn delete_buffer(&self, buffer: ObjectId);

    /// Draw `count` vertices starting at `first` from the bound vertex array as separate
    /// line segments.
    fn draw_lines(&self, first: i32, count: i32);
}

/// Entry points that must resolve for the renderer to work.
const REQUIRED_ENTRY_POINTS: &[(&str, fn() -> bool)] = &[
    ("glViewport", gl::Viewport::is_loaded),
    ("glClearColor", gl::ClearColor::is_loaded),
    ("glClear", gl::Clear::is_loaded),
    ("glGetString", gl::GetString::is_loaded),
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glShaderSource", gl::ShaderSource::is_loaded),
    ("glCompileShader", gl::CompileShader::is_loaded),
    ("glGetShaderiv", gl::GetShaderiv::is_loaded),
    ("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded),
    ("glDeleteShader", gl::DeleteShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glAttachShader", gl::AttachShader::is_loaded),
    ("glLinkProgram", gl::LinkProgram::is_loaded),
    ("glGetProgramiv", gl::GetProgramiv::is_loaded),
    ("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded),
    ("glUseProgram", gl::UseProgram::is_loaded),
    ("glDeleteProgram", gl::DeleteProgram::is_loaded),
    ("glGenVertexArrays", gl::GenVertexArrays::is_loaded),
    ("glBindVertexArray", gl::BindVertexArray::is_loaded),
    ("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded),
    ("glGenBuffers", gl::GenBuffers::is_loaded),
    ("glBindBuffer", gl::BindBuffer::is_loaded),
    ("glBufferData", gl::BufferData::is_loaded),
    ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded),
    ("glEnableVertexAttribArray", gl::EnableVertexAttribArray::is_loaded),
    ("glDeleteBuffers", gl::DeleteBuffers::is_loaded),
    ("glDrawArrays", gl::DrawArrays::is_loaded),
];

/// `LoadError` is returned when the GL entry points could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Entry points the loader could not resolve.
    pub missing: Vec<&'static str>,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to load OpenGL entry points: {}",
            self.missing.join(", ")
        )
    }
}

impl std::error::Error for LoadError {}

/// `Device` backed by the global `gl` bindings.
#[derive(Debug)]
pub struct GlDevice {
    // Keeps the type out of reach of struct literals; `load` is the only constructor.
    _private: (),
}

impl GlDevice {
    /// Resolve the GL entry points through `loader` and check that everything the renderer
    /// calls is available.
    ///
    /// # Safety
    ///
    /// The context `loader` resolves symbols for must be current on the calling thread, and
    /// must stay current for as long as the returned device is used.
    pub unsafe fn load<F>(loader: F) -> Result<GlDevice, LoadError>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let missing: Vec<&'static str> = REQUIRED_ENTRY_POINTS
            .iter()
            .filter(|(_, is_loaded)| !is_loaded())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError { missing });
        }

        info!(
            "OpenGL {} ({})",
            gl_string(gl::VERSION),
            gl_string(gl::RENDERER)
        );

        Ok(GlDevice { _private: () })
    }
}

unsafe fn gl_string(name: GLenum) -> String {
    let s = gl::GetString(name);
    if s.is_null() {
        String::from("unknown")
    } else {
        CStr::from_ptr(s as *const GLchar).to_string_lossy().into_owned()
    }
}

// Reads an info log given the length query and the log getter for one object kind.
unsafe fn info_log(
    object: GLuint,
    get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut len: GLint = 0;
    get_iv(object, gl::INFO_LOG_LENGTH, &mut len);
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u8; len as usize];
    let mut written: GLsizei = 0;
    get_log(object, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
    buf.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

impl Device for GlDevice {
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, color: Color) {
        unsafe { gl::ClearColor(color.r, color.g, color.b, color.a) }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn create_shader(&self, stage: ShaderStage) -> ObjectId {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: ObjectId, source: &str) {
        // Pass the length explicitly so the source doesn't need a NUL terminator.
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: ObjectId) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: ObjectId) -> bool {
        let mut status: GLint = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        unsafe { info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog) }
    }

    fn delete_shader(&self, shader: ObjectId) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> ObjectId {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: ObjectId, shader: ObjectId) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: ObjectId) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: ObjectId) -> bool {
        let mut status: GLint = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        unsafe { info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog) }
    }

    fn use_program(&self, program: ObjectId) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: ObjectId) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn create_vertex_array(&self) -> ObjectId {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, vertex_array: ObjectId) {
        unsafe { gl::BindVertexArray(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: ObjectId) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array) }
    }

    fn create_buffer(&self) -> ObjectId {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_array_buffer(&self, buffer: ObjectId) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[f32]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.len() * std::mem::size_of::<f32>()) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            )
        }
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        let normalized: GLboolean = if attribute.normalized {
            gl::TRUE
        } else {
            gl::FALSE
        };
        unsafe {
            gl::VertexAttribPointer(
                attribute.index,
                attribute.components,
                gl::FLOAT,
                normalized,
                attribute.stride,
                attribute.offset as *const c_void,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn delete_buffer(&self, buffer: ObjectId) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn draw_lines(&self, first: i32, count: i32) {
        unsafe { gl::DrawArrays(gl::LINES, first, count) }
    }
}
