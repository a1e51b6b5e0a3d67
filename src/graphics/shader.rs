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


use std::fmt;
use std::rc::Rc;

use log::{debug, error};

use crate::graphics::device::{Device, ObjectId};

/// Programmable pipeline stage a shader object is compiled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// `BuildError` is returned when a shader fails to compile or a program fails to link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A stage failed to compile.
    Compile {
        /// The stage that failed.
        stage: ShaderStage,
        /// Driver diagnostic.
        log: String,
    },
    /// The program failed to link.
    Link {
        /// Driver diagnostic.
        log: String,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Compile { stage, log } => {
                write!(f, "failed to compile {} shader: {}", stage, log)
            }
            BuildError::Link { log } => write!(f, "failed to link shader program: {}", log),
        }
    }
}

impl std::error::Error for BuildError {}

/// A compiled shader stage. The GL object is deleted when this is dropped.
pub struct Shader {
    device: Rc<dyn Device>,
    id: ObjectId,
    stage: ShaderStage,
}

impl Shader {
    /// Compile `source` for `stage`.
    pub fn compile(
        device: &Rc<dyn Device>,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Shader, BuildError> {
        // Wrap the id first so the object is released on the error path too.
        let shader = Shader {
            device: Rc::clone(device),
            id: device.create_shader(stage),
            stage,
        };
        device.shader_source(shader.id, source);
        device.compile_shader(shader.id);
        if !device.shader_compile_status(shader.id) {
            let log = device.shader_info_log(shader.id);
            error!("{} shader failed to compile:\n{}", stage, log);
            return Err(BuildError::Compile { stage, log });
        }
        debug!("compiled {} shader {}", stage, shader.id);
        Ok(shader)
    }

    /// GL name of the shader object.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.device.delete_shader(self.id);
    }
}

/// A linked shader program. The GL object is deleted when this is dropped.
pub struct Program {
    device: Rc<dyn Device>,
    id: ObjectId,
}

impl Program {
    /// Link the given compiled stages into a program.
    pub fn link(device: &Rc<dyn Device>, shaders: &[&Shader]) -> Result<Program, BuildError> {
        let program = Program {
            device: Rc::clone(device),
            id: device.create_program(),
        };
        for shader in shaders {
            device.attach_shader(program.id, shader.id());
        }
        device.link_program(program.id);
        if !device.program_link_status(program.id) {
            let log = device.program_info_log(program.id);
            error!("shader program failed to link:\n{}", log);
            return Err(BuildError::Link { log });
        }
        debug!("linked program {}", program.id);
        Ok(program)
    }

    /// Compile a vertex and a fragment stage and link them. The stage objects are deleted
    /// once linking is done; the program keeps the compiled code.
    pub fn from_sources(
        device: &Rc<dyn Device>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Program, BuildError> {
        let vertex = Shader::compile(device, ShaderStage::Vertex, vertex_source)?;
        let fragment = Shader::compile(device, ShaderStage::Fragment, fragment_source)?;
        let program = Program::link(device, &[&vertex, &fragment]);
        drop(vertex);
        drop(fragment);
        program
    }

    /// Make this program current.
    pub fn bind(&self) {
        self.device.use_program(self.id);
    }

    /// GL name of the program object.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.device.delete_program(self.id);
    }
}
