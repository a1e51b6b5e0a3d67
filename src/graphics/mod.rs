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


//! GPU-facing code. Everything here talks to the GPU through the `Device` trait, so it can be
//! exercised without a window.

/// GPU entry points and the `gl`-backed implementation.
pub mod device;

/// Vertex buffers, vertex arrays and the line mesh.
pub mod mesh;

/// Per-frame rendering.
pub mod render;

/// Shader compilation and program linking.
pub mod shader;

pub use self::device::{Device, GlDevice, LoadError};
pub use self::render::{FrameStats, Renderer};
pub use self::shader::{BuildError, ShaderStage};
