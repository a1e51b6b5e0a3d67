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


use std::rc::Rc;

use log::info;

use crate::graphics::device::Device;
use crate::graphics::mesh::LineMesh;
use crate::graphics::shader::{BuildError, Program};
use crate::resources::color::Color;
use crate::resources::shaders;


/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 1000;

/// Frame counters reported when the loop ends.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Number of frames rendered.
    pub frames: u64,
    /// Rolling-average frames per second.
    pub fps: f32,
}

/// `Renderer` owns the GPU objects for the line and issues the per-frame commands.
pub struct Renderer {
    // Field order is drop order: vertex array and buffer first, then the program.
    mesh: LineMesh,
    program: Program,
    device: Rc<dyn Device>,

    clear_color: Color,

    frame_counter: u64,
    fps: f32,
    last_render_time_ns: u64,
}

impl Renderer {
    /// Build the line program and upload the line's vertices.
    pub fn new(device: Rc<dyn Device>, clear_color: Color) -> Result<Self, BuildError> {
        let program =
            Program::from_sources(&device, shaders::VERTEX_SHADER, shaders::FRAGMENT_SHADER)?;
        let mesh = LineMesh::new(&device);
        info!("clear color: {:?}", clear_color);

        Ok(Renderer {
            mesh,
            program,
            device,
            clear_color,
            frame_counter: 0,
            fps: 0.0,
            last_render_time_ns: 0,
        })
    }

    /// Render one frame: clear, then draw the line.
    pub fn render_frame(&mut self) {
        self.device.clear_color(self.clear_color);
        self.device.clear();

        self.program.bind();
        self.mesh.draw();

        self.frame_counter += 1;

        let t = time::precise_time_ns();
        if self.last_render_time_ns > 0 && t > self.last_render_time_ns {
            let dt = (t - self.last_render_time_ns) as f32;
            let new_fps = 1_000_000_000.0 / dt;
            self.fps = 0.9 * self.fps + 0.1 * new_fps;
            if self.frame_counter % FPS_LOG_INTERVAL == 0 {
                info!("{:.0} FPS", self.fps);
            }
        }
        self.last_render_time_ns = t;
    }

    /// Get the number of frames that have been rendered.
    pub fn get_frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Snapshot of the frame counters.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frame_counter,
            fps: self.fps,
        }
    }

    /// The linked line program.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The line's vertex array and buffer.
    pub fn mesh(&self) -> &LineMesh {
        &self.mesh
    }
}
