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

use crate::graphics::device::{Device, ObjectId};

/// Layout of one float vertex attribute inside an array buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute slot (the `location` in the shader).
    pub index: u32,
    /// Floats per vertex.
    pub components: i32,
    /// Whether fixed-point values are normalized on fetch.
    pub normalized: bool,
    /// Bytes between consecutive vertices.
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: usize,
}

/// A buffer object. Deleted on drop.
pub struct Buffer {
    device: Rc<dyn Device>,
    id: ObjectId,
}

impl Buffer {
    /// Create an empty buffer object.
    pub fn new(device: &Rc<dyn Device>) -> Self {
        Buffer {
            device: Rc::clone(device),
            id: device.create_buffer(),
        }
    }

    /// GL name of the buffer.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.device.delete_buffer(self.id);
    }
}

/// A vertex array object. Deleted on drop.
pub struct VertexArray {
    device: Rc<dyn Device>,
    id: ObjectId,
}

impl VertexArray {
    /// Create a vertex array object.
    pub fn new(device: &Rc<dyn Device>) -> Self {
        VertexArray {
            device: Rc::clone(device),
            id: device.create_vertex_array(),
        }
    }

    /// GL name of the vertex array.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.device.delete_vertex_array(self.id);
    }
}

/// The line segment: a static two-vertex buffer and the vertex array describing it.
pub struct LineMesh {
    // Field order is drop order: the vertex array goes before the buffer it references.
    vertex_array: VertexArray,
    buffer: Buffer,
}

impl LineMesh {
    /// Endpoints in normalized device coordinates, `[x0, y0, x1, y1]`.
    pub const VERTICES: [f32; 4] = [-0.5, 0.0, 0.5, 0.0];

    /// Vertices drawn per frame.
    pub const VERTEX_COUNT: i32 = 2;

    /// Two tightly packed floats per vertex in slot 0.
    pub const POSITION: VertexAttribute = VertexAttribute {
        index: 0,
        components: 2,
        normalized: false,
        stride: 2 * std::mem::size_of::<f32>() as i32,
        offset: 0,
    };

    /// Upload the vertices and record their layout. Leaves nothing bound.
    pub fn new(device: &Rc<dyn Device>) -> Self {
        let vertex_array = VertexArray::new(device);
        let buffer = Buffer::new(device);

        device.bind_vertex_array(vertex_array.id());
        device.bind_array_buffer(buffer.id());
        device.array_buffer_data(&Self::VERTICES);
        device.vertex_attrib_pointer(&Self::POSITION);
        device.enable_vertex_attrib_array(Self::POSITION.index);

        device.bind_array_buffer(0);
        device.bind_vertex_array(0);

        LineMesh {
            vertex_array,
            buffer,
        }
    }

    /// Draw the segment with whatever program is current.
    pub fn draw(&self) {
        let device = &self.vertex_array.device;
        device.bind_vertex_array(self.vertex_array.id());
        device.draw_lines(0, Self::VERTEX_COUNT);
        device.bind_vertex_array(0);
    }

    /// The vertex array object.
    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    /// The vertex buffer object.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}
