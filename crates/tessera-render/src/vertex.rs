// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Vertex records uploaded to the GPU.

use std::borrow::Cow;
use tessera_core::math::{Vec2, Vec3};
use tessera_core::renderer::{
    IndexFormat, VertexAttributeDescriptor, VertexBufferLayoutDescriptor, VertexFormat,
    VertexStepMode,
};

/// The element type of every index buffer built by this crate.
pub type Index = u16;

/// The [`IndexFormat`] matching [`Index`].
pub const INDEX_FORMAT: IndexFormat = IndexFormat::Uint16;

/// A vertex as supplied by a geometry source.
///
/// Bound as the first vertex stream (locations 0 to 2).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimpleVertex {
    /// Object-space position.
    pub position: Vec3,
    /// Texture coordinate.
    pub tex_coord: Vec2,
    /// Object-space normal. Zero when the source has no normals.
    pub normal: Vec3,
}

const SIMPLE_VERTEX_ATTRIBUTES: [VertexAttributeDescriptor; 3] = [
    VertexAttributeDescriptor {
        shader_location: 0,
        format: VertexFormat::Float32x3,
        offset: 0,
    },
    VertexAttributeDescriptor {
        shader_location: 1,
        format: VertexFormat::Float32x2,
        offset: 12,
    },
    VertexAttributeDescriptor {
        shader_location: 2,
        format: VertexFormat::Float32x3,
        offset: 20,
    },
];

impl SimpleVertex {
    /// Creates a vertex with a position, texture coordinate, and normal.
    pub const fn new(position: Vec3, tex_coord: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    /// Byte size of one record in the vertex buffer.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Describes this record as vertex stream 0.
    pub fn layout() -> VertexBufferLayoutDescriptor<'static> {
        VertexBufferLayoutDescriptor {
            array_stride: Self::SIZE,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Borrowed(&SIMPLE_VERTEX_ATTRIBUTES),
        }
    }
}

/// Per-vertex tangent frame used by normal mapping.
///
/// Indexed identically to the vertex array and bound as the second vertex
/// stream (locations 3 and 4).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NormalData {
    /// Unit tangent (texture-space U direction).
    pub tangent: Vec3,
    /// Unit bitangent (texture-space V direction).
    pub bitangent: Vec3,
}

const NORMAL_DATA_ATTRIBUTES: [VertexAttributeDescriptor; 2] = [
    VertexAttributeDescriptor {
        shader_location: 3,
        format: VertexFormat::Float32x3,
        offset: 0,
    },
    VertexAttributeDescriptor {
        shader_location: 4,
        format: VertexFormat::Float32x3,
        offset: 12,
    },
];

impl NormalData {
    /// Creates a tangent frame.
    pub const fn new(tangent: Vec3, bitangent: Vec3) -> Self {
        Self { tangent, bitangent }
    }

    /// Byte size of one record in the normal buffer.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Returns `true` if neither vector carries `inf` or `NaN`.
    pub fn is_finite(&self) -> bool {
        self.tangent.is_finite() && self.bitangent.is_finite()
    }

    /// Describes this record as vertex stream 1.
    pub fn layout() -> VertexBufferLayoutDescriptor<'static> {
        VertexBufferLayoutDescriptor {
            array_stride: Self::SIZE,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Borrowed(&NORMAL_DATA_ATTRIBUTES),
        }
    }
}
