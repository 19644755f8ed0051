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

//! Vertex stream layout descriptions consumed by pipeline creation.

use std::borrow::Cow;

/// The data format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// One 32-bit float.
    Float32,
    /// Two 32-bit floats.
    Float32x2,
    /// Three 32-bit floats.
    Float32x3,
    /// Four 32-bit floats.
    Float32x4,
}

impl VertexFormat {
    /// Size of the attribute in bytes.
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }
}

/// How often the vertex buffer is advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexStepMode {
    /// The GPU advances to the next element for each vertex.
    #[default]
    Vertex,
    /// The GPU advances to the next element only for each new instance being rendered.
    Instance,
}

/// Describes a single attribute within a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescriptor {
    /// The input location of this attribute in the vertex shader.
    pub shader_location: u32,
    /// The format of the attribute's data.
    pub format: VertexFormat,
    /// The byte offset of this attribute from the start of the vertex.
    pub offset: u64,
}

/// Describes the memory layout of a single vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferLayoutDescriptor<'a> {
    /// The byte distance between consecutive elements in the buffer.
    pub array_stride: u64,
    /// How often the vertex buffer is advanced.
    pub step_mode: VertexStepMode,
    /// A list of attributes contained within each element of the buffer.
    pub attributes: Cow<'a, [VertexAttributeDescriptor]>,
}

impl VertexBufferLayoutDescriptor<'_> {
    /// Returns `true` if every attribute fits inside the stride and none overlap.
    pub fn is_well_formed(&self) -> bool {
        let mut spans: Vec<(u64, u64)> = self
            .attributes
            .iter()
            .map(|a| (a.offset, a.offset + a.format.size()))
            .collect();
        spans.sort_unstable();
        spans.iter().all(|&(_, end)| end <= self.array_stride)
            && spans.windows(2).all(|w| w[0].1 <= w[1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(location: u32, format: VertexFormat, offset: u64) -> VertexAttributeDescriptor {
        VertexAttributeDescriptor {
            shader_location: location,
            format,
            offset,
        }
    }

    #[test]
    fn test_well_formed_layout() {
        let layout = VertexBufferLayoutDescriptor {
            array_stride: 20,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![
                attr(0, VertexFormat::Float32x3, 0),
                attr(1, VertexFormat::Float32x2, 12),
            ]),
        };
        assert!(layout.is_well_formed());
    }

    #[test]
    fn test_overlapping_or_overflowing_layout_is_rejected() {
        let overlapping = VertexBufferLayoutDescriptor {
            array_stride: 24,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![
                attr(0, VertexFormat::Float32x3, 0),
                attr(1, VertexFormat::Float32x3, 8),
            ]),
        };
        assert!(!overlapping.is_well_formed());

        let overflowing = VertexBufferLayoutDescriptor {
            array_stride: 8,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![attr(0, VertexFormat::Float32x3, 0)]),
        };
        assert!(!overflowing.is_well_formed());
    }
}
