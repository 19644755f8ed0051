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

//! Entries of a renderable's mesh table.

use std::ops::Range;

/// A sub-range of the shared index buffer drawn with one material.
///
/// Offsets and counts come from the geometry source. The material index is
/// assigned later through
/// [`Renderable::set_material_of_mesh`](crate::Renderable::set_material_of_mesh);
/// `None` means the mesh is unbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshEntry {
    /// First vertex of this mesh in the shared vertex array.
    pub vertex_offset: u32,
    /// First index of this mesh in the shared index array.
    pub index_offset: u32,
    /// Number of vertices owned by this mesh.
    pub vertex_count: u32,
    /// Number of indices drawn for this mesh.
    pub index_count: u32,
    /// Position of the bound material in the material table.
    pub material_index: Option<u32>,
}

impl MeshEntry {
    /// Creates an unbound mesh entry.
    pub fn new(vertex_offset: u32, index_offset: u32, vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertex_offset,
            index_offset,
            vertex_count,
            index_count,
            material_index: None,
        }
    }

    /// The indices this mesh draws, as a range into the index buffer.
    ///
    /// The end saturates at `u32::MAX`.
    pub fn index_range(&self) -> Range<u32> {
        self.index_offset..self.index_offset.saturating_add(self.index_count)
    }

    /// The vertices this mesh owns, as a range into the vertex buffer.
    ///
    /// The end saturates at `u32::MAX`.
    pub fn vertex_range(&self) -> Range<u32> {
        self.vertex_offset..self.vertex_offset.saturating_add(self.vertex_count)
    }

    /// Returns `true` if a material has been assigned.
    pub fn is_bound(&self) -> bool {
        self.material_index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_unbound() {
        let entry = MeshEntry::new(4, 6, 4, 6);
        assert!(!entry.is_bound());
        assert_eq!(entry.index_range(), 6..12);
        assert_eq!(entry.vertex_range(), 4..8);
    }

    #[test]
    fn test_ranges_saturate_near_u32_max() {
        let entry = MeshEntry::new(u32::MAX - 2, u32::MAX - 1, 10, 10);
        assert_eq!(entry.vertex_range(), u32::MAX - 2..u32::MAX);
        assert_eq!(entry.index_range(), u32::MAX - 1..u32::MAX);
    }
}
