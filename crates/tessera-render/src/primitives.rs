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

//! Ready-made geometry sources.

use crate::error::RenderableError;
use crate::geometry::GeometrySource;
use crate::mesh::MeshEntry;
use crate::vertex::{Index, SimpleVertex};
use tessera_core::math::{Vec2, Vec3};

/// An axis-aligned textured cube centred on the origin.
///
/// Each face has its own four vertices so normals and UVs stay flat. On every
/// face `u` runs along the face tangent and `v` along the bitangent, and the
/// two triangles wind counter-clockwise seen from outside.
#[derive(Debug, Clone)]
pub struct Cube {
    vertices: Vec<SimpleVertex>,
    indices: Vec<Index>,
}

impl Cube {
    /// Faces as (normal, tangent, bitangent), with `tangent x bitangent = normal`.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::Y),
    ];

    /// Builds a cube whose faces lie `half_extent` away from the origin.
    pub fn new(half_extent: f32) -> Self {
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, tangent, bitangent) in Self::FACES {
            let base = vertices.len() as Index;
            for uv in corners {
                let position = normal * half_extent
                    + tangent * (half_extent * (2.0 * uv.x - 1.0))
                    + bitangent * (half_extent * (2.0 * uv.y - 1.0));
                vertices.push(SimpleVertex::new(position, uv, normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// A single mesh entry covering the whole cube.
    pub fn mesh_entry(&self) -> MeshEntry {
        MeshEntry::new(0, 0, self.vertices.len() as u32, self.indices.len() as u32)
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl GeometrySource for Cube {
    fn vertices(&self) -> &[SimpleVertex] {
        &self.vertices
    }

    fn indices(&self) -> &[Index] {
        &self.indices
    }
}

/// Geometry of an imported model: several meshes packed into shared arrays.
///
/// Every mesh pushed gets its own vertex and index range. Its indices are
/// rebased so the stored index array addresses the shared vertex array
/// directly.
#[derive(Debug, Clone, Default)]
pub struct ModelGeometry {
    vertices: Vec<SimpleVertex>,
    indices: Vec<Index>,
    meshes: Vec<MeshEntry>,
}

impl ModelGeometry {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mesh and returns its position in [`meshes`](Self::meshes).
    ///
    /// `indices` are local to `vertices`. Nothing is appended if a rebased
    /// index would not fit the 16-bit index type.
    pub fn push_mesh(
        &mut self,
        vertices: &[SimpleVertex],
        indices: &[Index],
    ) -> Result<usize, RenderableError> {
        let vertex_offset = self.vertices.len();
        let vertex_count = vertex_offset + vertices.len();
        if vertex_count > usize::from(Index::MAX) + 1 {
            return Err(RenderableError::IndexOverflow { vertex_count });
        }

        let rebased = indices
            .iter()
            .map(|&local| Index::try_from(vertex_offset + usize::from(local)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RenderableError::IndexOverflow { vertex_count })?;

        let entry = MeshEntry::new(
            vertex_offset as u32,
            self.indices.len() as u32,
            vertices.len() as u32,
            indices.len() as u32,
        );
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(rebased);
        self.meshes.push(entry);

        log::trace!(
            "ModelGeometry: mesh {} appended ({} vertices, {} indices)",
            self.meshes.len() - 1,
            vertices.len(),
            indices.len()
        );
        Ok(self.meshes.len() - 1)
    }

    /// The per-mesh ranges, all unbound.
    pub fn meshes(&self) -> &[MeshEntry] {
        &self.meshes
    }
}

impl GeometrySource for ModelGeometry {
    fn vertices(&self) -> &[SimpleVertex] {
        &self.vertices
    }

    fn indices(&self) -> &[Index] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn quad(z: f32) -> (Vec<SimpleVertex>, Vec<Index>) {
        let vertices = vec![
            SimpleVertex::new(Vec3::new(0.0, 0.0, z), Vec2::new(0.0, 0.0), Vec3::Z),
            SimpleVertex::new(Vec3::new(1.0, 0.0, z), Vec2::new(1.0, 0.0), Vec3::Z),
            SimpleVertex::new(Vec3::new(1.0, 1.0, z), Vec2::new(1.0, 1.0), Vec3::Z),
            SimpleVertex::new(Vec3::new(0.0, 1.0, z), Vec2::new(0.0, 1.0), Vec3::Z),
        ];
        (vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_cube_counts() {
        let cube = Cube::default();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.mesh_entry().index_range(), 0..36);
    }

    #[test]
    fn test_cube_vertices_lie_on_their_face() {
        let cube = Cube::new(2.0);
        for vertex in cube.vertices() {
            assert_abs_diff_eq!(vertex.position.dot(vertex.normal), 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(vertex.normal.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cube_triangles_face_outwards() {
        let cube = Cube::new(1.0);
        let v = cube.vertices();
        for tri in cube.indices().chunks_exact(3) {
            let (a, b, c) = (v[tri[0] as usize], v[tri[1] as usize], v[tri[2] as usize]);
            let face_normal = (b.position - a.position).cross(c.position - a.position);
            assert!(face_normal.dot(a.normal) > 0.0);
        }
    }

    #[test]
    fn test_push_mesh_rebases_indices() {
        let mut model = ModelGeometry::new();
        let (v0, i0) = quad(0.0);
        let (v1, i1) = quad(1.0);
        assert_eq!(model.push_mesh(&v0, &i0).unwrap(), 0);
        assert_eq!(model.push_mesh(&v1, &i1).unwrap(), 1);

        assert_eq!(model.vertex_count(), 8);
        assert_eq!(&model.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(model.meshes()[1], MeshEntry::new(4, 6, 4, 6));
        assert!(model.meshes().iter().all(|m| !m.is_bound()));
    }

    #[test]
    fn test_push_mesh_rejects_index_overflow() {
        let mut model = ModelGeometry::new();
        let big = vec![SimpleVertex::default(); usize::from(Index::MAX)];
        model.push_mesh(&big, &[0, 1, 2]).unwrap();

        let (v, i) = quad(0.0);
        let err = model.push_mesh(&v, &i).unwrap_err();
        assert!(matches!(
            err,
            RenderableError::IndexOverflow {
                vertex_count: 65539
            }
        ));
        assert_eq!(model.meshes().len(), 1);
        assert_eq!(model.index_count(), 3);
    }
}
