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

//! Draw-list extraction for the render loop.

use crate::geometry::GeometrySource;
use crate::material::Material;
use crate::renderable::Renderable;
use std::ops::Range;
use tessera_core::asset::AssetHandle;

/// One indexed draw of a renderable's mesh.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Position of the mesh in the mesh table.
    pub mesh_index: usize,
    /// Indices to draw from the index buffer.
    pub index_range: Range<u32>,
    /// Vertices the indices reference, for backends that want a vertex hint.
    pub vertex_range: Range<u32>,
    /// The bound material, or `None` for an unbound mesh.
    pub material: Option<AssetHandle<Material>>,
}

impl DrawCall {
    /// Number of indices drawn.
    pub fn index_count(&self) -> u32 {
        self.index_range.end - self.index_range.start
    }
}

impl<G: GeometrySource> Renderable<G> {
    /// One draw call per mesh entry, in mesh-table order.
    ///
    /// Empty meshes are kept so positions match the mesh table.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(mesh_index, mesh)| DrawCall {
                mesh_index,
                index_range: mesh.index_range(),
                vertex_range: mesh.vertex_range(),
                material: mesh
                    .material_index
                    .and_then(|i| self.materials.get(i as usize))
                    .cloned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::material::Material;
    use crate::mesh::MeshEntry;
    use crate::primitives::Cube;
    use crate::Renderable;
    use tessera_core::asset::AssetHandle;
    use tessera_core::math::LinearRgba;
    use tessera_core::renderer::TextureId;

    #[test]
    fn test_draw_calls_follow_mesh_table() {
        let mut renderable = Renderable::new(Cube::default(), LinearRgba::WHITE);
        renderable.add_mesh(MeshEntry::new(0, 0, 12, 18));
        renderable.add_mesh(MeshEntry::new(12, 18, 12, 18));
        let material = AssetHandle::new(Material::new().with_diffuse(TextureId(0)));
        renderable.add_material(material.clone());
        renderable.set_material_of_mesh(1, 0).unwrap();

        let calls = renderable.draw_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].material.is_none());
        assert_eq!(calls[1].mesh_index, 1);
        assert_eq!(calls[1].index_range, 18..36);
        assert_eq!(calls[1].vertex_range, 12..24);
        assert_eq!(calls[1].index_count(), 18);
        assert!(calls[1].material.as_ref().unwrap().ptr_eq(&material));
    }
}
