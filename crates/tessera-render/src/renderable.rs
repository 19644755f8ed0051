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

//! The renderable aggregate: tables, transform, and shader bindings.

use crate::error::RenderableError;
use crate::geometry::GeometrySource;
use crate::material::Material;
use crate::mesh::MeshEntry;
use crate::primitives::ModelGeometry;
use crate::provision::GpuBuffers;
use crate::settings::RenderableSettings;
use crate::shader::{PixelShader, VertexShader};
use crate::vertex::NormalData;
use tessera_core::asset::AssetHandle;
use tessera_core::math::{LinearRgba, Mat4, Vec3};
use tessera_core::renderer::{ShaderModuleId, ShaderStage, VertexBufferLayoutDescriptor};

/// An object that can be drawn: geometry plus everything needed to bind it.
///
/// A renderable exclusively owns its mesh table, its tangent data, and the
/// four GPU buffers created by [`initialize`](Self::initialize). Materials and
/// shaders are shared with other renderables through [`AssetHandle`]s.
///
/// All mutation is single-threaded; callers serialize access to one object.
pub struct Renderable<G: GeometrySource> {
    pub(crate) geometry: G,
    pub(crate) settings: RenderableSettings,
    pub(crate) meshes: Vec<MeshEntry>,
    pub(crate) materials: Vec<AssetHandle<Material>>,
    // Empty, or exactly one entry per vertex.
    pub(crate) normal_data: Vec<NormalData>,
    pub(crate) world: Mat4,
    // Monotonic: once set it is never cleared.
    pub(crate) has_normal_map: bool,
    pub(crate) vertex_shader: Option<AssetHandle<VertexShader>>,
    pub(crate) pixel_shader: Option<AssetHandle<PixelShader>>,
    pub(crate) buffers: GpuBuffers,
}

impl<G: GeometrySource> Renderable<G> {
    /// Creates a renderable with default settings and the given tint.
    pub fn new(geometry: G, output_color: LinearRgba) -> Self {
        Self::with_settings(geometry, RenderableSettings::with_color(output_color))
    }

    /// Creates a renderable from explicit settings.
    ///
    /// The world transform starts as identity and both tables start empty.
    pub fn with_settings(geometry: G, settings: RenderableSettings) -> Self {
        Self {
            geometry,
            settings,
            meshes: Vec::new(),
            materials: Vec::new(),
            normal_data: Vec::new(),
            world: Mat4::IDENTITY,
            has_normal_map: false,
            vertex_shader: None,
            pixel_shader: None,
            buffers: GpuBuffers::default(),
        }
    }

    /// The geometry source.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// The construction-time settings.
    pub fn settings(&self) -> &RenderableSettings {
        &self.settings
    }

    /// The tint passed to the shaders.
    pub fn output_color(&self) -> LinearRgba {
        self.settings.output_color
    }

    // --- Mesh & material tables ---

    /// Appends an entry to the mesh table.
    ///
    /// Meant for construction and import time, before any material is bound.
    pub fn add_mesh(&mut self, mesh: MeshEntry) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Appends a material to the material table and returns its index.
    ///
    /// No mesh is bound to it until [`set_material_of_mesh`](Self::set_material_of_mesh).
    pub fn add_material(&mut self, material: AssetHandle<Material>) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Binds a mesh to a material.
    ///
    /// Fails without touching either table if an index is out of range. When the
    /// bound material has a normal map, [`has_normal_map`](Self::has_normal_map)
    /// becomes `true` and stays so.
    pub fn set_material_of_mesh(
        &mut self,
        mesh_index: usize,
        material_index: usize,
    ) -> Result<(), RenderableError> {
        if mesh_index >= self.meshes.len() {
            log::warn!(
                "Renderable: rejected binding of mesh {mesh_index} (mesh count {})",
                self.meshes.len()
            );
            return Err(RenderableError::MeshIndexOutOfRange {
                index: mesh_index,
                len: self.meshes.len(),
            });
        }
        if material_index >= self.materials.len() {
            log::warn!(
                "Renderable: rejected binding to material {material_index} (material count {})",
                self.materials.len()
            );
            return Err(RenderableError::MaterialIndexOutOfRange {
                index: material_index,
                len: self.materials.len(),
            });
        }

        let stored = u32::try_from(material_index).map_err(|_| {
            RenderableError::MaterialIndexOutOfRange {
                index: material_index,
                len: self.materials.len(),
            }
        })?;
        self.meshes[mesh_index].material_index = Some(stored);

        if self.materials[material_index].has_normal_map() {
            self.has_normal_map = true;
        }
        Ok(())
    }

    /// Returns `true` if the material table is non-empty.
    ///
    /// This does not check that any mesh is bound to a material.
    pub fn has_texture(&self) -> bool {
        !self.materials.is_empty()
    }

    /// Returns `true` once any mesh has been bound to a normal-mapped material.
    pub fn has_normal_map(&self) -> bool {
        self.has_normal_map
    }

    /// Number of mesh entries.
    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Number of materials.
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// The mesh entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn mesh(&self, index: usize) -> &MeshEntry {
        assert!(
            index < self.meshes.len(),
            "mesh index {index} out of range (mesh count {})",
            self.meshes.len()
        );
        &self.meshes[index]
    }

    /// The material at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn material(&self, index: usize) -> &AssetHandle<Material> {
        assert!(
            index < self.materials.len(),
            "material index {index} out of range (material count {})",
            self.materials.len()
        );
        &self.materials[index]
    }

    /// The whole mesh table.
    pub fn meshes(&self) -> &[MeshEntry] {
        &self.meshes
    }

    /// The whole material table.
    pub fn materials(&self) -> &[AssetHandle<Material>] {
        &self.materials
    }

    // --- Tangent data ---

    /// The per-vertex tangent frames. Empty until generated or supplied.
    pub fn normal_data(&self) -> &[NormalData] {
        &self.normal_data
    }

    /// Supplies precomputed tangent frames, one per vertex.
    ///
    /// `initialize` only generates tangents when none are present, so data set
    /// here is uploaded as-is.
    pub fn set_normal_data(&mut self, normal_data: Vec<NormalData>) -> Result<(), RenderableError> {
        let expected = self.geometry.vertex_count();
        if !normal_data.is_empty() && normal_data.len() != expected {
            return Err(RenderableError::NormalDataLength {
                expected,
                actual: normal_data.len(),
            });
        }
        self.normal_data = normal_data;
        Ok(())
    }

    // --- Transform ---

    /// The accumulated object-to-world matrix.
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// Replaces the world matrix. This is the only way to discard accumulated transforms.
    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    /// Rotates around the local X-axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: f32) {
        self.world *= Mat4::from_rotation_x(angle);
    }

    /// Rotates around the local Y-axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.world *= Mat4::from_rotation_y(angle);
    }

    /// Rotates around the local Z-axis by `angle` radians.
    pub fn rotate_z(&mut self, angle: f32) {
        self.world *= Mat4::from_rotation_z(angle);
    }

    /// Rotates by Euler angles in radians (roll, then pitch, then yaw).
    pub fn rotate_pitch_yaw_roll(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.world *= Mat4::from_rotation_pitch_yaw_roll(pitch, yaw, roll);
    }

    /// Scales along the local axes.
    pub fn scale(&mut self, scale_x: f32, scale_y: f32, scale_z: f32) {
        self.world *= Mat4::from_scale(Vec3::new(scale_x, scale_y, scale_z));
    }

    /// Translates in the local frame.
    pub fn translate(&mut self, offset: Vec3) {
        self.world *= Mat4::from_translation(offset);
    }

    // --- Shaders ---

    /// Attaches a vertex shader, replacing any previous one.
    pub fn set_vertex_shader(&mut self, shader: AssetHandle<VertexShader>) {
        self.vertex_shader = Some(shader);
    }

    /// Attaches a pixel shader, replacing any previous one.
    pub fn set_pixel_shader(&mut self, shader: AssetHandle<PixelShader>) {
        self.pixel_shader = Some(shader);
    }

    /// Returns `true` if a vertex shader is attached.
    pub fn has_vertex_shader(&self) -> bool {
        self.vertex_shader.is_some()
    }

    /// Returns `true` if a pixel shader is attached.
    pub fn has_pixel_shader(&self) -> bool {
        self.pixel_shader.is_some()
    }

    /// The attached vertex shader object, if any.
    pub fn vertex_shader_handle(&self) -> Option<&AssetHandle<VertexShader>> {
        self.vertex_shader.as_ref()
    }

    /// The attached pixel shader object, if any.
    pub fn pixel_shader_handle(&self) -> Option<&AssetHandle<PixelShader>> {
        self.pixel_shader.as_ref()
    }

    /// The compiled vertex shader module.
    pub fn vertex_shader(&self) -> Result<ShaderModuleId, RenderableError> {
        self.attached_vertex_shader().map(|shader| shader.module())
    }

    /// The compiled pixel shader module.
    pub fn pixel_shader(&self) -> Result<ShaderModuleId, RenderableError> {
        self.pixel_shader
            .as_ref()
            .map(|shader| shader.module())
            .ok_or(RenderableError::ShaderNotAttached(ShaderStage::Fragment))
    }

    /// The input layout of the attached vertex shader.
    pub fn vertex_layout(
        &self,
    ) -> Result<&[VertexBufferLayoutDescriptor<'static>], RenderableError> {
        self.attached_vertex_shader().map(|shader| shader.layout())
    }

    fn attached_vertex_shader(&self) -> Result<&VertexShader, RenderableError> {
        self.vertex_shader
            .as_deref()
            .ok_or(RenderableError::ShaderNotAttached(ShaderStage::Vertex))
    }
}

impl Renderable<ModelGeometry> {
    /// Creates a renderable over an imported model, seeding the mesh table
    /// from the model's meshes.
    pub fn from_model(model: ModelGeometry, settings: RenderableSettings) -> Self {
        let meshes = model.meshes().to_vec();
        let mut renderable = Self::with_settings(model, settings);
        renderable.meshes = meshes;
        renderable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Cube;
    use crate::vertex::SimpleVertex;
    use approx::assert_abs_diff_eq;
    use tessera_core::math::{EPSILON, FRAC_PI_2};
    use tessera_core::renderer::TextureId;

    fn two_mesh_cube() -> Renderable<Cube> {
        let mut renderable = Renderable::new(Cube::new(1.0), LinearRgba::WHITE);
        renderable.add_mesh(MeshEntry::new(0, 0, 12, 18));
        renderable.add_mesh(MeshEntry::new(12, 18, 12, 18));
        renderable
    }

    fn normal_mapped() -> AssetHandle<Material> {
        AssetHandle::new(
            Material::new()
                .with_diffuse(TextureId(1))
                .with_normal_map(TextureId(2)),
        )
    }

    fn plain() -> AssetHandle<Material> {
        AssetHandle::new(Material::new().with_diffuse(TextureId(3)))
    }

    #[test]
    fn test_new_renderable_starts_at_identity_with_empty_tables() {
        let renderable = Renderable::new(Cube::new(1.0), LinearRgba::BLUE);
        assert_eq!(*renderable.world_matrix(), Mat4::IDENTITY);
        assert_eq!(renderable.output_color(), LinearRgba::BLUE);
        assert_eq!(renderable.num_meshes(), 0);
        assert_eq!(renderable.num_materials(), 0);
        assert!(!renderable.has_texture());
        assert!(!renderable.has_normal_map());
        assert!(renderable.normal_data().is_empty());
    }

    #[test]
    fn test_add_material_returns_table_positions() {
        let mut renderable = two_mesh_cube();
        assert_eq!(renderable.add_material(plain()), 0);
        assert_eq!(renderable.add_material(normal_mapped()), 1);
        assert!(renderable.has_texture());
        assert!(!renderable.material(0).has_normal_map());
        assert!(renderable.material(1).has_normal_map());
    }

    #[test]
    fn test_binding_records_material_index() {
        let mut renderable = two_mesh_cube();
        renderable.add_material(plain());
        renderable.set_material_of_mesh(1, 0).unwrap();
        assert_eq!(renderable.mesh(1).material_index, Some(0));
        assert!(!renderable.mesh(0).is_bound());
    }

    #[test]
    fn test_normal_map_flag_is_monotonic() {
        let mut renderable = two_mesh_cube();
        renderable.add_material(normal_mapped());
        renderable.add_material(plain());

        renderable.set_material_of_mesh(0, 0).unwrap();
        assert!(renderable.has_normal_map());

        renderable.set_material_of_mesh(1, 1).unwrap();
        renderable.set_material_of_mesh(0, 1).unwrap();
        assert!(renderable.has_normal_map());
    }

    #[test]
    fn test_normal_map_lookup_uses_the_material_index() {
        // Mesh 1 is bound to material 0; there is no material 1 to consult.
        let mut renderable = two_mesh_cube();
        renderable.add_material(normal_mapped());
        renderable.set_material_of_mesh(1, 0).unwrap();
        assert!(renderable.has_normal_map());

        // And a plain material at the mesh's position must not set the flag.
        let mut renderable = two_mesh_cube();
        renderable.add_material(plain());
        renderable.add_material(normal_mapped());
        renderable.set_material_of_mesh(0, 0).unwrap();
        renderable.set_material_of_mesh(1, 0).unwrap();
        assert!(!renderable.has_normal_map());
    }

    #[test]
    fn test_out_of_range_binding_leaves_tables_untouched() {
        let mut renderable = two_mesh_cube();
        renderable.add_material(normal_mapped());
        let meshes_before = renderable.meshes().to_vec();

        let err = renderable.set_material_of_mesh(2, 0).unwrap_err();
        assert!(matches!(
            err,
            RenderableError::MeshIndexOutOfRange { index: 2, len: 2 }
        ));
        let err = renderable.set_material_of_mesh(0, 1).unwrap_err();
        assert!(matches!(
            err,
            RenderableError::MaterialIndexOutOfRange { index: 1, len: 1 }
        ));

        assert_eq!(renderable.meshes(), meshes_before.as_slice());
        assert_eq!(renderable.num_materials(), 1);
        assert!(!renderable.has_normal_map());
    }

    #[test]
    #[should_panic(expected = "mesh index 5 out of range")]
    fn test_mesh_accessor_panics_out_of_range() {
        two_mesh_cube().mesh(5);
    }

    #[test]
    #[should_panic(expected = "material index 0 out of range")]
    fn test_material_accessor_panics_out_of_range() {
        two_mesh_cube().material(0);
    }

    #[test]
    fn test_rotate_then_translate_composes_in_call_order() {
        let mut renderable = two_mesh_cube();
        renderable.rotate_x(FRAC_PI_2);
        renderable.translate(Vec3::new(0.0, 1.0, 0.0));

        let expected = Mat4::IDENTITY
            * Mat4::from_rotation_x(FRAC_PI_2)
            * Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let reversed = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))
            * Mat4::from_rotation_x(FRAC_PI_2);

        // The translation is applied in the rotated frame: +Y becomes +Z.
        let p = renderable.world_matrix().transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(p.z, 1.0, epsilon = EPSILON);

        let q = expected.transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(p.z, q.z, epsilon = EPSILON);
        let r = reversed.transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_scale_and_pitch_yaw_roll_accumulate() {
        let mut renderable = two_mesh_cube();
        renderable.scale(2.0, 2.0, 2.0);
        renderable.rotate_pitch_yaw_roll(0.0, 0.0, FRAC_PI_2);
        renderable.rotate_y(0.0);
        renderable.rotate_z(0.0);

        let p = renderable.world_matrix().transform_point3(Vec3::X);
        assert_abs_diff_eq!(p.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = EPSILON);

        renderable.set_world_matrix(Mat4::IDENTITY);
        assert_eq!(*renderable.world_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_shader_accessors_report_missing_shaders() {
        let mut renderable = two_mesh_cube();
        assert!(!renderable.has_vertex_shader());
        assert!(matches!(
            renderable.vertex_shader(),
            Err(RenderableError::ShaderNotAttached(ShaderStage::Vertex))
        ));
        assert!(matches!(
            renderable.vertex_layout(),
            Err(RenderableError::ShaderNotAttached(ShaderStage::Vertex))
        ));
        assert!(matches!(
            renderable.pixel_shader(),
            Err(RenderableError::ShaderNotAttached(ShaderStage::Fragment))
        ));

        let vs = AssetHandle::new(VertexShader::new(
            ShaderModuleId(10),
            vec![SimpleVertex::layout(), NormalData::layout()],
        ));
        let ps = AssetHandle::new(PixelShader::new(ShaderModuleId(11)));
        renderable.set_vertex_shader(vs.clone());
        renderable.set_pixel_shader(ps);

        assert!(renderable.has_vertex_shader());
        assert!(renderable.has_pixel_shader());
        assert_eq!(renderable.vertex_shader().unwrap(), ShaderModuleId(10));
        assert_eq!(renderable.pixel_shader().unwrap(), ShaderModuleId(11));
        assert_eq!(renderable.vertex_layout().unwrap().len(), 2);
        assert_eq!(vs.strong_count(), 2);
        assert!(renderable.vertex_shader_handle().unwrap().ptr_eq(&vs));
    }

    #[test]
    fn test_materials_are_shared_between_renderables() {
        let material = normal_mapped();
        let mut a = two_mesh_cube();
        let mut b = two_mesh_cube();
        a.add_material(material.clone());
        b.add_material(material.clone());
        assert_eq!(material.strong_count(), 3);

        drop(a);
        assert_eq!(material.strong_count(), 2);
        assert!(b.material(0).ptr_eq(&material));
        b.set_material_of_mesh(0, 0).unwrap();
        assert!(b.has_normal_map());
    }

    #[test]
    fn test_set_normal_data_checks_length() {
        let mut renderable = two_mesh_cube();
        let err = renderable
            .set_normal_data(vec![NormalData::default(); 3])
            .unwrap_err();
        assert!(matches!(
            err,
            RenderableError::NormalDataLength {
                expected: 24,
                actual: 3
            }
        ));
        renderable
            .set_normal_data(vec![NormalData::default(); 24])
            .unwrap();
        assert_eq!(renderable.normal_data().len(), 24);
    }
}
