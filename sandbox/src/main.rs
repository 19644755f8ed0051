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

use anyhow::{Context, Result};
use tessera_core::asset::AssetHandle;
use tessera_core::math::{LinearRgba, Vec2, Vec3, FRAC_PI_4};
use tessera_core::renderer::{ShaderModuleId, TextureId};
use tessera_infra::HeadlessDevice;
use tessera_render::{
    Cube, GeometrySource, Material, ModelGeometry, NormalData, PixelShader, Renderable,
    RenderableSettings, SimpleVertex, VertexShader,
};

const MODEL_SETTINGS: &str = r#"{
    "label": "Pillar",
    "output_color": { "r": 0.8, "g": 0.7, "b": 0.6, "a": 1.0 },
    "tangent_gate": "normal_map_only"
}"#;

/// A two-mesh model: a floor quad and a cube-shaped pillar above it.
fn build_model() -> Result<ModelGeometry> {
    let floor = [
        SimpleVertex::new(Vec3::new(-2.0, 0.0, 2.0), Vec2::new(0.0, 0.0), Vec3::Y),
        SimpleVertex::new(Vec3::new(2.0, 0.0, 2.0), Vec2::new(1.0, 0.0), Vec3::Y),
        SimpleVertex::new(Vec3::new(2.0, 0.0, -2.0), Vec2::new(1.0, 1.0), Vec3::Y),
        SimpleVertex::new(Vec3::new(-2.0, 0.0, -2.0), Vec2::new(0.0, 1.0), Vec3::Y),
    ];
    let pillar = Cube::new(0.5);

    let mut model = ModelGeometry::new();
    model.push_mesh(&floor, &[0, 1, 2, 0, 2, 3])?;
    model.push_mesh(pillar.vertices(), pillar.indices())?;
    Ok(model)
}

fn log_draw_list<G: GeometrySource>(name: &str, renderable: &Renderable<G>) {
    for call in renderable.draw_calls() {
        let material = call
            .material
            .as_ref()
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| "<unbound>".to_string());
        log::info!(
            "{name}: draw mesh {} indices {:?} vertices {:?} material {material}",
            call.mesh_index,
            call.index_range,
            call.vertex_range
        );
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let device = HeadlessDevice::new();

    // Shared between both objects.
    let vertex_shader = AssetHandle::new(VertexShader::new(
        ShaderModuleId(0),
        vec![SimpleVertex::layout(), NormalData::layout()],
    ));
    let pixel_shader = AssetHandle::new(PixelShader::new(ShaderModuleId(1)));
    let brick = AssetHandle::new(
        Material::new()
            .with_name("brick")
            .with_diffuse(TextureId(0))
            .with_normal_map(TextureId(1)),
    );
    let plaster = AssetHandle::new(
        Material::new()
            .with_name("plaster")
            .with_diffuse(TextureId(2)),
    );

    let cube = Cube::new(1.0);
    let entry = cube.mesh_entry();
    let mut crate_box = Renderable::new(cube, LinearRgba::WHITE);
    crate_box.add_mesh(entry);
    let brick_index = crate_box.add_material(brick.clone());
    crate_box.set_material_of_mesh(0, brick_index)?;
    crate_box.set_vertex_shader(vertex_shader.clone());
    crate_box.set_pixel_shader(pixel_shader.clone());
    crate_box.rotate_y(FRAC_PI_4);
    crate_box.translate(Vec3::new(0.0, 1.0, 0.0));

    let settings = RenderableSettings::from_json(MODEL_SETTINGS)?;
    let mut pillar = Renderable::from_model(build_model()?, settings);
    pillar.add_material(plaster);
    pillar.add_material(brick);
    pillar.set_material_of_mesh(0, 0)?;
    pillar.set_material_of_mesh(1, 1)?;
    pillar.set_vertex_shader(vertex_shader);
    pillar.set_pixel_shader(pixel_shader);
    pillar.scale(2.0, 2.0, 2.0);

    crate_box
        .initialize(&device)
        .context("provisioning the crate")?;
    pillar
        .initialize(&device)
        .context("provisioning the pillar")?;
    log::info!(
        "{} buffers live, {} bytes allocated",
        device.live_buffer_count(),
        device.allocated_bytes()
    );

    for frame in 0..3 {
        crate_box.rotate_y(FRAC_PI_4 / 2.0);
        crate_box.update_constants(&device)?;
        pillar.update_constants(&device)?;
        log::debug!("frame {frame}: crate world {:?}", crate_box.world_matrix());
    }

    log::info!(
        "crate uses vertex shader {:?} and pixel shader {:?}",
        crate_box.vertex_shader()?,
        crate_box.pixel_shader()?
    );
    log_draw_list("crate", &crate_box);
    log_draw_list("pillar", &pillar);

    crate_box.release(&device)?;
    pillar.release(&device)?;
    log::info!("{} buffers live after release", device.live_buffer_count());
    Ok(())
}
