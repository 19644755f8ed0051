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

//! Material descriptors shared between renderables.

use tessera_core::asset::Asset;
use tessera_core::renderer::TextureId;

/// The textures a mesh is drawn with.
///
/// Materials are shared through [`AssetHandle`](tessera_core::asset::AssetHandle):
/// the same material may be bound by several meshes of several renderables.
/// A normal-map texture is what triggers tangent-space generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Name given by the importer, if any.
    pub name: Option<String>,
    /// Base color texture.
    pub diffuse: Option<TextureId>,
    /// Tangent-space normal map.
    pub normal: Option<TextureId>,
}

impl Asset for Material {}

impl Material {
    /// Creates a material with no textures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the importer-given name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the base color texture.
    pub fn with_diffuse(mut self, texture: TextureId) -> Self {
        self.diffuse = Some(texture);
        self
    }

    /// Sets the normal map.
    pub fn with_normal_map(mut self, texture: TextureId) -> Self {
        self.normal = Some(texture);
        self
    }

    /// Returns `true` if the material carries a normal map.
    pub fn has_normal_map(&self) -> bool {
        self.normal.is_some()
    }

    /// Returns `true` if the material carries a base color texture.
    pub fn has_diffuse(&self) -> bool {
        self.diffuse.is_some()
    }
}
