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

//! Compiled shader objects attached to renderables.
//!
//! Compilation happens elsewhere. These objects only pair a module handle with
//! what the render loop needs to bind it.

use tessera_core::asset::Asset;
use tessera_core::renderer::{ShaderModuleId, VertexBufferLayoutDescriptor};

/// A compiled vertex shader and the input layout it expects.
#[derive(Debug, Clone)]
pub struct VertexShader {
    module: ShaderModuleId,
    layout: Vec<VertexBufferLayoutDescriptor<'static>>,
}

impl Asset for VertexShader {}

impl VertexShader {
    /// Pairs a module with the vertex streams it reads.
    pub fn new(module: ShaderModuleId, layout: Vec<VertexBufferLayoutDescriptor<'static>>) -> Self {
        Self { module, layout }
    }

    /// The compiled module.
    pub fn module(&self) -> ShaderModuleId {
        self.module
    }

    /// The input layout, one entry per vertex stream.
    pub fn layout(&self) -> &[VertexBufferLayoutDescriptor<'static>] {
        &self.layout
    }
}

/// A compiled pixel (fragment) shader.
#[derive(Debug, Clone, Copy)]
pub struct PixelShader {
    module: ShaderModuleId,
}

impl Asset for PixelShader {}

impl PixelShader {
    /// Wraps a compiled module.
    pub fn new(module: ShaderModuleId) -> Self {
        Self { module }
    }

    /// The compiled module.
    pub fn module(&self) -> ShaderModuleId {
        self.module
    }
}
