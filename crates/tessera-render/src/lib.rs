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

//! # Tessera Render
//!
//! The renderable-object layer: per-object geometry, material and mesh tables,
//! shader bindings, and a world transform, plus the machinery that turns CPU
//! mesh data into GPU-resident buffers with a tangent basis for normal mapping.
//!
//! The entry point is [`Renderable`]. It is generic over a [`GeometrySource`],
//! so procedural primitives and imported models share the same provisioning
//! path.

#![warn(missing_docs)]

pub mod constants;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod provision;
pub mod renderable;
pub mod settings;
pub mod shader;
pub mod tangent;
pub mod vertex;

pub use constants::FrameConstants;
pub use draw::DrawCall;
pub use error::{GpuBufferKind, RenderableError};
pub use geometry::GeometrySource;
pub use material::Material;
pub use mesh::MeshEntry;
pub use primitives::{Cube, ModelGeometry};
pub use provision::GpuBuffers;
pub use renderable::Renderable;
pub use settings::{DegenerateTangentPolicy, RenderableSettings, TangentGate};
pub use shader::{PixelShader, VertexShader};
pub use vertex::{Index, NormalData, SimpleVertex, INDEX_FORMAT};
