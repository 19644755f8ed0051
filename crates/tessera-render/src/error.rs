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

//! Errors reported by renderable objects.

use std::fmt;
use tessera_core::renderer::{ResourceError, ShaderStage};
use thiserror::Error;

/// The four GPU buffers a renderable owns, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuBufferKind {
    /// Vertex records.
    Vertex,
    /// Tangent frames.
    Normal,
    /// Triangle indices.
    Index,
    /// Per-frame shading constants.
    Constant,
}

impl fmt::Display for GpuBufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpuBufferKind::Vertex => "vertex",
            GpuBufferKind::Normal => "normal",
            GpuBufferKind::Index => "index",
            GpuBufferKind::Constant => "constant",
        })
    }
}

/// An error returned by a [`Renderable`](crate::Renderable) operation.
#[derive(Debug, Error)]
pub enum RenderableError {
    /// The device failed to allocate one of the buffers during `initialize`.
    #[error("failed to create the {buffer} buffer: {source}")]
    BufferCreation {
        /// The buffer whose creation failed.
        buffer: GpuBufferKind,
        /// The device error.
        #[source]
        source: ResourceError,
    },
    /// `initialize` was called on an object that already owns buffers.
    #[error("renderable already owns GPU buffers; release them before initializing again")]
    AlreadyInitialized,
    /// A GPU operation needed buffers that `initialize` has not created.
    #[error("renderable has not been initialized")]
    NotInitialized,
    /// Writing the per-frame constants failed.
    #[error("failed to upload frame constants: {0}")]
    Upload(#[source] ResourceError),
    /// The device failed to destroy an owned buffer during `release`.
    #[error("failed to release GPU buffers: {0}")]
    Release(#[source] ResourceError),
    /// A geometry source reports more elements than its array holds.
    #[error("geometry reports {count} {buffer} elements but holds only {len}")]
    GeometryCount {
        /// The buffer the array feeds.
        buffer: GpuBufferKind,
        /// The reported count.
        count: usize,
        /// The array length.
        len: usize,
    },
    /// A mesh index was outside the mesh table.
    #[error("mesh index {index} is out of range (mesh count {len})")]
    MeshIndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The size of the mesh table.
        len: usize,
    },
    /// A material index was outside the material table.
    #[error("material index {index} is out of range (material count {len})")]
    MaterialIndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The size of the material table.
        len: usize,
    },
    /// A shader accessor was called before a shader of that stage was attached.
    #[error("no {0} shader is attached")]
    ShaderNotAttached(ShaderStage),
    /// Supplied tangent data does not have one entry per vertex.
    #[error("normal data has {actual} entries but the geometry has {expected} vertices")]
    NormalDataLength {
        /// The vertex count.
        expected: usize,
        /// The supplied length.
        actual: usize,
    },
    /// A mesh pushed into a model would address vertices beyond the index type.
    #[error("model vertex count {vertex_count} exceeds the 16-bit index range")]
    IndexOverflow {
        /// The vertex count the model would reach.
        vertex_count: usize,
    },
    /// A settings document could not be parsed.
    #[error("invalid renderable settings: {0}")]
    Settings(#[from] serde_json::Error),
}
