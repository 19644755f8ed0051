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

//! GPU buffer provisioning for renderables.

use crate::constants::FrameConstants;
use crate::error::{GpuBufferKind, RenderableError};
use crate::geometry::GeometrySource;
use crate::renderable::Renderable;
use crate::settings::TangentGate;
use crate::tangent::generate_normal_data;
use crate::vertex::NormalData;
use tessera_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};

/// The GPU buffers owned by one renderable.
///
/// Each slot is `None` until the matching step of `initialize` succeeds. A
/// failed `initialize` leaves the earlier slots filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuBuffers {
    /// Vertex records.
    pub vertex: Option<BufferId>,
    /// Tangent frames.
    pub normal: Option<BufferId>,
    /// Triangle indices.
    pub index: Option<BufferId>,
    /// Per-frame constants.
    pub constant: Option<BufferId>,
}

impl GpuBuffers {
    /// Returns `true` if all four buffers exist.
    pub fn is_complete(&self) -> bool {
        self.vertex.is_some()
            && self.normal.is_some()
            && self.index.is_some()
            && self.constant.is_some()
    }

    /// Returns `true` if no buffer exists.
    pub fn is_empty(&self) -> bool {
        self.ids().next().is_none()
    }

    /// The buffers that exist, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = (GpuBufferKind, BufferId)> {
        [
            (GpuBufferKind::Vertex, self.vertex),
            (GpuBufferKind::Normal, self.normal),
            (GpuBufferKind::Index, self.index),
            (GpuBufferKind::Constant, self.constant),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    }
}

impl<G: GeometrySource> Renderable<G> {
    /// Creates the four GPU buffers: vertex, normal, index, then constant.
    ///
    /// If the tangent gate is open and no tangent data exists yet, tangents
    /// are generated before the normal buffer is created. When no tangents
    /// are needed, the normal buffer is filled with zeros.
    ///
    /// The first allocation failure aborts the remaining steps. Buffers
    /// created before it stay owned by the renderable until
    /// [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// [`RenderableError::AlreadyInitialized`] if any buffer already exists,
    /// [`RenderableError::GeometryCount`] if the geometry reports more
    /// elements than it holds (nothing is allocated), and
    /// [`RenderableError::BufferCreation`] if the device rejects an allocation.
    pub fn initialize(&mut self, device: &dyn GraphicsDevice) -> Result<(), RenderableError> {
        if !self.buffers.is_empty() {
            log::warn!("Renderable: initialize called on an object that already owns GPU buffers");
            return Err(RenderableError::AlreadyInitialized);
        }

        let vertices = counted(
            GpuBufferKind::Vertex,
            self.geometry.vertices(),
            self.geometry.vertex_count(),
        )?;
        let indices = counted(
            GpuBufferKind::Index,
            self.geometry.indices(),
            self.geometry.index_count(),
        )?;

        // 1. Vertex buffer.
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let id = self.create_with_data(
            device,
            GpuBufferKind::Vertex,
            BufferUsage::VERTEX,
            vertex_bytes,
        )?;
        self.buffers.vertex = Some(id);

        // 2. Normal buffer, generating tangents first when the gate is open.
        if self.normal_data.is_empty() && self.wants_tangents() {
            self.normal_data =
                generate_normal_data(vertices, indices, self.settings.degenerate_tangents);
        }
        let zeros;
        let normal_data: &[NormalData] = if self.normal_data.is_empty() {
            zeros = vec![NormalData::default(); vertices.len()];
            &zeros
        } else {
            &self.normal_data
        };
        let id = self.create_with_data(
            device,
            GpuBufferKind::Normal,
            BufferUsage::VERTEX,
            bytemuck::cast_slice(normal_data),
        )?;
        self.buffers.normal = Some(id);

        // 3. Index buffer.
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);
        let id = self.create_with_data(
            device,
            GpuBufferKind::Index,
            BufferUsage::INDEX,
            index_bytes,
        )?;
        self.buffers.index = Some(id);

        // 4. Constant buffer, written each frame by `update_constants`.
        let label = self.settings.buffer_label("Constant Buffer");
        let desc = BufferDescriptor {
            label: Some(label.as_str().into()),
            size: FrameConstants::SIZE,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            mapped_at_creation: false,
        };
        log::debug!(
            "Renderable: creating {} buffer '{}' ({} bytes, {:?})",
            GpuBufferKind::Constant,
            label,
            desc.size,
            desc.usage
        );
        let id = device
            .create_buffer(&desc)
            .map_err(|source| Self::creation_failed(GpuBufferKind::Constant, source))?;
        self.buffers.constant = Some(id);

        log::info!(
            "Renderable: provisioned '{}' ({} vertices, {} indices, {} meshes, tangents {})",
            self.settings.label.as_deref().unwrap_or("unnamed"),
            self.geometry.vertex_count(),
            self.geometry.index_count(),
            self.meshes.len(),
            if self.normal_data.is_empty() { "zeroed" } else { "present" }
        );
        Ok(())
    }

    /// Returns `true` once all four buffers exist.
    pub fn is_initialized(&self) -> bool {
        self.buffers.is_complete()
    }

    /// The ownership record of the GPU buffers.
    pub fn buffers(&self) -> &GpuBuffers {
        &self.buffers
    }

    /// The vertex buffer, if created.
    pub fn vertex_buffer(&self) -> Option<BufferId> {
        self.buffers.vertex
    }

    /// The normal buffer, if created.
    pub fn normal_buffer(&self) -> Option<BufferId> {
        self.buffers.normal
    }

    /// The index buffer, if created.
    pub fn index_buffer(&self) -> Option<BufferId> {
        self.buffers.index
    }

    /// The constant buffer, if created.
    pub fn constant_buffer(&self) -> Option<BufferId> {
        self.buffers.constant
    }

    /// The constants for the current world matrix and tint.
    pub fn frame_constants(&self) -> FrameConstants {
        FrameConstants::new(&self.world, self.settings.output_color)
    }

    /// Writes [`frame_constants`](Self::frame_constants) into the constant buffer.
    pub fn update_constants(&self, device: &dyn GraphicsDevice) -> Result<(), RenderableError> {
        let buffer = self.buffers.constant.ok_or(RenderableError::NotInitialized)?;
        let constants = self.frame_constants();
        device
            .write_buffer(buffer, 0, bytemuck::bytes_of(&constants))
            .map_err(RenderableError::Upload)
    }

    /// Destroys every buffer the renderable owns and clears the handles.
    ///
    /// Safe to call after a failed `initialize` and safe to call twice. Every
    /// buffer is attempted; the first device error is returned.
    pub fn release(&mut self, device: &dyn GraphicsDevice) -> Result<(), RenderableError> {
        let mut first_error = None;
        for (kind, id) in self.buffers.ids() {
            if let Err(e) = device.destroy_buffer(id) {
                log::error!("Renderable: failed to destroy {kind} buffer {id:?}: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        self.buffers = GpuBuffers::default();
        match first_error {
            Some(e) => Err(RenderableError::Release(e)),
            None => Ok(()),
        }
    }

    fn wants_tangents(&self) -> bool {
        match self.settings.tangent_gate {
            TangentGate::AnyMaterial => self.has_texture(),
            TangentGate::NormalMapOnly => self.has_normal_map(),
        }
    }

    fn create_with_data(
        &self,
        device: &dyn GraphicsDevice,
        kind: GpuBufferKind,
        usage: BufferUsage,
        contents: &[u8],
    ) -> Result<BufferId, RenderableError> {
        let label = self.settings.buffer_label(buffer_suffix(kind));
        let desc = BufferDescriptor {
            label: Some(label.as_str().into()),
            size: contents.len() as u64,
            usage,
            mapped_at_creation: false,
        };
        log::debug!(
            "Renderable: creating {kind} buffer '{label}' ({} bytes, {:?})",
            desc.size,
            desc.usage
        );
        device
            .create_buffer_with_data(&desc, contents)
            .map_err(|source| Self::creation_failed(kind, source))
    }

    fn creation_failed(kind: GpuBufferKind, source: ResourceError) -> RenderableError {
        log::error!("Renderable: failed to create the {kind} buffer: {source}");
        RenderableError::BufferCreation {
            buffer: kind,
            source,
        }
    }
}

/// The leading `count` elements of `data`.
fn counted<T>(buffer: GpuBufferKind, data: &[T], count: usize) -> Result<&[T], RenderableError> {
    data.get(..count).ok_or_else(|| {
        log::error!(
            "Renderable: geometry reports {count} {buffer} elements but holds {}",
            data.len()
        );
        RenderableError::GeometryCount {
            buffer,
            count,
            len: data.len(),
        }
    })
}

fn buffer_suffix(kind: GpuBufferKind) -> &'static str {
    match kind {
        GpuBufferKind::Vertex => "Vertex Buffer",
        GpuBufferKind::Normal => "Normal Buffer",
        GpuBufferKind::Index => "Index Buffer",
        GpuBufferKind::Constant => "Constant Buffer",
    }
}
