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

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tessera_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};

/// One call to `create_buffer` or `create_buffer_with_data`, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationRecord {
    /// The label from the descriptor.
    pub label: Option<String>,
    /// The requested size in bytes.
    pub size: u64,
    /// The requested usage.
    pub usage: BufferUsage,
    /// Whether initial contents were supplied.
    pub with_data: bool,
    /// The new buffer, or `None` if creation failed.
    pub id: Option<BufferId>,
}

#[derive(Debug)]
struct HeadlessBuffer {
    label: Option<String>,
    usage: BufferUsage,
    contents: Vec<u8>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    buffers: HashMap<BufferId, HeadlessBuffer>,
    next_buffer_id: usize,
    allocated_bytes: u64,
    creations: Vec<CreationRecord>,
    fail_at_attempt: Option<usize>,
    memory_limit: Option<u64>,
}

/// A [`GraphicsDevice`] that stores every buffer as a byte vector.
///
/// It validates requests the way a hardware driver would: zero-sized
/// buffers are rejected and writes must target a `COPY_DST` buffer within
/// its bounds. Every creation attempt is recorded for inspection.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<HeadlessState>,
}

impl HeadlessDevice {
    /// Creates a device with no memory limit and no injected faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the creation attempt with the given zero-based position fail
    /// with [`ResourceError::OutOfMemory`].
    pub fn fail_creation_at(self, attempt: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fail_at_attempt = Some(attempt);
        }
        self
    }

    /// Caps the total size of live buffers.
    pub fn with_memory_limit(self, bytes: u64) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.memory_limit = Some(bytes);
        }
        self
    }

    /// A copy of the bytes currently held by a buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        let state = self.lock().ok()?;
        state.buffers.get(&id).map(|buffer| buffer.contents.clone())
    }

    /// The size of a live buffer.
    pub fn buffer_size(&self, id: BufferId) -> Option<u64> {
        let state = self.lock().ok()?;
        state.buffers.get(&id).map(|buffer| buffer.contents.len() as u64)
    }

    /// The usage a live buffer was created with.
    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        let state = self.lock().ok()?;
        state.buffers.get(&id).map(|buffer| buffer.usage)
    }

    /// The debug label of a live buffer.
    pub fn buffer_label(&self, id: BufferId) -> Option<String> {
        let state = self.lock().ok()?;
        state.buffers.get(&id).and_then(|buffer| buffer.label.clone())
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.lock().map(|state| state.buffers.len()).unwrap_or(0)
    }

    /// Total size of the live buffers.
    pub fn allocated_bytes(&self) -> u64 {
        self.lock().map(|state| state.allocated_bytes).unwrap_or(0)
    }

    /// Every creation attempt so far, in call order.
    pub fn creations(&self) -> Vec<CreationRecord> {
        self.lock()
            .map(|state| state.creations.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HeadlessState>, ResourceError> {
        self.state.lock().map_err(|_| {
            ResourceError::BackendError("headless device state poisoned".to_string())
        })
    }

    fn allocate(
        &self,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<BufferId, ResourceError> {
        let mut state = self.lock()?;
        let attempt = state.creations.len();
        let label = descriptor.label.as_deref().map(str::to_owned);

        let outcome = Self::validate(&state, attempt, descriptor, data).map(|()| {
            let id = BufferId(state.next_buffer_id);
            state.next_buffer_id += 1;

            let mut contents = vec![0u8; descriptor.size as usize];
            if let Some(data) = data {
                contents[..data.len()].copy_from_slice(data);
            }
            state.allocated_bytes += descriptor.size;
            state.buffers.insert(
                id,
                HeadlessBuffer {
                    label: label.clone(),
                    usage: descriptor.usage,
                    contents,
                },
            );
            log::debug!(
                "HeadlessDevice: Created buffer '{}' with ID: {:?}, size: {} bytes",
                label.as_deref().unwrap_or_default(),
                id,
                descriptor.size
            );
            id
        });

        state.creations.push(CreationRecord {
            label,
            size: descriptor.size,
            usage: descriptor.usage,
            with_data: data.is_some(),
            id: outcome.as_ref().ok().copied(),
        });
        outcome
    }

    fn validate(
        state: &HeadlessState,
        attempt: usize,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<(), ResourceError> {
        if state.fail_at_attempt == Some(attempt) {
            log::warn!("HeadlessDevice: Injected failure on creation attempt {attempt}");
            return Err(ResourceError::OutOfMemory {
                requested: descriptor.size,
            });
        }
        if descriptor.size == 0 {
            return Err(ResourceError::ZeroSized);
        }
        if data.is_some_and(|data| data.len() as u64 > descriptor.size) {
            return Err(ResourceError::OutOfBounds);
        }
        if let Some(limit) = state.memory_limit {
            if state.allocated_bytes + descriptor.size > limit {
                return Err(ResourceError::OutOfMemory {
                    requested: descriptor.size,
                });
            }
        }
        Ok(())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        self.allocate(descriptor, None)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.allocate(descriptor, Some(data))
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut state = self.lock()?;
        let buffer = state.buffers.get_mut(&id).ok_or(ResourceError::InvalidHandle)?;

        if !buffer.usage.contains(BufferUsage::COPY_DST) {
            return Err(ResourceError::BackendError(format!(
                "buffer {id:?} was not created with COPY_DST"
            )));
        }
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(ResourceError::OutOfBounds)?;
        if end > buffer.contents.len() as u64 {
            return Err(ResourceError::OutOfBounds);
        }
        buffer.contents[offset as usize..end as usize].copy_from_slice(data);

        log::trace!(
            "HeadlessDevice: Wrote {} bytes to buffer ID: {:?} at offset {}",
            data.len(),
            id,
            offset
        );
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut state = self.lock()?;
        let buffer = state.buffers.remove(&id).ok_or(ResourceError::InvalidHandle)?;
        state.allocated_bytes -= buffer.contents.len() as u64;
        log::debug!("HeadlessDevice: Destroyed buffer with ID: {id:?}");
        Ok(())
    }
}
