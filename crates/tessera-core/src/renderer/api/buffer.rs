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

//! Defines data structures related to GPU buffer resources.

use std::borrow::Cow;

bitflags::bitflags! {
    /// A set of flags describing the allowed usages of a [`BufferId`].
    ///
    /// The device uses them to pick a memory type and to validate later use.
    /// A buffer without [`BufferUsage::COPY_DST`] is immutable after creation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// The buffer can be written after creation.
        const COPY_DST = 1 << 1;
        /// The buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 2;
        /// The buffer can be bound as an index buffer.
        const INDEX = 1 << 3;
        /// The buffer can be bound as a uniform (constant) buffer.
        const UNIFORM = 1 << 4;
    }
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// A bitmask of [`BufferUsage`] flags describing how the buffer will be used.
    pub usage: BufferUsage,
    /// If `true`, the buffer is created in a mapped state for immediate CPU access.
    pub mapped_at_creation: bool,
}

impl BufferDescriptor<'_> {
    /// Returns `true` if the buffer may be written after creation.
    pub fn is_writable(&self) -> bool {
        self.usage.contains(BufferUsage::COPY_DST)
    }
}

/// An opaque handle to a GPU buffer resource.
///
/// This ID is returned by [`GraphicsDevice::create_buffer`] and is used to reference
/// the buffer in all subsequent operations.
///
/// [`GraphicsDevice::create_buffer`]: crate::renderer::GraphicsDevice::create_buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
}

impl IndexFormat {
    /// Size of one index element in bytes.
    pub const fn size(self) -> u64 {
        match self {
            IndexFormat::Uint16 => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_requires_copy_dst() {
        let mut desc = BufferDescriptor {
            label: Some("Constants".into()),
            size: 64,
            usage: BufferUsage::UNIFORM,
            mapped_at_creation: false,
        };
        assert!(!desc.is_writable());
        desc.usage |= BufferUsage::COPY_DST;
        assert!(desc.is_writable());
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
    }
}
