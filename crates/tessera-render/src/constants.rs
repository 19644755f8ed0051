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

//! The per-frame constant record.

use tessera_core::math::{LinearRgba, Mat4};

/// Shading constants rewritten by the render loop every frame.
///
/// The constant buffer of a renderable is sized for exactly one of these.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameConstants {
    /// The object-to-world matrix, column-major.
    pub world: [[f32; 4]; 4],
    /// The renderable's tint.
    pub output_color: LinearRgba,
}

impl FrameConstants {
    /// Byte size of the record.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Builds the record from a world matrix and tint.
    pub fn new(world: &Mat4, output_color: LinearRgba) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            output_color,
        }
    }
}
