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

//! Shared-ownership primitives for data referenced by several renderables.
//!
//! Materials and shaders are owned by whoever created them and aliased by every
//! renderable that uses them. The [`Asset`] marker and [`AssetHandle`] express
//! that contract without tying it to any loading infrastructure.

mod handle;

pub use handle::*;

/// A marker trait for types that can be shared through an [`AssetHandle`].
///
/// The supertraits let a handle cross threads, so setup code may build shared
/// resources on one thread and hand them to the thread owning the device.
///
/// # Examples
///
/// ```
/// use tessera_core::asset::{Asset, AssetHandle};
///
/// struct Texture;
/// impl Asset for Texture {}
///
/// let handle = AssetHandle::new(Texture);
/// let alias = handle.clone();
/// assert!(handle.ptr_eq(&alias));
/// ```
pub trait Asset: Send + Sync + 'static {}
