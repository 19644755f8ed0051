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

//! The contract through which renderables read their CPU-side mesh data.

use crate::vertex::{Index, SimpleVertex};

/// Supplies the vertex and index arrays of a renderable.
///
/// Procedural primitives and imported models implement this differently, but
/// the renderable only ever reads through it; it never mutates the arrays.
/// Indices are absolute positions in [`vertices`](Self::vertices) and are
/// consumed three at a time as a triangle list.
///
/// The counts may be smaller than the arrays; only the leading
/// `vertex_count()` vertices and `index_count()` indices are used. A count
/// larger than its array makes `initialize` fail.
pub trait GeometrySource {
    /// The full vertex array.
    fn vertices(&self) -> &[SimpleVertex];

    /// The full index array.
    fn indices(&self) -> &[Index];

    /// Number of vertices.
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Number of indices.
    fn index_count(&self) -> usize {
        self.indices().len()
    }
}

impl<G: GeometrySource + ?Sized> GeometrySource for Box<G> {
    fn vertices(&self) -> &[SimpleVertex] {
        (**self).vertices()
    }

    fn indices(&self) -> &[Index] {
        (**self).indices()
    }

    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn index_count(&self) -> usize {
        (**self).index_count()
    }
}
