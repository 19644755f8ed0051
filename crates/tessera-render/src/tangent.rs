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

//! Tangent-space generation for normal mapping.
//!
//! Each triangle yields one tangent/bitangent pair from its edge vectors and
//! UV deltas. The pair is written to all three of the triangle's vertices, so a
//! vertex shared by several triangles ends up with the basis of the last
//! triangle that references it, in index order. No averaging takes place.

use crate::settings::DegenerateTangentPolicy;
use crate::vertex::{Index, NormalData, SimpleVertex};
use tessera_core::math::{Vec3, EPSILON};

/// Computes the tangent frame of one triangle with no guard against
/// degenerate input.
///
/// A zero UV determinant or collinear positions yield `inf`/`NaN` components.
pub fn triangle_tangent_basis(
    v0: &SimpleVertex,
    v1: &SimpleVertex,
    v2: &SimpleVertex,
) -> NormalData {
    let e1 = v1.position - v0.position;
    let e2 = v2.position - v0.position;

    let duv1 = v1.tex_coord - v0.tex_coord;
    let duv2 = v2.tex_coord - v0.tex_coord;

    let r = 1.0 / (duv1.x * duv2.y - duv2.x * duv1.y);

    let tangent = (e1 * duv2.y - e2 * duv1.y) * r;
    let bitangent = (e2 * duv1.x - e1 * duv2.x) * r;

    NormalData::new(tangent.normalize_unchecked(), bitangent.normalize_unchecked())
}

/// Returns `true` when the UV edges are too short or too close to parallel
/// to define a tangent direction.
///
/// The determinant is measured relative to the UV edge lengths.
fn has_degenerate_uvs(v0: &SimpleVertex, v1: &SimpleVertex, v2: &SimpleVertex) -> bool {
    let duv1 = v1.tex_coord - v0.tex_coord;
    let duv2 = v2.tex_coord - v0.tex_coord;
    let det = duv1.x * duv2.y - duv2.x * duv1.y;
    let scale = duv1.x.hypot(duv1.y) * duv2.x.hypot(duv2.y);
    det.is_nan() || det.abs() <= EPSILON * scale
}

/// An orthonormal frame lying in the triangle's plane.
///
/// Falls back to the X and Y axes when the triangle has no area.
fn fallback_basis(v0: &SimpleVertex, v1: &SimpleVertex, v2: &SimpleVertex) -> NormalData {
    let face_normal = (v1.position - v0.position)
        .cross(v2.position - v0.position)
        .normalize_unchecked();
    if !face_normal.is_finite() {
        return NormalData::new(Vec3::X, Vec3::Y);
    }

    let axis = if face_normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let tangent = (axis - face_normal * axis.dot(face_normal)).normalize();
    let bitangent = face_normal.cross(tangent);
    NormalData::new(tangent, bitangent)
}

/// Builds one [`NormalData`] entry per vertex from a triangle list.
///
/// `indices` is consumed three at a time; a trailing partial triangle is
/// ignored. Triangles referencing a vertex outside `vertices` are skipped.
/// Vertices not referenced by any triangle keep an all-zero frame.
pub fn generate_normal_data(
    vertices: &[SimpleVertex],
    indices: &[Index],
    policy: DegenerateTangentPolicy,
) -> Vec<NormalData> {
    let mut normal_data = vec![NormalData::default(); vertices.len()];
    let mut degenerate = 0usize;
    let mut skipped = 0usize;

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            usize::from(triangle[0]),
            usize::from(triangle[1]),
            usize::from(triangle[2]),
        ];
        let (Some(v0), Some(v1), Some(v2)) =
            (vertices.get(i0), vertices.get(i1), vertices.get(i2))
        else {
            skipped += 1;
            continue;
        };

        let mut basis = triangle_tangent_basis(v0, v1, v2);
        if !basis.is_finite() || has_degenerate_uvs(v0, v1, v2) {
            degenerate += 1;
            if policy == DegenerateTangentPolicy::Fallback {
                basis = fallback_basis(v0, v1, v2);
            }
        }

        normal_data[i0] = basis;
        normal_data[i1] = basis;
        normal_data[i2] = basis;
    }

    if degenerate > 0 {
        log::warn!(
            "Tangent generation: {degenerate} degenerate triangle(s) ({policy:?} policy)"
        );
    }
    if skipped > 0 {
        log::warn!(
            "Tangent generation: skipped {skipped} triangle(s) indexing past {} vertices",
            vertices.len()
        );
    }
    log::trace!(
        "Tangent generation: {} triangle(s) over {} vertices",
        indices.len() / 3,
        vertices.len()
    );

    normal_data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tessera_core::math::{Vec2, EPSILON};

    fn vertex(x: f32, y: f32, z: f32, u: f32, v: f32) -> SimpleVertex {
        SimpleVertex::new(Vec3::new(x, y, z), Vec2::new(u, v), Vec3::Z)
    }

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = EPSILON);
        assert_abs_diff_eq!(a.y, b.y, epsilon = EPSILON);
        assert_abs_diff_eq!(a.z, b.z, epsilon = EPSILON);
    }

    #[test]
    fn test_axis_aligned_triangle_follows_uv_axes() {
        // U grows along +X, V grows along +Y.
        let basis = triangle_tangent_basis(
            &vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            &vertex(2.0, 0.0, 0.0, 1.0, 0.0),
            &vertex(0.0, 3.0, 0.0, 0.0, 1.0),
        );
        assert_vec3_eq(basis.tangent, Vec3::X);
        assert_vec3_eq(basis.bitangent, Vec3::Y);
    }

    #[test]
    fn test_skewed_triangle_produces_unit_vectors() {
        let basis = triangle_tangent_basis(
            &vertex(0.1, -0.4, 0.3, 0.2, 0.1),
            &vertex(1.7, 0.2, -0.5, 0.9, 0.3),
            &vertex(-0.3, 1.1, 0.8, 0.4, 0.8),
        );
        assert_abs_diff_eq!(basis.tangent.length(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(basis.bitangent.length(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_mirrored_uvs_flip_the_tangent() {
        let basis = triangle_tangent_basis(
            &vertex(0.0, 0.0, 0.0, 1.0, 0.0),
            &vertex(1.0, 0.0, 0.0, 0.0, 0.0),
            &vertex(0.0, 1.0, 0.0, 1.0, 1.0),
        );
        assert_vec3_eq(basis.tangent, -Vec3::X);
        assert_vec3_eq(basis.bitangent, Vec3::Y);
    }

    #[test]
    fn test_shared_vertices_take_the_last_triangle() {
        // Quad split along the 1-2 diagonal; the second triangle has rotated UVs.
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 1.0),
            vertex(1.0, 1.0, 0.0, 0.0, 0.0),
        ];
        let indices: [Index; 6] = [0, 1, 2, 2, 1, 3];

        let data = generate_normal_data(&vertices, &indices, DegenerateTangentPolicy::Fallback);
        let first = triangle_tangent_basis(&vertices[0], &vertices[1], &vertices[2]);
        let second = triangle_tangent_basis(&vertices[2], &vertices[1], &vertices[3]);
        assert_ne!(first, second);

        assert_eq!(data[0], first);
        assert_eq!(data[1], second);
        assert_eq!(data[2], second);
        assert_eq!(data[3], second);
    }

    #[test]
    fn test_output_matches_vertex_count_and_unreferenced_vertices_stay_zero() {
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 1.0),
            vertex(5.0, 5.0, 5.0, 0.5, 0.5),
        ];
        // The trailing pair of indices is not a full triangle.
        let data = generate_normal_data(
            &vertices,
            &[0, 1, 2, 3, 0],
            DegenerateTangentPolicy::Fallback,
        );
        assert_eq!(data.len(), 4);
        assert_eq!(data[3], NormalData::default());
    }

    #[test]
    fn test_duplicate_uvs_propagate_non_finite_values() {
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.5, 0.5),
            vertex(1.0, 0.0, 0.0, 0.5, 0.5),
            vertex(0.0, 1.0, 0.0, 0.5, 0.5),
        ];
        let data =
            generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Propagate);
        assert!(data.iter().all(|d| !d.is_finite()));
    }

    #[test]
    fn test_duplicate_uvs_fall_back_to_an_in_plane_basis() {
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.5, 0.5),
            vertex(1.0, 0.0, 0.0, 0.5, 0.5),
            vertex(0.0, 1.0, 0.0, 0.5, 0.5),
        ];
        let data = generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Fallback);
        for d in &data {
            assert!(d.is_finite());
            assert_abs_diff_eq!(d.tangent.length(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.bitangent.length(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.tangent.dot(d.bitangent), 0.0, epsilon = EPSILON);
            // The face normal is +Z, so the frame lies in the XY plane.
            assert_abs_diff_eq!(d.tangent.z, 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.bitangent.z, 0.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_near_collinear_uvs_use_the_fallback() {
        // UV determinant of 1e-7: finite, but the tangent direction is noise.
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 2.0, 1e-7),
        ];
        let unguarded = triangle_tangent_basis(&vertices[0], &vertices[1], &vertices[2]);
        assert!(unguarded.is_finite());

        let propagated =
            generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Propagate);
        assert_eq!(propagated[0], unguarded);

        let data = generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Fallback);
        assert_ne!(data[0], unguarded);
        assert_vec3_eq(data[0].tangent, Vec3::X);
        assert_vec3_eq(data[0].bitangent, Vec3::Y);
    }

    #[test]
    fn test_small_triangle_fallback_stays_in_face_plane() {
        // A 2e-3 triangle in the YZ plane with duplicate UVs.
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.5, 0.5),
            vertex(0.0, 2e-3, 0.0, 0.5, 0.5),
            vertex(0.0, 0.0, 2e-3, 0.5, 0.5),
        ];
        let data = generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Fallback);
        for d in &data {
            assert_abs_diff_eq!(d.tangent.x, 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.bitangent.x, 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.tangent.length(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(d.bitangent.length(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_zero_area_triangle_falls_back_to_axes() {
        let p = vertex(1.0, 1.0, 1.0, 0.0, 0.0);
        let vertices = [p, p, p];
        let data = generate_normal_data(&vertices, &[0, 1, 2], DegenerateTangentPolicy::Fallback);
        assert_eq!(data[0], NormalData::new(Vec3::X, Vec3::Y));
    }

    #[test]
    fn test_out_of_range_triangles_are_skipped() {
        let vertices = [
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 1.0),
        ];
        let data = generate_normal_data(
            &vertices,
            &[0, 1, 2, 0, 1, 9],
            DegenerateTangentPolicy::Fallback,
        );
        assert_vec3_eq(data[0].tangent, Vec3::X);
        assert_eq!(data.len(), 3);
    }
}
