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

//! Defines the `Mat4` type and associated operations.

use super::{Vec3, Vec4};
use std::ops::{Mul, MulAssign};

/// A 4x4 column-major matrix.
///
/// This is the type used for world transforms. Vectors are treated as columns,
/// so `a * b` applied to a point `p` computes `a * (b * p)`: the right-hand
/// factor acts on the point first.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4 {
            x: self.cols[0].get(index),
            y: self.cols[1].get(index),
            z: self.cols[2].get(index),
            w: self.cols[3].get(index),
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::new(v.x, v.y, v.z, 1.0))
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a rotation from Euler angles.
    ///
    /// The roll (about Z) is applied first, then the pitch (about X), then the
    /// yaw (about Y).
    #[inline]
    pub fn from_rotation_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self::from_rotation_y(yaw) * Self::from_rotation_x(pitch) * Self::from_rotation_z(roll)
    }

    /// Transforms a point (implicit `w = 1`), dropping the resulting `w`.
    #[inline]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(p, 1.0)).truncate()
    }

    /// Returns the matrix as a column-major nested array, ready for GPU upload.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols.map(|c| [c.x, c.y, c.z, c.w])
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`.
    ///
    /// Matrix multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result_cols = [Vec4::ZERO; 4];
        for (target, col_from_rhs) in result_cols.iter_mut().zip(rhs.cols) {
            *target = Vec4 {
                x: self.get_row(0).dot(col_from_rhs),
                y: self.get_row(1).dot(col_from_rhs),
                z: self.get_row(2).dot(col_from_rhs),
                w: self.get_row(3).dot(col_from_rhs),
            };
        }
        Mat4 { cols: result_cols }
    }
}

impl MulAssign<Mat4> for Mat4 {
    /// Right-multiplies in place: `self = self * rhs`.
    #[inline]
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2, PI};

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn mat4_approx_eq(a: Mat4, b: Mat4) -> bool {
        (0..4).all(|c| (0..4).all(|r| approx_eq(a.cols[c].get(r), b.cols[c].get(r))))
    }

    #[test]
    fn test_mat4_identity_default() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::from_scale(Vec3::new(1.0, 2.0, 3.0));
        assert!(mat4_approx_eq(m * Mat4::IDENTITY, m));
        assert!(mat4_approx_eq(Mat4::IDENTITY * m, m));
    }

    #[test]
    fn test_mat4_rotations() {
        let angle = PI / 6.0;

        let p = Mat4::from_rotation_x(angle).transform_point3(Vec3::Y);
        assert!(vec3_approx_eq(p, Vec3::new(0.0, angle.cos(), angle.sin())));

        let p = Mat4::from_rotation_y(angle).transform_point3(Vec3::X);
        assert!(vec3_approx_eq(p, Vec3::new(angle.cos(), 0.0, -angle.sin())));

        let p = Mat4::from_rotation_z(angle).transform_point3(Vec3::X);
        assert!(vec3_approx_eq(p, Vec3::new(angle.cos(), angle.sin(), 0.0)));
    }

    #[test]
    fn test_mat4_translation_and_scale() {
        let t = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0));
        assert!(vec3_approx_eq(t.transform_point3(Vec3::ONE), Vec3::new(2.0, -1.0, 4.0)));

        let s = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));
        assert!(vec3_approx_eq(s.transform_point3(Vec3::ONE), Vec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_mat4_pitch_yaw_roll_order() {
        // Roll a quarter turn moves X onto Y, then yaw a quarter turn leaves Y alone.
        let m = Mat4::from_rotation_pitch_yaw_roll(0.0, FRAC_PI_2, FRAC_PI_2);
        assert!(vec3_approx_eq(m.transform_point3(Vec3::X), Vec3::Y));

        let only_pitch = Mat4::from_rotation_pitch_yaw_roll(0.3, 0.0, 0.0);
        assert!(mat4_approx_eq(only_pitch, Mat4::from_rotation_x(0.3)));
    }

    #[test]
    fn test_mat4_mul_assign_right_multiplies() {
        let a = Mat4::from_rotation_z(0.4);
        let b = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let mut m = a;
        m *= b;
        assert!(mat4_approx_eq(m, a * b));
        assert!(!mat4_approx_eq(m, b * a));
    }

    #[test]
    fn test_mat4_cols_array_keeps_translation_last() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.to_cols_array_2d()[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(m.get_row(0).w, 1.0);
    }
}
