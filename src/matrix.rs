//! 4x4 matrix primitives
//!
//! Matrices are stored column-major: element (row, col) lives at
//! `data[col * 4 + row]`, so translation occupies indices 12, 13 and 14.
//! The `reuse_*_command` builders write a single operation into a
//! caller-supplied matrix, which is expected to start out as identity.

use serde::{Deserialize, Serialize};

/// A 4x4 transformation matrix stored in column-major order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix4 {
    /// Matrix data in column-major order: [col0, col1, col2, col3]
    pub data: [f64; 16],
}

impl Matrix4 {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [
            1.0, 0.0, 0.0, 0.0, // col 0
            0.0, 1.0, 0.0, 0.0, // col 1
            0.0, 0.0, 1.0, 0.0, // col 2
            0.0, 0.0, 0.0, 1.0, // col 3
        ],
    };

    /// Create an identity matrix
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build a matrix from 16 column-major values.
    ///
    /// Returns `None` unless exactly 16 values are given.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let data: [f64; 16] = values.try_into().ok()?;
        Some(Self { data })
    }

    /// Embed a 2D affine 3x3 matrix (column-major) into a 4x4 matrix.
    ///
    /// The homogeneous row and column of the 3x3 map onto the W row and
    /// column; the Z axis is left untouched.
    pub fn from_affine_2d(m: &[f64; 9]) -> Self {
        Self {
            data: [
                m[0], m[1], 0.0, m[2], // col 0
                m[3], m[4], 0.0, m[5], // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                m[6], m[7], 0.0, m[8], // col 3
            ],
        }
    }

    /// Element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    /// Multiply `a × b` and store the product in `out`.
    pub fn multiply_into(out: &mut Matrix4, a: &Matrix4, b: &Matrix4) {
        let a = &a.data;
        let b = &b.data;

        // out[r][c] = sum(a[r][k] * b[k][c]), column-major indexing
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[k * 4 + row] * b[col * 4 + k];
                }
                out.data[col * 4 + row] = sum;
            }
        }
    }

    /// Return `self × other`.
    ///
    /// When transforming points, `other` is applied first, then `self`.
    pub fn multiply(&self, other: &Matrix4) -> Matrix4 {
        let mut out = Matrix4::IDENTITY;
        Self::multiply_into(&mut out, self, other);
        out
    }

    /// Post-multiply in place: `self = self × other`.
    pub fn post_multiply(&mut self, other: &Matrix4) {
        let accumulated = *self;
        Self::multiply_into(self, &accumulated, other);
    }

    /// Write a rotation about the Z axis.
    pub fn reuse_rotate_z_command(&mut self, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        self.data[0] = cos;
        self.data[1] = sin;
        self.data[4] = -sin;
        self.data[5] = cos;
    }

    /// Write a uniform scale on X, Y and Z.
    pub fn reuse_scale_command(&mut self, factor: f64) {
        self.data[0] = factor;
        self.data[5] = factor;
        self.data[10] = factor;
    }

    pub fn reuse_scale_x_command(&mut self, factor: f64) {
        self.data[0] = factor;
    }

    pub fn reuse_scale_y_command(&mut self, factor: f64) {
        self.data[5] = factor;
    }

    pub fn reuse_translate_2d_command(&mut self, x: f64, y: f64) {
        self.data[12] = x;
        self.data[13] = y;
    }

    pub fn reuse_translate_3d_command(&mut self, x: f64, y: f64, z: f64) {
        self.data[12] = x;
        self.data[13] = y;
        self.data[14] = z;
    }

    /// Transform a 3D point (w = 1) by this matrix
    pub fn transform_point(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let d = &self.data;
        let w = d[3] * x + d[7] * y + d[11] * z + d[15];
        let w = if w == 0.0 { 1.0 } else { w };
        (
            (d[0] * x + d[4] * y + d[8] * z + d[12]) / w,
            (d[1] * x + d[5] * y + d[9] * z + d[13]) / w,
            (d[2] * x + d[6] * y + d[10] * z + d[14]) / w,
        )
    }

    /// Get the rows of the matrix, top to bottom
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for row in 0..4 {
            for col in 0..4 {
                rows[row][col] = self.get(row, col);
            }
        }
        rows
    }

    /// Compare element-wise within `epsilon`.
    pub fn approx_eq(&self, other: &Matrix4, epsilon: f64) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Check if this is the identity matrix
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// True when any element is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.is_finite())
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn translated(x: f64, y: f64) -> Matrix4 {
        let mut m = Matrix4::identity();
        m.reuse_translate_2d_command(x, y);
        m
    }

    fn rotated(radians: f64) -> Matrix4 {
        let mut m = Matrix4::identity();
        m.reuse_rotate_z_command(radians);
        m
    }

    #[test]
    fn test_identity() {
        let m = Matrix4::identity();
        assert_eq!(m, Matrix4::IDENTITY);
        assert!(m.is_identity());
        assert_eq!(Matrix4::default(), Matrix4::IDENTITY);
    }

    #[test]
    fn test_translate_2d() {
        let m = translated(10.0, 20.0);
        assert_eq!(m.data[12], 10.0);
        assert_eq!(m.data[13], 20.0);

        let (x, y, z) = m.transform_point(5.0, 5.0, 0.0);
        assert!(approx_eq(x, 15.0));
        assert!(approx_eq(y, 25.0));
        assert!(approx_eq(z, 0.0));
    }

    #[test]
    fn test_translate_3d() {
        let mut m = Matrix4::identity();
        m.reuse_translate_3d_command(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(0.0, 0.0, 0.0), (1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotate_z() {
        let m = rotated(FRAC_PI_2);
        let (x, y, _) = m.transform_point(1.0, 0.0, 0.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 1.0));
    }

    #[test]
    fn test_scale_uniform_covers_z() {
        let mut m = Matrix4::identity();
        m.reuse_scale_command(2.0);
        assert_eq!(m.transform_point(3.0, 4.0, 5.0), (6.0, 8.0, 10.0));
    }

    #[test]
    fn test_scale_single_axis() {
        let mut sx = Matrix4::identity();
        sx.reuse_scale_x_command(2.0);
        assert_eq!(sx.transform_point(1.0, 1.0, 1.0), (2.0, 1.0, 1.0));

        let mut sy = Matrix4::identity();
        sy.reuse_scale_y_command(3.0);
        assert_eq!(sy.transform_point(1.0, 1.0, 1.0), (1.0, 3.0, 1.0));
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        // translate × rotate: rotate the point, then translate it
        let composed = translated(10.0, 0.0) * rotated(FRAC_PI_2);
        let (x, y, _) = composed.transform_point(1.0, 0.0, 0.0);
        assert!(approx_eq(x, 10.0));
        assert!(approx_eq(y, 1.0));

        let reversed = rotated(FRAC_PI_2) * translated(10.0, 0.0);
        let (x, y, _) = reversed.transform_point(1.0, 0.0, 0.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 11.0));
    }

    #[test]
    fn test_post_multiply_matches_multiply() {
        let a = translated(3.0, -2.0);
        let b = rotated(0.3);
        let mut acc = a;
        acc.post_multiply(&b);
        assert_eq!(acc, a.multiply(&b));
    }

    #[test]
    fn test_multiply_by_identity() {
        let m = rotated(1.2) * translated(4.0, 5.0);
        assert_eq!(m * Matrix4::IDENTITY, m);
        assert_eq!(Matrix4::IDENTITY * m, m);
    }

    #[test]
    fn test_from_slice() {
        let values: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let m = Matrix4::from_slice(&values).unwrap();
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.get(0, 1), 4.0);
        assert!(Matrix4::from_slice(&values[..9]).is_none());
    }

    #[test]
    fn test_from_affine_2d_translation() {
        // 3x3 column-major translation by (7, 8)
        let m = Matrix4::from_affine_2d(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 7.0, 8.0, 1.0]);
        assert_eq!(m, translated(7.0, 8.0));
    }

    #[test]
    fn test_rows() {
        let m = translated(1.0, 2.0);
        let rows = m.rows();
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_approx_eq_and_non_finite() {
        let a = rotated(std::f64::consts::PI);
        let b = rotated(3.14159265);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&Matrix4::IDENTITY, 1e-6));

        let mut nan = Matrix4::identity();
        nan.reuse_scale_command(f64::NAN);
        assert!(nan.has_non_finite());
        assert!(!a.has_non_finite());
    }
}
