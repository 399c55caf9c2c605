//! Projection-matrix factorization.
//!
//! A full 3x4 projection matrix `P = K[R|t]` can be factored into an
//! upper-triangular intrinsics matrix and an orthonormal rotation by RQ
//! decomposition. The frustum builder uses this to recover a focal
//! length when the calibration block carried none.

use glam::{Mat3, Vec2, Vec3, Vec4};

use gazescope_core::error::{GazescopeError, Result};

/// A full 3x4 projection matrix, stored as three rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionMatrix(pub [[f32; 4]; 3]);

impl ProjectionMatrix {
    /// Projects a world point to image coordinates, normalizing the
    /// homogeneous result.
    pub fn project(&self, point: Vec3) -> Result<Vec2> {
        let h = point.extend(1.0);
        let u = Vec4::from_array(self.0[0]).dot(h);
        let v = Vec4::from_array(self.0[1]).dot(h);
        let w = Vec4::from_array(self.0[2]).dot(h);
        if w.abs() <= f32::EPSILON {
            return Err(GazescopeError::ProjectionOnCameraPlane);
        }
        Ok(Vec2::new(u / w, v / w))
    }

    /// Upper-left 3x3 block.
    fn inner(&self) -> Mat3 {
        let [r0, r1, r2] = &self.0;
        Mat3::from_cols(
            Vec3::new(r0[0], r1[0], r2[0]),
            Vec3::new(r0[1], r1[1], r2[1]),
            Vec3::new(r0[2], r1[2], r2[2]),
        )
    }

    /// Fourth column.
    fn offset(&self) -> Vec3 {
        Vec3::new(self.0[0][3], self.0[1][3], self.0[2][3])
    }
}

/// A projection matrix factored into `K[R|t]`.
#[derive(Debug, Clone, Copy)]
pub struct FactoredCamera {
    /// Intrinsics (upper-triangular, positive diagonal).
    pub intrinsics: Mat3,
    /// Rotation (orthonormal, determinant +1).
    pub rotation: Mat3,
    /// Translation in camera coordinates.
    pub translation: Vec3,
}

impl FactoredCamera {
    /// Focal length in pixels along x.
    #[must_use]
    pub fn focal_x(&self) -> f32 {
        self.intrinsics.x_axis.x
    }

    /// Focal length in pixels along y.
    #[must_use]
    pub fn focal_y(&self) -> f32 {
        self.intrinsics.y_axis.y
    }
}

fn elem(m: &Mat3, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

/// RQ decomposition of a 3x3 matrix into upper-triangular `K` and
/// orthonormal `Q` with `M = K * Q`, via three Givens rotations.
pub fn rq3(m: Mat3) -> Result<(Mat3, Mat3)> {
    let degenerate = || GazescopeError::Degenerate("singular matrix has no RQ factorization".into());

    // Rotate about x to zero the (2,1) entry.
    let d = elem(&m, 2, 1).hypot(elem(&m, 2, 2));
    if d <= f32::EPSILON {
        return Err(degenerate());
    }
    let (c, s) = (elem(&m, 2, 2) / d, -elem(&m, 2, 1) / d);
    let qx = Mat3::from_cols(Vec3::X, Vec3::new(0.0, c, s), Vec3::new(0.0, -s, c));
    let m1 = m * qx;

    // Rotate about y to zero the (2,0) entry.
    let d = elem(&m1, 2, 0).hypot(elem(&m1, 2, 2));
    if d <= f32::EPSILON {
        return Err(degenerate());
    }
    let (c, s) = (elem(&m1, 2, 2) / d, elem(&m1, 2, 0) / d);
    let qy = Mat3::from_cols(Vec3::new(c, 0.0, -s), Vec3::Y, Vec3::new(s, 0.0, c));
    let m2 = m1 * qy;

    // Rotate about z to zero the (1,0) entry.
    let d = elem(&m2, 1, 0).hypot(elem(&m2, 1, 1));
    if d <= f32::EPSILON {
        return Err(degenerate());
    }
    let (c, s) = (elem(&m2, 1, 1) / d, -elem(&m2, 1, 0) / d);
    let qz = Mat3::from_cols(Vec3::new(c, s, 0.0), Vec3::new(-s, c, 0.0), Vec3::Z);
    let k = m2 * qz;

    let q = (qx * qy * qz).transpose();
    Ok((k, q))
}

/// Factors a projection matrix into intrinsics, rotation, and
/// translation.
///
/// The diagonal of the intrinsics matrix is made positive (a focal
/// length is positive), and the rotation is flipped onto determinant +1
/// together with the translation when necessary.
pub fn factor_projection(projection: &ProjectionMatrix) -> Result<FactoredCamera> {
    let (k, q) = rq3(projection.inner())?;

    let signs = Mat3::from_diagonal(Vec3::new(
        k.x_axis.x.signum(),
        k.y_axis.y.signum(),
        k.z_axis.z.signum(),
    ));
    let intrinsics = k * signs;
    let mut rotation = signs * q; // the sign matrix is its own inverse
    let mut translation = intrinsics.inverse() * projection.offset();

    if rotation.determinant() < 0.0 {
        rotation = -rotation;
        translation = -translation;
    }

    Ok(FactoredCamera {
        intrinsics,
        rotation,
        translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_triangular(fx: f32, fy: f32, skew: f32, cx: f32, cy: f32) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(fx, 0.0, 0.0),
            Vec3::new(skew, fy, 0.0),
            Vec3::new(cx, cy, 1.0),
        )
    }

    fn projection_from(k: Mat3, r: Mat3, t: Vec3) -> ProjectionMatrix {
        let m = k * r;
        let kt = k * t;
        let row = |i: usize| [elem(&m, i, 0), elem(&m, i, 1), elem(&m, i, 2), kt[i]];
        ProjectionMatrix([row(0), row(1), row(2)])
    }

    fn assert_close(a: f32, b: f32) {
        assert!(
            (a - b).abs() <= 1e-3 * b.abs().max(1.0),
            "{a} != {b} within tolerance"
        );
    }

    fn assert_mat_close(a: Mat3, b: Mat3) {
        for col in 0..3 {
            for row in 0..3 {
                assert_close(elem(&a, row, col), elem(&b, row, col));
            }
        }
    }

    #[test]
    fn test_rq3_reconstructs_input() {
        let k = upper_triangular(800.0, 780.0, 1.5, 320.0, 240.0);
        let r = Mat3::from_euler(glam::EulerRot::XYZ, 0.1, 0.2, -0.05);
        let m = k * r;

        let (k_est, q_est) = rq3(m).unwrap();
        assert_mat_close(k_est * q_est, m);
        // Upper triangular below-diagonal entries vanish.
        assert_close(elem(&k_est, 1, 0), 0.0);
        assert_close(elem(&k_est, 2, 0), 0.0);
        assert_close(elem(&k_est, 2, 1), 0.0);
        // Q is orthonormal.
        assert_mat_close(q_est.transpose() * q_est, Mat3::IDENTITY);
    }

    #[test]
    fn test_factor_projection_round_trip() {
        let k = upper_triangular(900.0, 870.0, 0.0, 640.0, 360.0);
        let r = Mat3::from_euler(glam::EulerRot::XYZ, -0.1, 0.05, 0.2);
        let t = Vec3::new(-0.2, 0.1, 1.5);
        let p = projection_from(k, r, t);

        let factored = factor_projection(&p).unwrap();
        assert_close(factored.focal_x(), 900.0);
        assert_close(factored.focal_y(), 870.0);
        assert_mat_close(factored.rotation, r);
        assert!((factored.rotation.determinant() - 1.0).abs() < 1e-3);
        assert!(factored.translation.abs_diff_eq(t, 1e-2));
    }

    #[test]
    fn test_singular_matrix_fails() {
        let p = ProjectionMatrix([[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0; 4]]);
        assert!(matches!(
            factor_projection(&p),
            Err(GazescopeError::Degenerate(_))
        ));
    }

    #[test]
    fn test_project_normalizes() {
        let p = ProjectionMatrix([
            [500.0, 0.0, 320.0, 0.0],
            [0.0, 500.0, 240.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let uv = p.project(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(uv.abs_diff_eq(Vec2::new(320.0, 240.0), 1e-4));

        let uv = p.project(Vec3::new(1.0, 0.0, 2.0)).unwrap();
        assert!(uv.abs_diff_eq(Vec2::new(570.0, 240.0), 1e-4));
    }

    #[test]
    fn test_project_on_camera_plane_fails() {
        let p = ProjectionMatrix([
            [500.0, 0.0, 320.0, 0.0],
            [0.0, 500.0, 240.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        assert!(matches!(
            p.project(Vec3::new(1.0, 1.0, 0.0)),
            Err(GazescopeError::ProjectionOnCameraPlane)
        ));
    }
}
