//! The scene eye.
//!
//! A perspective view of the reconstruction that can align itself with
//! any active camera, so the browser shows the scene as the subject saw
//! it from that frame.

use glam::{Mat4, Vec3};

use gazescope_geometry::frustum::Frustum;

/// The viewer's eye: look-at parameters plus a perspective projection.
#[derive(Debug, Clone)]
pub struct Eye {
    /// Eye position in world space.
    pub center: Vec3,
    /// Point the eye is looking at.
    pub focus: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical aperture in degrees.
    pub aperture: f32,
    /// Zoom factor applied to the aperture.
    pub zoom: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Eye {
    /// Creates an eye just behind the origin looking forward.
    #[must_use]
    pub fn new() -> Self {
        Self {
            center: Vec3::new(0.0, 0.0, -1.0),
            focus: Vec3::ZERO,
            up: Vec3::Y,
            aperture: 35.0,
            zoom: 1.0,
            near: 0.01,
            far: 100.0,
        }
    }

    /// Aligns the eye with a reconstructed camera's frustum.
    ///
    /// `offset` is the scene recentering translation, usually the point
    /// cloud's centroid offset. The aperture widens to the camera's
    /// full field of view.
    pub fn align_to(&mut self, frustum: &Frustum, offset: Vec3) {
        self.aperture = 2.0 * frustum.half_angle().to_degrees();
        self.center = frustum.apex() + offset;
        self.focus = frustum.forward() + offset;
        self.up = frustum.up() - frustum.apex();
    }

    /// Returns the right-handed look-at view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.center, self.focus, self.up)
    }

    /// Returns the perspective projection for the current aperture and
    /// zoom, with the GL depth convention.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            (self.aperture * self.zoom).to_radians(),
            aspect,
            self.near,
            self.far,
        )
    }
}

impl Default for Eye {
    fn default() -> Self {
        Self::new()
    }
}
