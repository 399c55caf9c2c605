//! Virtual trackball for 3D scene viewing.
//!
//! Cursor drags are projected onto a sphere in the center of the
//! viewport, deformed into a hyperbolic sheet away from the center so
//! rotation stays well behaved near the edges.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

const TRACKBALL_SIZE: f32 = 0.8;
const RENORM_COUNT: u32 = 97;

/// A virtual trackball mapping 2D cursor drags to 3D rotations, with
/// pan and zoom state for the model-view transform.
#[derive(Debug, Clone)]
pub struct Trackball {
    rotation: Quat,
    zoom: f32,
    distance: u32,
    pan: Vec2,
    aperture: f32,
    near: f32,
    far: f32,
    count: u32,
}

impl Trackball {
    /// Creates a trackball with the identity orientation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            zoom: 1.0,
            distance: 3,
            pan: Vec2::ZERO,
            aperture: 35.0,
            near: 0.1,
            far: 1000.0,
            count: 0,
        }
    }

    /// Creates a trackball with an initial orientation in degrees.
    #[must_use]
    pub fn with_orientation(theta: f32, phi: f32) -> Self {
        let mut trackball = Self::new();
        trackball.set_orientation(theta, phi);
        trackball
    }

    /// Moves the view from `(x, y)` to `(x + dx, y + dy)`, in pixels.
    ///
    /// A zero delta leaves the orientation untouched. The accumulated
    /// quaternion is renormalized every 97 updates to counter
    /// floating-point drift.
    pub fn drag(&mut self, x: f32, y: f32, dx: f32, dy: f32, viewport: Vec2) {
        let xn = (x * 2.0 - viewport.x) / viewport.x;
        let dxn = 2.0 * dx / viewport.x;
        let yn = (y * 2.0 - viewport.y) / viewport.y;
        let dyn_ = 2.0 * dy / viewport.y;
        let q = drag_rotation(xn, yn, dxn, dyn_);
        self.rotation = accumulate(q, self.rotation);
        self.count += 1;
        if self.count > RENORM_COUNT {
            self.rotation = self.rotation.normalize();
            self.count = 0;
        }
    }

    /// Zooms by a vertical drag of `dy` pixels.
    pub fn zoom_by(&mut self, dy: f32, viewport_height: f32) {
        self.set_zoom(self.zoom - 5.0 * dy / viewport_height);
    }

    /// Pans by a drag delta, with a finer step while zoomed in.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let step = if self.zoom < 1.0 { 0.005 } else { 0.01 };
        self.pan.x += dx * step;
        self.pan.y += dy * step;
    }

    /// Returns the accumulated orientation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Returns the zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Sets the zoom factor, clamped to `[0.25, 100]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.25, 100.0);
    }

    /// Returns the scene distance from the point of view.
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Sets the scene distance, clamped to at least 1.
    pub fn set_distance(&mut self, distance: u32) {
        self.distance = distance.max(1);
    }

    /// Returns the pan offset.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Returns the aperture in degrees.
    #[must_use]
    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    /// Sets the aperture in degrees.
    pub fn set_aperture(&mut self, aperture: f32) {
        self.aperture = aperture;
    }

    /// Returns the near clipping plane.
    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Sets the near clipping plane.
    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    /// Returns the far clipping plane.
    #[must_use]
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Sets the far clipping plane.
    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    /// Returns the orientation as `(theta, phi)` angles in degrees:
    /// theta around the scene's x axis, phi around its z axis.
    #[must_use]
    pub fn orientation(&self) -> (f32, f32) {
        let q = self.rotation;
        let ax = (2.0 * (q.x * q.y + q.z * q.w) / (1.0 - 2.0 * (q.y * q.y + q.z * q.z)))
            .atan()
            .to_degrees();
        let az = (2.0 * (q.x * q.w + q.y * q.z) / (1.0 - 2.0 * (q.z * q.z + q.w * q.w)))
            .atan()
            .to_degrees();
        (-az, ax)
    }

    /// Sets the orientation from `(theta, phi)` angles in degrees.
    pub fn set_orientation(&mut self, theta: f32, phi: f32) {
        let angle = theta.to_radians();
        let xrot = Quat::from_xyzw((0.5 * angle).sin(), 0.0, 0.0, (0.5 * angle).cos());
        let angle = phi.to_radians();
        let zrot = Quat::from_xyzw(0.0, 0.0, (0.5 * angle).sin(), (0.5 * angle).cos());
        self.rotation = accumulate(xrot, zrot);
    }

    /// Sets theta, wrapping both angles into a full turn.
    pub fn set_theta(&mut self, theta: f32) {
        let (_, phi) = self.orientation();
        self.set_orientation(theta % 360.0, phi % 360.0);
    }

    /// Sets phi, wrapping both angles into a full turn.
    pub fn set_phi(&mut self, phi: f32) {
        let (theta, _) = self.orientation();
        self.set_orientation(theta % 360.0, phi % 360.0);
    }

    /// Returns the rotation part of the model-view transform.
    #[must_use]
    pub fn rotation_matrix(&self) -> Mat4 {
        rotation_matrix(self.rotation)
    }

    /// Returns the model-view transform: pan, back off by the scene
    /// distance, then rotate.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.pan.x, self.pan.y, -(self.distance as f32)))
            * self.rotation_matrix()
    }

    /// Returns the perspective projection for the current aperture,
    /// zoom, and clipping planes.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let top = (self.aperture * 0.5).to_radians().tan() * self.near * self.zoom;
        let bottom = -top;
        let left = aspect * bottom;
        let right = aspect * top;
        frustum_matrix(left, right, bottom, top, self.near, self.far)
    }
}

impl Default for Trackball {
    fn default() -> Self {
        Self::new()
    }
}

/// Projects a viewport point onto a sphere of radius `r`, or onto a
/// hyperbolic sheet when the point is away from the sphere's center.
fn project_to_sphere(r: f32, x: f32, y: f32) -> f32 {
    let d = (x * x + y * y).sqrt();
    if d < r * std::f32::consts::FRAC_1_SQRT_2 {
        (r * r - d * d).sqrt()
    } else {
        let t = r * std::f32::consts::FRAC_1_SQRT_2;
        t * t / d
    }
}

/// Returns the incremental rotation for a drag between two normalized
/// viewport points. A zero delta is the identity.
fn drag_rotation(x: f32, y: f32, dx: f32, dy: f32) -> Quat {
    if dx == 0.0 && dy == 0.0 {
        return Quat::IDENTITY;
    }
    let last = Vec3::new(x, y, project_to_sphere(TRACKBALL_SIZE, x, y));
    let new = Vec3::new(
        x + dx,
        y + dy,
        project_to_sphere(TRACKBALL_SIZE, x + dx, y + dy),
    );
    let axis = new.cross(last);
    let t = ((last - new).length() / (2.0 * TRACKBALL_SIZE)).clamp(-1.0, 1.0);
    let phi = 2.0 * t.asin();
    axis_angle(axis, phi)
}

fn axis_angle(axis: Vec3, phi: f32) -> Quat {
    let length = axis.length();
    let unit = if length > 0.0 { axis / length } else { axis };
    let v = unit * (0.5 * phi).sin();
    Quat::from_xyzw(v.x, v.y, v.z, (0.5 * phi).cos())
}

/// Composes an incremental rotation onto `base`.
///
/// Note: the cross term uses the reversed operand order, so composing
/// with `Quat` multiplication instead changes the accumulated
/// orientation.
fn accumulate(q: Quat, base: Quat) -> Quat {
    let v1 = Vec3::new(q.x, q.y, q.z);
    let v2 = Vec3::new(base.x, base.y, base.z);
    let v = v1 * base.w + v2 * q.w + v2.cross(v1);
    Quat::from_xyzw(v.x, v.y, v.z, q.w * base.w - v1.dot(v2))
}

/// Quaternion to rotation matrix, in the column layout the view
/// transform consumes.
fn rotation_matrix(q: Quat) -> Mat4 {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);
    let mut m = [0.0_f32; 16];
    m[0] = 1.0 - 2.0 * (y * y + z * z);
    m[1] = 2.0 * (x * y - z * w);
    m[2] = 2.0 * (z * x + y * w);
    m[4] = 2.0 * (x * y + z * w);
    m[5] = 1.0 - 2.0 * (z * z + x * x);
    m[6] = 2.0 * (y * z - x * w);
    m[8] = 2.0 * (z * x - y * w);
    m[9] = 2.0 * (y * z + x * w);
    m[10] = 1.0 - 2.0 * (y * y + x * x);
    m[15] = 1.0;
    Mat4::from_cols_array(&m)
}

/// Off-center perspective frustum with the GL depth convention.
fn frustum_matrix(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(2.0 * near / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near / (top - bottom), 0.0, 0.0),
        Vec4::new(
            (right + left) / (right - left),
            (top + bottom) / (top - bottom),
            -(far + near) / (far - near),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, -2.0 * far * near / (far - near), 0.0),
    )
}
