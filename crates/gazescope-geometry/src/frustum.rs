//! Viewing-frustum and gaze-cone construction.
//!
//! Every active camera gets a pyramid with its apex at the optical
//! center and its base centered on the image plane. Frames with a
//! recorded gaze position additionally get a narrow foveal cone aimed
//! through the gaze point.

use std::f32::consts::PI;

use glam::{Mat3, Vec2, Vec3};

use gazescope_core::error::{GazescopeError, Result};
use gazescope_core::vertex::ShapeVertex;

use crate::factor;
use crate::pose::CameraPose;

/// Half-angle of the foveal gaze cone, in degrees. The fovea spans
/// roughly 1.5 degrees of the visual field.
pub const FOVEAL_HALF_ANGLE_DEG: f32 = 0.75;

/// Cone length used when no cloud points fall inside the cone.
pub const DEFAULT_CONE_LENGTH: f32 = 0.2;

/// Pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A camera viewing pyramid in world space.
///
/// The base corners keep a fixed winding order - bottom left, top left,
/// top right, bottom right - which downstream triangle fans rely on.
#[derive(Debug, Clone)]
pub struct Frustum {
    apex: Vec3,
    corners: [Vec3; 4],
    half_width: f32,
    half_height: f32,
    depth: f32,
    half_angle: f32,
    up: Vec3,
    forward: Vec3,
}

impl Frustum {
    /// Builds the viewing pyramid for a camera.
    ///
    /// `scale` shrinks the image plane into scene units. When the pose
    /// carries no focal length, recovery through an attached projection
    /// matrix is attempted first; with nothing to recover from, this
    /// fails with `MissingIntrinsics`.
    pub fn build(pose: &CameraPose, image: ImageSize, scale: f32) -> Result<Self> {
        if image.width == 0 || image.height == 0 {
            return Err(GazescopeError::Degenerate(format!(
                "image for frame {} has a zero dimension",
                pose.frame()
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GazescopeError::Degenerate(format!(
                "image scale {scale} is not positive"
            )));
        }
        let focal = resolve_focal(pose)?;

        let width = image.width as f32;
        let height = image.height as f32;
        let half_angle = (0.5 * width / scale).atan2(focal);
        let tan_a = half_angle.tan();
        if !tan_a.is_finite() || tan_a <= 0.0 {
            return Err(GazescopeError::Degenerate(format!(
                "field of view for frame {} collapses",
                pose.frame()
            )));
        }

        let half_width = 0.5 * scale * width;
        let half_height = 0.5 * scale * height;
        let depth = half_width / tan_a;

        let local = [
            Vec3::new(-half_width, -half_height, -depth), // base bottom left
            Vec3::new(-half_width, half_height, -depth),  // base top left
            Vec3::new(half_width, half_height, -depth),   // base top right
            Vec3::new(half_width, -half_height, -depth),  // base bottom right
        ];

        Ok(Self {
            apex: pose.to_world(Vec3::ZERO),
            corners: local.map(|p| pose.to_world(p)),
            half_width,
            half_height,
            depth,
            half_angle,
            up: pose.to_world(Vec3::Y),
            forward: pose.to_world(Vec3::new(0.0, 0.0, -depth)),
        })
    }

    /// Returns the apex (the camera's optical center).
    #[must_use]
    pub fn apex(&self) -> Vec3 {
        self.apex
    }

    /// Returns the four base corners in winding order.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 4] {
        self.corners
    }

    /// Returns half the base width.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Returns half the base height.
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Returns the apex-to-base distance.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Returns the horizontal half field-of-view angle in radians.
    #[must_use]
    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    /// Returns the world-space up point (one unit above the apex).
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Returns the world-space center of the image plane.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Returns the unit vector from the apex toward the image plane.
    #[must_use]
    pub fn forward_axis(&self) -> Vec3 {
        (self.forward - self.apex).normalize()
    }

    /// Returns the pyramid as renderable vertices: the base quad
    /// followed by four apex-corner-corner-apex loops.
    #[must_use]
    pub fn vertices(&self, color: [f32; 4]) -> Vec<ShapeVertex> {
        let vert = |p: Vec3| ShapeVertex {
            position: p.to_array(),
            normal: [0.0, 1.0, 0.0],
            color,
        };
        let [c0, c1, c2, c3] = self.corners;
        let a = self.apex;
        [
            c0, c1, c2, c3, // base
            a, c0, c1, a, // side
            a, c1, c2, a, // side
            a, c2, c3, a, // side
            a, c3, c0, a, // side
        ]
        .into_iter()
        .map(vert)
        .collect()
    }
}

/// A narrow visual cone anchored at a camera's optical center, aimed
/// through the camera's recorded gaze point.
#[derive(Debug, Clone)]
pub struct GazeCone {
    apex: Vec3,
    rotation: Mat3,
    eye_point: Vec3,
    half_angle: f32,
    length: f32,
    radius: f32,
}

impl GazeCone {
    /// Builds the gaze cone for a camera from a normalized gaze
    /// position in `[-1, 1]^2`.
    ///
    /// Out-of-range positions are accepted numerically and aim the cone
    /// outside the image plane.
    #[must_use]
    pub fn build(pose: &CameraPose, frustum: &Frustum, gaze: Vec2) -> Self {
        // Keep the eye point just inside the image plane.
        const POINT_SCALE: f32 = 0.99;
        let w = frustum.half_width() * POINT_SCALE;
        let h = frustum.half_height() * POINT_SCALE;
        let eye_local = Vec3::new(
            -w * gaze.x,
            -h * gaze.y,
            -w / frustum.half_angle().tan(),
        );

        // The renderer draws cones with the base at the origin and
        // height along +z, so the x rotation carries an extra half turn.
        let rot_x = (eye_local.y / eye_local.z).tan() + PI;
        let rot_y = (eye_local.x / eye_local.z).tan();
        let rotation = Mat3::from_rotation_y(rot_y) * Mat3::from_rotation_x(rot_x);

        Self::new(pose.center(), rotation, FOVEAL_HALF_ANGLE_DEG.to_radians())
            .with_eye_point(pose.to_world(eye_local))
    }

    /// Creates a cone from its apex, orientation, and half-angle, with
    /// the default length.
    #[must_use]
    pub fn new(apex: Vec3, rotation: Mat3, half_angle: f32) -> Self {
        Self {
            apex,
            rotation,
            eye_point: apex,
            half_angle,
            length: DEFAULT_CONE_LENGTH,
            radius: DEFAULT_CONE_LENGTH * half_angle.tan(),
        }
    }

    #[must_use]
    fn with_eye_point(mut self, eye_point: Vec3) -> Self {
        self.eye_point = eye_point;
        self
    }

    /// Returns a copy with the measured visible length baked in.
    #[must_use]
    pub fn with_length(&self, length: f32) -> Self {
        Self {
            length,
            radius: length * self.half_angle.tan(),
            ..self.clone()
        }
    }

    /// Returns the apex (the camera's optical center).
    #[must_use]
    pub fn apex(&self) -> Vec3 {
        self.apex
    }

    /// Returns the cone orientation.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Returns the world-space eye point on the image plane.
    #[must_use]
    pub fn eye_point(&self) -> Vec3 {
        self.eye_point
    }

    /// Returns the cone half-angle in radians.
    #[must_use]
    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    /// Returns the visible cone length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Returns the cone base radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

fn resolve_focal(pose: &CameraPose) -> Result<f32> {
    if pose.has_intrinsics() {
        return Ok(pose.focal_x());
    }
    let projection = pose
        .projection()
        .ok_or(GazescopeError::MissingIntrinsics(pose.frame()))?;
    let focal = factor::factor_projection(projection)?.focal_x();
    if focal > 0.0 && focal.is_finite() {
        log::debug!("recovered focal length {focal} for frame {}", pose.frame());
        Ok(focal)
    } else {
        Err(GazescopeError::MissingIntrinsics(pose.frame()))
    }
}
