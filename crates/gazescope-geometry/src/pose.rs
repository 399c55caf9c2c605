//! Pinhole camera pose decomposition.
//!
//! Bundle adjusters emit one 5x3 block per camera: a focal-length row,
//! a 3x3 rotation, and a translation. The reconstruction's coordinate
//! convention is right-handed with y down; the renderer's is y up with
//! the camera looking along -z, so decomposition applies a y/z axis
//! flip before anything downstream sees the pose.

use glam::{Mat3, Mat4, Vec3};

use crate::factor::ProjectionMatrix;

/// Raw 5x3 calibration block for one reconstructed camera.
///
/// Row 0 carries the focal length as `[f, 0, 0]`, rows 1-3 the rotation
/// (row-major), and row 4 the translation. A block whose entries sum to
/// zero denotes a frame the bundle adjuster rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBlock(pub [[f32; 3]; 5]);

impl CameraBlock {
    /// Returns true when the bundle adjuster rejected the frame.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.0.iter().flatten().sum::<f32>() == 0.0
    }

    fn focal(&self) -> f32 {
        self.0[0][0]
    }

    fn rotation(&self) -> Mat3 {
        let [_, r0, r1, r2, _] = &self.0;
        Mat3::from_cols(
            Vec3::new(r0[0], r1[0], r2[0]),
            Vec3::new(r0[1], r1[1], r2[1]),
            Vec3::new(r0[2], r1[2], r2[2]),
        )
    }

    fn translation(&self) -> Vec3 {
        Vec3::from_array(self.0[4])
    }
}

/// An immutable pinhole camera pose in the rendering convention.
#[derive(Debug, Clone)]
pub struct CameraPose {
    rotation: Mat3,
    translation: Vec3,
    focal: f32,
    frame: u32,
    keyframe: bool,
    projection: Option<ProjectionMatrix>,
}

impl CameraPose {
    /// Decomposes a raw calibration block into a camera pose.
    ///
    /// Returns `None` for a zero block: the bundle adjuster rejected the
    /// frame and the camera must not enter the active set at all.
    ///
    /// The axis-flip correction conjugates the rotation with
    /// `diag(1, -1, -1)` and flips the y/z components of the translation,
    /// which keeps the rotation orthonormal with determinant +1 for every
    /// valid input.
    #[must_use]
    pub fn from_block(block: &CameraBlock, frame: u32, keyframe: bool) -> Option<Self> {
        if block.is_rejected() {
            return None;
        }
        let flip = Mat3::from_diagonal(Vec3::new(1.0, -1.0, -1.0));
        Some(Self {
            rotation: flip * block.rotation() * flip,
            translation: flip * block.translation(),
            focal: block.focal(),
            frame,
            keyframe,
            projection: None,
        })
    }

    /// Attaches a full 3x4 projection matrix, enabling focal-length
    /// recovery when the calibration block carried none.
    #[must_use]
    pub fn with_projection(mut self, projection: ProjectionMatrix) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Returns the rotation (orthonormal, determinant +1).
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Returns the translation in the rendering convention.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Returns the camera center in world space, the apex of the
    /// camera's frustum and gaze cone.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.rotation.transpose() * self.translation
    }

    /// Returns the focal length in pixels along x.
    #[must_use]
    pub fn focal_x(&self) -> f32 {
        self.focal
    }

    /// Returns true if the pose carries a usable focal length.
    #[must_use]
    pub fn has_intrinsics(&self) -> bool {
        self.focal > 0.0 && self.focal.is_finite()
    }

    /// Returns the source video frame index.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Returns true if this camera came from a keyframe.
    #[must_use]
    pub fn is_keyframe(&self) -> bool {
        self.keyframe
    }

    /// Returns the attached projection matrix, if any.
    #[must_use]
    pub fn projection(&self) -> Option<&ProjectionMatrix> {
        self.projection.as_ref()
    }

    /// Returns the column-major camera-to-world transform for direct
    /// renderer consumption.
    #[must_use]
    pub fn world_transform(&self) -> Mat4 {
        let r = self.rotation.transpose();
        Mat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.center().extend(1.0),
        )
    }

    /// Maps a camera-local point into world space.
    #[must_use]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation.transpose() * local + self.center()
    }
}
