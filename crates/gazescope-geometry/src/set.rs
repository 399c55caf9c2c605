//! The active camera collection.
//!
//! Owns one entry per camera the bundle adjuster accepted, each with
//! its derived frustum, gaze cone, and cone selection. All cameras
//! share a single image scale; changing it rebuilds every frustum.

use glam::Vec2;

use gazescope_core::error::{GazescopeError, Result};
use gazescope_core::gaze::GazeSamples;
use gazescope_core::point_cloud::PointCloud;

use crate::cone::ConeSelection;
use crate::frustum::{Frustum, GazeCone, ImageSize};
use crate::pose::{CameraBlock, CameraPose};

/// Default image-plane scale applied to newly loaded cameras.
pub const DEFAULT_IMAGE_SCALE: f32 = 1e-5;

/// One reconstructed camera with its derived geometry.
#[derive(Debug, Clone)]
pub struct SceneCamera {
    pose: CameraPose,
    image: ImageSize,
    gaze: Option<Vec2>,
    frustum: Option<Frustum>,
    cone: Option<GazeCone>,
    selection: Option<ConeSelection>,
}

impl SceneCamera {
    /// Returns the camera pose.
    #[must_use]
    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    /// Returns the source image dimensions.
    #[must_use]
    pub fn image(&self) -> ImageSize {
        self.image
    }

    /// Returns the recorded gaze position for this camera's frame.
    #[must_use]
    pub fn gaze(&self) -> Option<Vec2> {
        self.gaze
    }

    /// Returns the viewing frustum. Absent when the camera has no
    /// recoverable intrinsics.
    #[must_use]
    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Returns the gaze cone, present only for frames with a recorded
    /// gaze position.
    #[must_use]
    pub fn cone(&self) -> Option<&GazeCone> {
        self.cone.as_ref()
    }

    /// Returns the most recent cone selection.
    #[must_use]
    pub fn selection(&self) -> Option<&ConeSelection> {
        self.selection.as_ref()
    }

    fn rebuild(&mut self, scale: f32) {
        self.frustum = match Frustum::build(&self.pose, self.image, scale) {
            Ok(frustum) => Some(frustum),
            Err(error) => {
                log::warn!("no frustum for frame {}: {error}", self.pose.frame());
                None
            }
        };
        self.rebuild_cone();
    }

    fn rebuild_cone(&mut self) {
        self.cone = match (&self.frustum, self.gaze) {
            (Some(frustum), Some(gaze)) => Some(GazeCone::build(&self.pose, frustum, gaze)),
            _ => None,
        };
        self.selection = None;
    }
}

/// The set of active cameras sharing one image scale.
#[derive(Debug, Clone)]
pub struct CameraSet {
    cameras: Vec<SceneCamera>,
    image_scale: f32,
    show_frusta: bool,
    show_cones: bool,
}

impl CameraSet {
    /// Creates an empty camera set with the default image scale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads keyframe cameras from raw calibration blocks.
    ///
    /// Blocks the bundle adjuster rejected (zero sum) are skipped
    /// entirely. Fails with `SizeMismatch` unless the three sequences
    /// have equal length.
    pub fn load_keyframes(
        &mut self,
        blocks: &[CameraBlock],
        frames: &[u32],
        images: &[ImageSize],
    ) -> Result<()> {
        self.load(blocks, frames, images, true)
    }

    /// Loads non-keyframe cameras from raw calibration blocks.
    pub fn load_frames(
        &mut self,
        blocks: &[CameraBlock],
        frames: &[u32],
        images: &[ImageSize],
    ) -> Result<()> {
        self.load(blocks, frames, images, false)
    }

    fn load(
        &mut self,
        blocks: &[CameraBlock],
        frames: &[u32],
        images: &[ImageSize],
        keyframe: bool,
    ) -> Result<()> {
        if blocks.len() != frames.len() {
            return Err(GazescopeError::SizeMismatch {
                expected: blocks.len(),
                actual: frames.len(),
            });
        }
        if blocks.len() != images.len() {
            return Err(GazescopeError::SizeMismatch {
                expected: blocks.len(),
                actual: images.len(),
            });
        }
        for ((block, &frame), &image) in blocks.iter().zip(frames).zip(images) {
            match CameraPose::from_block(block, frame, keyframe) {
                Some(pose) => {
                    let mut camera = SceneCamera {
                        pose,
                        image,
                        gaze: None,
                        frustum: None,
                        cone: None,
                        selection: None,
                    };
                    camera.rebuild(self.image_scale);
                    self.cameras.push(camera);
                }
                None => log::debug!("frame {frame} rejected by the bundle adjuster, skipping"),
            }
        }
        log::debug!("camera set holds {} cameras", self.cameras.len());
        Ok(())
    }

    /// Returns the number of active cameras.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Returns true if no cameras are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Returns the camera at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SceneCamera> {
        self.cameras.get(index)
    }

    /// Returns an iterator over the active cameras.
    pub fn iter(&self) -> impl Iterator<Item = &SceneCamera> {
        self.cameras.iter()
    }

    /// Returns the shared image scale.
    #[must_use]
    pub fn image_scale(&self) -> f32 {
        self.image_scale
    }

    /// Sets the shared image scale and rebuilds every camera's frustum
    /// and cone.
    pub fn set_image_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GazescopeError::Degenerate(format!(
                "image scale {scale} is not positive"
            )));
        }
        self.image_scale = scale;
        for camera in &mut self.cameras {
            camera.rebuild(scale);
        }
        Ok(())
    }

    /// Attaches gaze positions to the cameras whose frames have a
    /// recorded sample, building their gaze cones.
    pub fn attach_gaze(&mut self, samples: &GazeSamples) {
        for camera in &mut self.cameras {
            camera.gaze = samples.get(camera.pose.frame());
            camera.rebuild_cone();
        }
    }

    /// Runs the cone intersection for every camera with a gaze cone,
    /// storing the selection and resolving the cone length.
    pub fn select_gaze_points(&mut self, cloud: &PointCloud) {
        for camera in &mut self.cameras {
            if let Some(cone) = &camera.cone {
                let selection = ConeSelection::compute(cloud, &camera.pose, cone);
                camera.cone = Some(cone.resolved(&selection));
                camera.selection = Some(selection);
            }
        }
    }

    /// Returns whether frusta should be drawn.
    #[must_use]
    pub fn show_frusta(&self) -> bool {
        self.show_frusta
    }

    /// Sets whether frusta should be drawn.
    pub fn set_show_frusta(&mut self, show: bool) {
        self.show_frusta = show;
    }

    /// Returns whether gaze cones should be drawn.
    #[must_use]
    pub fn show_cones(&self) -> bool {
        self.show_cones
    }

    /// Sets whether gaze cones should be drawn.
    pub fn set_show_cones(&mut self, show: bool) {
        self.show_cones = show;
    }
}

impl Default for CameraSet {
    fn default() -> Self {
        Self {
            cameras: Vec::new(),
            image_scale: DEFAULT_IMAGE_SCALE,
            show_frusta: true,
            show_cones: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const IMAGE: ImageSize = ImageSize {
        width: 640,
        height: 480,
    };

    fn identity_block(focal: f32) -> CameraBlock {
        CameraBlock([
            [focal, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ])
    }

    #[test]
    fn test_rejected_blocks_are_skipped() {
        let mut set = CameraSet::new();
        set.load_keyframes(
            &[identity_block(100.0), CameraBlock([[0.0; 3]; 5])],
            &[0, 1],
            &[IMAGE, IMAGE],
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().pose().frame(), 0);
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let mut set = CameraSet::new();
        let result = set.load_keyframes(&[identity_block(100.0)], &[0, 1], &[IMAGE]);
        assert!(matches!(
            result,
            Err(GazescopeError::SizeMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_camera_without_intrinsics_stays_without_frustum() {
        let mut set = CameraSet::new();
        set.load_keyframes(&[identity_block(0.0)], &[0], &[IMAGE])
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get(0).unwrap().frustum().is_none());
    }

    #[test]
    fn test_set_image_scale_rebuilds_frusta() {
        let mut set = CameraSet::new();
        set.load_keyframes(&[identity_block(500.0)], &[0], &[IMAGE])
            .unwrap();
        set.set_image_scale(0.01).unwrap();
        let frustum = set.get(0).unwrap().frustum().unwrap();
        assert!((frustum.half_width() - 0.5 * 0.01 * 640.0).abs() < 1e-6);

        set.set_image_scale(0.02).unwrap();
        let frustum = set.get(0).unwrap().frustum().unwrap();
        assert!((frustum.half_width() - 0.5 * 0.02 * 640.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_image_scale_fails() {
        let mut set = CameraSet::new();
        assert!(set.set_image_scale(0.0).is_err());
        assert!(set.set_image_scale(f32::NAN).is_err());
    }

    #[test]
    fn test_gaze_attachment_builds_cones() {
        let mut set = CameraSet::new();
        set.load_keyframes(
            &[identity_block(500.0), identity_block(500.0)],
            &[0, 1],
            &[IMAGE, IMAGE],
        )
        .unwrap();
        set.set_image_scale(0.01).unwrap();

        let mut samples = GazeSamples::new();
        samples.insert(1, Vec2::new(0.25, -0.5));
        set.attach_gaze(&samples);

        assert!(set.get(0).unwrap().cone().is_none());
        assert!(set.get(1).unwrap().cone().is_some());
    }

    #[test]
    fn test_select_gaze_points_resolves_cone_length() {
        let mut set = CameraSet::new();
        set.load_keyframes(&[identity_block(500.0)], &[0], &[IMAGE])
            .unwrap();
        set.set_image_scale(0.01).unwrap();

        let mut samples = GazeSamples::new();
        samples.insert(0, Vec2::ZERO);
        set.attach_gaze(&samples);

        // A centered gaze cone looks down -z in world space.
        let cloud = PointCloud::new(
            vec![Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -3.0)],
            vec![[255, 255, 255]; 2],
        )
        .unwrap();
        set.select_gaze_points(&cloud);

        let camera = set.get(0).unwrap();
        let selection = camera.selection().unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.length(), 3.0);
        assert_eq!(camera.cone().unwrap().length(), 3.0);
    }

    #[test]
    fn test_load_frames_marks_non_keyframes() {
        let mut set = CameraSet::new();
        set.load_keyframes(&[identity_block(100.0)], &[0], &[IMAGE])
            .unwrap();
        set.load_frames(&[identity_block(100.0)], &[15], &[IMAGE])
            .unwrap();
        assert!(set.get(0).unwrap().pose().is_keyframe());
        assert!(!set.get(1).unwrap().pose().is_keyframe());
    }

    #[test]
    fn test_visibility_toggles() {
        let mut set = CameraSet::new();
        assert!(set.show_frusta());
        assert!(!set.show_cones());
        set.set_show_frusta(false);
        set.set_show_cones(true);
        assert!(!set.show_frusta());
        assert!(set.show_cones());
    }
}
