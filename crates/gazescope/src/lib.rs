//! gazescope-rs: camera geometry for browsing gaze-annotated
//! structure-from-motion reconstructions.
//!
//! A structure-from-motion pipeline leaves behind a point cloud and one
//! calibration block per camera; an eye tracker adds a normalized gaze
//! position per frame. This crate turns those inputs into the geometry
//! an interactive 3D browser draws: camera viewing pyramids, foveal
//! gaze cones, the distance-ranked cloud points each cone contains, and
//! the view transforms that position the virtual viewpoint.
//!
//! # Quick Start
//!
//! ```
//! use gazescope_rs::{
//!     CameraBlock, CameraSet, GazeSamples, ImageSize, PointCloud, Vec2, Vec3,
//! };
//!
//! fn main() -> gazescope_rs::Result<()> {
//!     // One camera at the origin looking down -z, 640x480, focal 500px.
//!     let block = CameraBlock([
//!         [500.0, 0.0, 0.0],
//!         [1.0, 0.0, 0.0],
//!         [0.0, 1.0, 0.0],
//!         [0.0, 0.0, 1.0],
//!         [0.0, 0.0, 0.0],
//!     ]);
//!     let image = ImageSize {
//!         width: 640,
//!         height: 480,
//!     };
//!
//!     let mut cameras = CameraSet::new();
//!     cameras.load_keyframes(&[block], &[0], &[image])?;
//!     cameras.set_image_scale(0.01)?;
//!
//!     // The subject looked at the image center on frame 0.
//!     let mut gaze = GazeSamples::new();
//!     gaze.insert(0, Vec2::ZERO);
//!     cameras.attach_gaze(&gaze);
//!
//!     // Two reconstructed points straight ahead of the camera.
//!     let cloud = PointCloud::new(
//!         vec![Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -2.0)],
//!         vec![[255, 0, 0], [0, 255, 0]],
//!     )?;
//!     cameras.select_gaze_points(&cloud);
//!
//!     let camera = cameras.get(0).unwrap();
//!     assert_eq!(camera.selection().unwrap().len(), 2);
//!     assert!(camera.frustum().is_some());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The workspace separates shared data from derived geometry:
//!
//! - [`PointCloud`] and [`GazeSamples`] are loaded once and only read
//! - [`CameraPose`], [`Frustum`], [`GazeCone`], and [`ConeSelection`]
//!   are immutable values produced by pure functions
//! - [`CameraSet`] owns the per-camera values and rebuilds them when
//!   the shared image scale changes
//! - [`Trackball`] and [`Eye`] position the virtual viewpoint for the
//!   renderer

// Re-export core types
pub use gazescope_core::{
    error::{GazescopeError, Result},
    gaze::{GazeSample, GazeSamples},
    options::ViewerOptions,
    point_cloud::{Aabb, PointCloud},
    vertex::{PointVertex, ShapeVertex},
};

// Re-export geometry types
pub use gazescope_geometry::{
    cone::{ConePoint, ConeSelection},
    factor::{factor_projection, FactoredCamera, ProjectionMatrix},
    frustum::{Frustum, GazeCone, ImageSize, DEFAULT_CONE_LENGTH, FOVEAL_HALF_ANGLE_DEG},
    pose::{CameraBlock, CameraPose},
    set::{CameraSet, SceneCamera, DEFAULT_IMAGE_SCALE},
};

// Re-export view types
pub use gazescope_view::{Eye, Trackball};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
