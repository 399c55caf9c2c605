//! Camera geometry for gazescope-rs.
//!
//! This crate turns raw structure-from-motion calibration data into the
//! geometry an interactive browser draws:
//! - [`CameraPose`] - pinhole pose decomposed from a calibration block
//! - [`Frustum`] - the viewing pyramid of an active camera
//! - [`GazeCone`] - the foveal cone aimed through a recorded gaze point
//! - [`ConeSelection`] - the distance-ranked cloud subset inside a cone
//! - [`CameraSet`] - the active camera collection with shared image scale
//!
//! Poses, frusta, and cones are immutable values produced by pure
//! functions; the point cloud is only ever read.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pixel dimensions convert to f32 geometry throughout
#![allow(clippy::cast_precision_loss)]

pub mod cone;
pub mod factor;
pub mod frustum;
pub mod pose;
pub mod set;

pub use cone::{ConePoint, ConeSelection};
pub use factor::{factor_projection, rq3, FactoredCamera, ProjectionMatrix};
pub use frustum::{Frustum, GazeCone, ImageSize, DEFAULT_CONE_LENGTH, FOVEAL_HALF_ANGLE_DEG};
pub use pose::{CameraBlock, CameraPose};
pub use set::{CameraSet, SceneCamera, DEFAULT_IMAGE_SCALE};
