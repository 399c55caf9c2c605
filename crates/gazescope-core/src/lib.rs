//! Core data types for gazescope-rs.
//!
//! This crate provides the shared inputs and ambient concerns used
//! throughout gazescope-rs:
//! - [`PointCloud`] - the reconstructed point cloud, loaded once and
//!   shared read-only
//! - [`GazeSamples`] - per-frame normalized gaze positions
//! - [`ViewerOptions`] - scene configuration
//! - [`PointVertex`]/[`ShapeVertex`] - renderer-facing vertex layouts
//! - Typed errors and the crate-wide [`Result`] alias

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Point counts convert to f32 for the centroid
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod gaze;
pub mod options;
pub mod point_cloud;
pub mod vertex;

pub use error::{GazescopeError, Result};
pub use gaze::{GazeSample, GazeSamples};
pub use options::ViewerOptions;
pub use point_cloud::{Aabb, PointCloud};
pub use vertex::{PointVertex, ShapeVertex};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
