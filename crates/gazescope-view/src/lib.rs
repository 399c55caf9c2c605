//! View-transform math for gazescope-rs.
//!
//! Two ways of positioning the virtual viewpoint:
//! - [`Trackball`] - free rotation/pan/zoom driven by cursor drags
//! - [`Eye`] - a look-at view that aligns with a reconstructed camera

// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// The scene distance is an integer count of scene units
#![allow(clippy::cast_precision_loss)]

pub mod eye;
pub mod trackball;

pub use eye::Eye;
pub use trackball::Trackball;
