//! Per-frame normalized gaze positions.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single gaze record: a frame index and a normalized 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Source video frame index.
    pub frame: u32,
    /// Horizontal gaze position, nominally in [-1, 1].
    pub x: f32,
    /// Vertical gaze position, nominally in [-1, 1].
    pub y: f32,
}

/// Normalized gaze positions keyed by frame index.
///
/// Coordinates are nominally in `[-1, 1]`; out-of-range values pass
/// through unvalidated and place the eye point outside the image plane.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GazeSamples {
    samples: HashMap<u32, Vec2>,
}

impl GazeSamples {
    /// Creates an empty sample map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sample map from gaze records. Later records for the same
    /// frame replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = GazeSample>) -> Self {
        let mut samples = Self::new();
        for record in records {
            samples.insert(record.frame, Vec2::new(record.x, record.y));
        }
        samples
    }

    /// Inserts a gaze position for a frame.
    pub fn insert(&mut self, frame: u32, position: Vec2) {
        self.samples.insert(frame, position);
    }

    /// Returns the gaze position for a frame, if recorded.
    #[must_use]
    pub fn get(&self, frame: u32) -> Option<Vec2> {
        self.samples.get(&frame).copied()
    }

    /// Returns the number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no frames are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
