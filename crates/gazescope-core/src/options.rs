//! Configuration options for the browser scene.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Viewer-facing configuration for the reconstruction scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerOptions {
    /// Scale applied to every camera's image plane (frustum size).
    pub image_scale: f32,

    /// Rendered point size in pixels.
    pub point_size: f32,

    /// Render points as smooth circles rather than squares.
    pub smooth_points: bool,

    /// Draw the point cloud.
    pub show_points: bool,

    /// Draw camera frusta.
    pub show_frusta: bool,

    /// Draw gaze cones.
    pub show_cones: bool,

    /// Background color.
    pub background_color: [f32; 3],
}

impl ViewerOptions {
    /// Serializes the options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            image_scale: 1e-5,
            point_size: 1.0,
            smooth_points: true,
            show_points: true,
            show_frusta: true,
            show_cones: false,
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewerOptions::default();
        assert_eq!(options.image_scale, 1e-5);
        assert!(options.show_points);
        assert!(options.show_frusta);
        assert!(!options.show_cones);
    }

    #[test]
    fn test_json_round_trip() {
        let mut options = ViewerOptions::default();
        options.image_scale = 0.01;
        options.show_cones = true;
        let json = options.to_json().unwrap();
        let back = ViewerOptions::from_json(&json).unwrap();
        assert_eq!(back.image_scale, 0.01);
        assert!(back.show_cones);
    }
}
