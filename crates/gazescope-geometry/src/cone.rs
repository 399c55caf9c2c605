//! Gaze-cone / point-cloud intersection.
//!
//! Selects the cloud points a subject was looking at from a given
//! camera: every point inside the camera's foveal cone, ranked by
//! distance from the optical center. The ranking drives depth-correct
//! alpha blending and the median distance sets the drawn cone length.

use glam::Vec3;

use gazescope_core::point_cloud::PointCloud;
use gazescope_core::vertex::ShapeVertex;

use crate::frustum::{GazeCone, DEFAULT_CONE_LENGTH};
use crate::pose::CameraPose;

/// A single point selected by the cone test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConePoint {
    /// Position in the cone-local frame.
    pub position: Vec3,
    /// Index into the source point cloud.
    pub index: usize,
    /// Euclidean distance from the cone apex.
    pub distance: f32,
}

/// The distance-ranked subset of a point cloud inside a gaze cone.
#[derive(Debug, Clone)]
pub struct ConeSelection {
    points: Vec<ConePoint>,
    length: f32,
    radius: f32,
}

impl ConeSelection {
    /// Computes the subset of `cloud` inside `cone`, sorted ascending
    /// by distance from the apex.
    ///
    /// The cloud is read-only; selected points keep their original
    /// cloud index for color lookup. The output is deterministic for
    /// identical inputs.
    #[must_use]
    pub fn compute(cloud: &PointCloud, pose: &CameraPose, cone: &GazeCone) -> Self {
        let camera_inv = pose.rotation().transpose();
        let cone_inv = cone.rotation().transpose();
        let translation = pose.translation();
        let r2 = cone.half_angle().tan().powi(2);

        let mut points = Vec::new();
        for (index, &p) in cloud.positions().iter().enumerate() {
            let local = cone_inv * (camera_inv * (p - translation));
            let inside = local.z * local.z - local.x * local.x / r2 - local.y * local.y / r2;
            if inside > 0.0 {
                points.push(ConePoint {
                    position: local,
                    index,
                    distance: local.length(),
                });
            }
        }
        points.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let length = if points.is_empty() {
            DEFAULT_CONE_LENGTH
        } else {
            points[points.len() / 2].distance
        };
        log::debug!(
            "{} of {} points inside the gaze cone for frame {}",
            points.len(),
            cloud.len(),
            pose.frame()
        );
        Self {
            points,
            radius: length * cone.half_angle().tan(),
            length,
        }
    }

    /// Returns the selected points, nearest first.
    #[must_use]
    pub fn points(&self) -> &[ConePoint] {
        &self.points
    }

    /// Returns the number of selected points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points fell inside the cone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the visible cone length: the median selected distance,
    /// or the default length for an empty selection.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Returns the cone base radius at the visible length.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the selection as renderable vertices, colors resolved
    /// through the preserved cloud indices.
    #[must_use]
    pub fn vertices(&self, cloud: &PointCloud) -> Vec<ShapeVertex> {
        self.points
            .iter()
            .map(|p| {
                let c = cloud.normalized_color(p.index);
                ShapeVertex {
                    position: p.position.to_array(),
                    normal: [0.0, 1.0, 0.0],
                    color: [c.x, c.y, c.z, 1.0],
                }
            })
            .collect()
    }
}

impl GazeCone {
    /// Returns a copy of the cone with the selection's measured length
    /// and radius baked in.
    #[must_use]
    pub fn resolved(&self, selection: &ConeSelection) -> Self {
        self.with_length(selection.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::CameraBlock;
    use glam::Mat3;
    use std::f32::consts::FRAC_PI_4;

    fn identity_pose() -> CameraPose {
        let raw = CameraBlock([
            [100.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ]);
        CameraPose::from_block(&raw, 0, true).unwrap()
    }

    fn axis_cone() -> GazeCone {
        GazeCone::new(Vec3::ZERO, Mat3::IDENTITY, FRAC_PI_4)
    }

    fn cloud(points: Vec<Vec3>) -> PointCloud {
        let colors = vec![[128, 64, 255]; points.len()];
        PointCloud::new(points, colors).unwrap()
    }

    #[test]
    fn test_points_sorted_by_distance_with_median_length() {
        let cloud = cloud(vec![
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]);
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());

        assert_eq!(selection.len(), 3);
        let distances: Vec<f32> = selection.points().iter().map(|p| p.distance).collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0]);
        let indices: Vec<usize> = selection.points().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 0, 1]);
        assert_eq!(selection.length(), 2.0);
        assert!((selection.radius() - 2.0 * FRAC_PI_4.tan()).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_points_are_excluded() {
        // On a 45-degree cone, z^2 == x^2 exactly on the surface.
        let cloud = cloud(vec![Vec3::new(1.0, 0.0, 1.0)]);
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_outside_points_are_excluded() {
        let cloud = cloud(vec![Vec3::new(2.0, 0.0, 1.0), Vec3::new(0.0, 3.0, 0.5)]);
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());
        assert!(selection.is_empty());
        assert_eq!(selection.length(), DEFAULT_CONE_LENGTH);
    }

    #[test]
    fn test_empty_cloud_yields_default_length() {
        let cloud = cloud(vec![]);
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());
        assert!(selection.is_empty());
        assert_eq!(selection.length(), DEFAULT_CONE_LENGTH);
        assert!((selection.radius() - DEFAULT_CONE_LENGTH * FRAC_PI_4.tan()).abs() < 1e-6);
    }

    #[test]
    fn test_equal_distances_keep_cloud_order() {
        let cloud = cloud(vec![Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 2.0)]);
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());
        let indices: Vec<usize> = selection.points().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let cloud = cloud(vec![
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.1, 0.0, 1.0),
            Vec3::new(0.0, 0.1, 3.0),
        ]);
        let pose = identity_pose();
        let cone = axis_cone();
        let first = ConeSelection::compute(&cloud, &pose, &cone);
        let second = ConeSelection::compute(&cloud, &pose, &cone);
        assert_eq!(first.points(), second.points());

        let mut resorted = first.points().to_vec();
        resorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        assert_eq!(resorted.as_slice(), first.points());
    }

    #[test]
    fn test_vertices_resolve_colors_through_indices() {
        let positions = vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)];
        let colors = vec![[0, 0, 0], [255, 0, 0]];
        let cloud = PointCloud::new(positions, colors).unwrap();
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &axis_cone());
        assert_eq!(selection.len(), 1);
        let verts = selection.vertices(&cloud);
        assert!((verts[0].color[0] - 1.0).abs() < 1e-6);
        assert_eq!(verts[0].color[3], 1.0);
    }

    #[test]
    fn test_resolved_cone_takes_selection_length() {
        let cloud = cloud(vec![Vec3::new(0.0, 0.0, 4.0)]);
        let cone = axis_cone();
        let selection = ConeSelection::compute(&cloud, &identity_pose(), &cone);
        let resolved = cone.resolved(&selection);
        assert_eq!(resolved.length(), 4.0);
    }
}
