//! The reconstructed point cloud.
//!
//! Positions, colors, and optional normals are parallel sequences; index
//! correspondence is the only linkage between them. The cloud is loaded
//! once and shared read-only by every camera's gaze-cone test.

use glam::Vec3;

use crate::error::{GazescopeError, Result};
use crate::vertex::PointVertex;

/// A reconstructed point cloud with per-point colors.
#[derive(Debug, Clone)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    colors: Vec<[u8; 3]>,
    normals: Option<Vec<Vec3>>,
}

impl PointCloud {
    /// Creates a point cloud from parallel position and color sequences.
    ///
    /// Colors are 0-255 per channel. Fails with `SizeMismatch` unless the
    /// sequences have equal length.
    pub fn new(positions: Vec<Vec3>, colors: Vec<[u8; 3]>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(GazescopeError::SizeMismatch {
                expected: positions.len(),
                actual: colors.len(),
            });
        }
        log::debug!("loaded point cloud with {} points", positions.len());
        Ok(Self {
            positions,
            colors,
            normals: None,
        })
    }

    /// Creates a point cloud that also carries per-point normals.
    pub fn with_normals(
        positions: Vec<Vec3>,
        colors: Vec<[u8; 3]>,
        normals: Vec<Vec3>,
    ) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(GazescopeError::SizeMismatch {
                expected: positions.len(),
                actual: normals.len(),
            });
        }
        let mut cloud = Self::new(positions, colors)?;
        cloud.normals = Some(normals);
        Ok(cloud)
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the point positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Returns the per-point colors (0-255 per channel).
    #[must_use]
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Returns the per-point normals, if loaded.
    #[must_use]
    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    /// Returns the position at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    /// Returns the color at `index`, normalized to [0, 1].
    #[must_use]
    pub fn normalized_color(&self, index: usize) -> Vec3 {
        let c = self.colors[index];
        Vec3::new(
            f32::from(c[0]) / 255.0,
            f32::from(c[1]) / 255.0,
            f32::from(c[2]) / 255.0,
        )
    }

    /// Returns the axis-aligned bounding box, or `None` for an empty cloud.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    /// Returns the translation that recenters the cloud on the origin
    /// (the negated mean position), or `None` for an empty cloud.
    #[must_use]
    pub fn centroid_offset(&self) -> Option<Vec3> {
        if self.positions.is_empty() {
            return None;
        }
        let sum: Vec3 = self.positions.iter().copied().sum();
        Some(-(sum / self.positions.len() as f32))
    }

    /// Returns renderable point-sprite vertices with normalized colors.
    #[must_use]
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| PointVertex {
                position: p.to_array(),
                normal: [0.0, 1.0, 0.0],
                color: self.normalized_color(i).to_array(),
            })
            .collect()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Returns the box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the box extents.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the eight corners, front face (max z) first.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let Aabb { min, max } = *self;
        [
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
        ]
    }

    /// Returns the box as six quad faces (24 vertices) for wireframe or
    /// quad rendering.
    #[must_use]
    pub fn face_vertices(&self, color: [f32; 3]) -> Vec<PointVertex> {
        let p = self.corners();
        let faces: [([usize; 4], [f32; 3]); 6] = [
            ([0, 1, 2, 3], [0.0, 0.0, 1.0]),  // front
            ([4, 5, 6, 7], [0.0, 0.0, -1.0]), // back
            ([0, 1, 5, 4], [-1.0, 0.0, 0.0]), // left
            ([1, 5, 6, 2], [0.0, 1.0, 0.0]),  // top
            ([3, 2, 6, 7], [1.0, 0.0, 0.0]),  // right
            ([0, 4, 7, 3], [0.0, -1.0, 0.0]), // bottom
        ];
        let mut vertices = Vec::with_capacity(24);
        for (quad, normal) in &faces {
            for &i in quad {
                vertices.push(PointVertex {
                    position: p[i].to_array(),
                    normal: *normal,
                    color,
                });
            }
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_size_mismatch_is_rejected() {
        let result = PointCloud::new(vec![Vec3::ZERO, Vec3::ONE], vec![[255, 0, 0]]);
        assert!(matches!(
            result,
            Err(GazescopeError::SizeMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_normals_size_mismatch_is_rejected() {
        let result = PointCloud::with_normals(
            vec![Vec3::ZERO],
            vec![[255, 0, 0]],
            vec![Vec3::Y, Vec3::Y],
        );
        assert!(matches!(result, Err(GazescopeError::SizeMismatch { .. })));
    }

    #[test]
    fn test_normals_are_kept() {
        let cloud =
            PointCloud::with_normals(vec![Vec3::ZERO], vec![[255, 0, 0]], vec![Vec3::Z]).unwrap();
        assert_eq!(cloud.normals(), Some([Vec3::Z].as_slice()));
    }

    #[test]
    fn test_aabb_of_empty_cloud() {
        let cloud = PointCloud::new(vec![], vec![]).unwrap();
        assert!(cloud.aabb().is_none());
        assert!(cloud.centroid_offset().is_none());
    }

    #[test]
    fn test_aabb_extents() {
        let cloud = PointCloud::new(
            vec![
                Vec3::new(-1.0, 2.0, 0.0),
                Vec3::new(3.0, -4.0, 1.0),
                Vec3::new(0.0, 0.0, 5.0),
            ],
            vec![[0, 0, 0]; 3],
        )
        .unwrap();
        let aabb = cloud.aabb().unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn test_centroid_offset_is_negated_mean() {
        let cloud = PointCloud::new(
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 2.0, -4.0)],
            vec![[0, 0, 0]; 2],
        )
        .unwrap();
        assert_eq!(cloud.centroid_offset().unwrap(), Vec3::new(-2.0, -1.0, 2.0));
    }

    #[test]
    fn test_vertices_normalize_colors() {
        let cloud = PointCloud::new(vec![Vec3::X], vec![[255, 0, 51]]).unwrap();
        let verts = cloud.vertices();
        assert_eq!(verts.len(), 1);
        assert_eq!(verts[0].position, [1.0, 0.0, 0.0]);
        assert!((verts[0].color[0] - 1.0).abs() < 1e-6);
        assert!((verts[0].color[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_face_vertices_layout() {
        let aabb = Aabb {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        let verts = aabb.face_vertices([1.0, 0.0, 0.0]);
        assert_eq!(verts.len(), 24);
        // Front face sits at max z with a +z normal.
        for v in &verts[0..4] {
            assert_eq!(v.position[2], 1.0);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    proptest! {
        #[test]
        fn aabb_contains_every_point(
            points in proptest::collection::vec((-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0), 1..50)
        ) {
            let positions: Vec<Vec3> = points.iter().map(|&(x, y, z)| Vec3::new(x, y, z)).collect();
            let colors = vec![[0u8, 0, 0]; positions.len()];
            let cloud = PointCloud::new(positions.clone(), colors).unwrap();
            let aabb = cloud.aabb().unwrap();
            for p in positions {
                prop_assert!(p.cmpge(aabb.min).all());
                prop_assert!(p.cmple(aabb.max).all());
            }
        }
    }
}
