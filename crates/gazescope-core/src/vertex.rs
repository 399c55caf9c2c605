//! Renderer-facing vertex data.
//!
//! Interleaved position/normal/color layouts matching what a point-sprite
//! or triangle-fan renderer uploads directly to a vertex buffer.

/// A point-cloud vertex with an RGB color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
    /// RGB color in [0, 1].
    pub color: [f32; 3],
}

/// A shape vertex with an RGBA color, for alpha-blended geometry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
    /// RGBA color in [0, 1].
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 9 * 4);
        assert_eq!(std::mem::size_of::<ShapeVertex>(), 10 * 4);
    }

    #[test]
    fn test_vertices_cast_to_bytes() {
        let verts = [PointVertex {
            position: [1.0, 2.0, 3.0],
            normal: [0.0, 1.0, 0.0],
            color: [1.0, 0.0, 0.0],
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), std::mem::size_of::<PointVertex>());
    }
}
