#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

//! CPU-side vertex data for the primitive meshes used by the demo scenes.
//!
//! Everything here is plain `f32`/`u32` data plus a [`VertexLayout`] describing how the
//! interleaved floats map onto shader attribute locations. Upload lives in the GL runtime.

use glam::Vec3;

/// Interleaved float attributes, bound to locations `0..n` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    components: Vec<u32>,
}

impl VertexLayout {
    pub fn new(components: &[u32]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }

    /// Component count per attribute location.
    pub fn attributes(&self) -> &[u32] {
        &self.components
    }

    pub fn stride_floats(&self) -> usize {
        self.components.iter().map(|c| *c as usize).sum()
    }

    pub fn stride_bytes(&self) -> usize {
        self.stride_floats() * std::mem::size_of::<f32>()
    }

    /// Float offset of attribute `location` inside one vertex.
    pub fn offset_floats(&self, location: usize) -> usize {
        self.components[..location]
            .iter()
            .map(|c| *c as usize)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub layout: VertexLayout,
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.stride_floats().max(1)
    }

    /// Element count for the draw call: index count when indexed, vertex count otherwise.
    pub fn draw_count(&self) -> usize {
        match &self.indices {
            Some(idx) => idx.len(),
            None => self.vertex_count(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// 2D / getting-started shapes
// -------------------------------------------------------------------------------------------------

/// position(3) + color(3), one red/green/blue corner each.
pub fn triangle() -> Geometry {
    #[rustfmt::skip]
    let vertices = vec![
        -0.5, -0.5, 0.0,   1.0, 0.0, 0.0,
         0.5, -0.5, 0.0,   0.0, 1.0, 0.0,
         0.0,  0.5, 0.0,   0.0, 0.0, 1.0,
    ];
    Geometry {
        layout: VertexLayout::new(&[3, 3]),
        vertices,
        indices: None,
    }
}

/// position(3), indexed as two triangles.
pub fn rectangle() -> Geometry {
    #[rustfmt::skip]
    let vertices = vec![
         0.5,  0.5, 0.0, // top right
         0.5, -0.5, 0.0, // bottom right
        -0.5, -0.5, 0.0, // bottom left
        -0.5,  0.5, 0.0, // top left
    ];
    Geometry {
        layout: VertexLayout::new(&[3]),
        vertices,
        indices: Some(vec![0, 1, 3, 1, 2, 3]),
    }
}

// -------------------------------------------------------------------------------------------------
// Cubes
// -------------------------------------------------------------------------------------------------

/// (outward normal, u axis, v axis) per face; `u x v == normal` keeps every face CCW from outside.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
];

fn cube_with(half: f32, normals: bool, uvs: bool) -> Geometry {
    let mut components = vec![3];
    if normals {
        components.push(3);
    }
    if uvs {
        components.push(2);
    }
    let layout = VertexLayout::new(&components);

    let mut vertices = Vec::with_capacity(36 * layout.stride_floats());
    for (n, u, v) in CUBE_FACES {
        let center = n * half;
        // Texture V runs against the face's v axis: unflipped image rows start at the top.
        let corners = [
            (center - u * half - v * half, [0.0, 1.0]),
            (center + u * half - v * half, [1.0, 1.0]),
            (center + u * half + v * half, [1.0, 0.0]),
            (center - u * half + v * half, [0.0, 0.0]),
        ];
        for i in [0usize, 1, 2, 2, 3, 0] {
            let (p, uv) = corners[i];
            vertices.extend_from_slice(&p.to_array());
            if normals {
                vertices.extend_from_slice(&n.to_array());
            }
            if uvs {
                vertices.extend_from_slice(&uv);
            }
        }
    }

    Geometry {
        layout,
        vertices,
        indices: None,
    }
}

/// Unit cube: position(3) + normal(3) + uv(2).
pub fn cube() -> Geometry {
    cube_with(0.5, true, true)
}

/// Unit cube: position(3) + uv(2).
pub fn cube_no_normal() -> Geometry {
    cube_with(0.5, false, true)
}

/// Unit cube: position(3) + normal(3).
pub fn cube_with_normals() -> Geometry {
    cube_with(0.5, true, false)
}

/// Skybox cube (edge length 2): position(3).
pub fn cube_no_texture() -> Geometry {
    cube_with(1.0, false, false)
}

// -------------------------------------------------------------------------------------------------
// Planes and quads
// -------------------------------------------------------------------------------------------------

/// Floor at y = -0.5: position(3) + uv(2). UVs run to 2.0 so the texture repeats.
pub fn plane() -> Geometry {
    #[rustfmt::skip]
    let vertices = vec![
         5.0, -0.5,  5.0,  2.0, 0.0,
        -5.0, -0.5,  5.0,  0.0, 0.0,
        -5.0, -0.5, -5.0,  0.0, 2.0,

         5.0, -0.5,  5.0,  2.0, 0.0,
        -5.0, -0.5, -5.0,  0.0, 2.0,
         5.0, -0.5, -5.0,  2.0, 2.0,
    ];
    Geometry {
        layout: VertexLayout::new(&[3, 2]),
        vertices,
        indices: None,
    }
}

/// Upright unit quad for transparent windows: position(3) + uv(2).
///
/// V runs top-down so unflipped image rows land the right way up.
pub fn quad_3d() -> Geometry {
    #[rustfmt::skip]
    let vertices = vec![
        0.0,  0.5, 0.0,  0.0, 0.0,
        0.0, -0.5, 0.0,  0.0, 1.0,
        1.0, -0.5, 0.0,  1.0, 1.0,

        0.0,  0.5, 0.0,  0.0, 0.0,
        1.0, -0.5, 0.0,  1.0, 1.0,
        1.0,  0.5, 0.0,  1.0, 0.0,
    ];
    Geometry {
        layout: VertexLayout::new(&[3, 2]),
        vertices,
        indices: None,
    }
}

fn ndc_quad(x0: f32, y0: f32, x1: f32, y1: f32, mirror_u: bool) -> Geometry {
    let (u0, u1) = if mirror_u { (1.0, 0.0) } else { (0.0, 1.0) };
    #[rustfmt::skip]
    let vertices = vec![
        x0, y1,  u0, 1.0,
        x0, y0,  u0, 0.0,
        x1, y0,  u1, 0.0,

        x0, y1,  u0, 1.0,
        x1, y0,  u1, 0.0,
        x1, y1,  u1, 1.0,
    ];
    Geometry {
        layout: VertexLayout::new(&[2, 2]),
        vertices,
        indices: None,
    }
}

/// Fullscreen quad in NDC: position(2) + uv(2).
pub fn screen_quad() -> Geometry {
    ndc_quad(-1.0, -1.0, 1.0, 1.0, false)
}

/// Rear-view strip at the top centre of the screen, horizontally mirrored.
pub fn mirror_quad() -> Geometry {
    ndc_quad(-0.3, 0.6, 0.3, 1.0, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<(&'static str, Geometry)> {
        vec![
            ("triangle", triangle()),
            ("rectangle", rectangle()),
            ("cube", cube()),
            ("cube_no_normal", cube_no_normal()),
            ("cube_with_normals", cube_with_normals()),
            ("cube_no_texture", cube_no_texture()),
            ("plane", plane()),
            ("quad_3d", quad_3d()),
            ("screen_quad", screen_quad()),
            ("mirror_quad", mirror_quad()),
        ]
    }

    fn vertex(g: &Geometry, i: usize) -> &[f32] {
        let s = g.layout.stride_floats();
        &g.vertices[i * s..(i + 1) * s]
    }

    #[test]
    fn vertex_buffers_are_whole_vertices() {
        for (name, g) in all() {
            assert_eq!(
                g.vertices.len() % g.layout.stride_floats(),
                0,
                "{name} has a partial vertex"
            );
        }
    }

    #[test]
    fn indices_stay_in_range() {
        for (name, g) in all() {
            if let Some(idx) = &g.indices {
                let n = g.vertex_count() as u32;
                assert!(idx.iter().all(|i| *i < n), "{name} index out of range");
            }
        }
    }

    #[test]
    fn strides_and_offsets() {
        let g = cube();
        assert_eq!(g.layout.attributes(), &[3, 3, 2]);
        assert_eq!(g.layout.stride_floats(), 8);
        assert_eq!(g.layout.stride_bytes(), 32);
        assert_eq!(g.layout.offset_floats(0), 0);
        assert_eq!(g.layout.offset_floats(1), 3);
        assert_eq!(g.layout.offset_floats(2), 6);
    }

    #[test]
    fn draw_counts() {
        assert_eq!(triangle().draw_count(), 3);
        assert_eq!(rectangle().draw_count(), 6);
        assert_eq!(rectangle().vertex_count(), 4);
        assert_eq!(cube().draw_count(), 36);
        assert_eq!(cube_no_texture().draw_count(), 36);
        assert_eq!(plane().draw_count(), 6);
        assert_eq!(screen_quad().draw_count(), 6);
    }

    #[test]
    fn cube_faces_wind_ccw_and_point_outward() {
        let g = cube();
        for tri in 0..12 {
            let p = |k: usize| Vec3::from_slice(&vertex(&g, tri * 3 + k)[0..3]);
            let n = Vec3::from_slice(&vertex(&g, tri * 3)[3..6]);
            let face_normal = (p(1) - p(0)).cross(p(2) - p(0)).normalize();
            assert!((face_normal - n).length() < 1e-5, "triangle {tri} winds inward");

            let centroid = (p(0) + p(1) + p(2)) / 3.0;
            assert!(centroid.dot(n) > 0.0, "triangle {tri} normal points inward");
        }
    }

    #[test]
    fn cube_side_faces_sample_image_top_at_the_top() {
        let g = cube();
        for i in 0..g.vertex_count() {
            let v = vertex(&g, i);
            if v[4] != 0.0 {
                continue;
            }
            // side faces only; top and bottom have no "up"
            let expected = if v[1] > 0.0 { 0.0 } else { 1.0 };
            assert_eq!(v[7], expected, "vertex {i} at y = {}", v[1]);
        }
    }

    #[test]
    fn cubes_have_expected_extent() {
        let max_abs = |g: &Geometry| {
            (0..g.vertex_count())
                .flat_map(|i| vertex(g, i)[0..3].to_vec())
                .fold(0.0f32, |m, x| m.max(x.abs()))
        };
        assert_eq!(max_abs(&cube()), 0.5);
        assert_eq!(max_abs(&cube_no_texture()), 1.0);
    }

    #[test]
    fn mirror_quad_flips_u_and_sits_on_top() {
        let g = mirror_quad();
        for i in 0..g.vertex_count() {
            let v = vertex(&g, i);
            assert!(v[1] >= 0.6);
            // left edge samples the right side of the texture
            if v[0] < 0.0 {
                assert_eq!(v[2], 1.0);
            } else {
                assert_eq!(v[2], 0.0);
            }
        }
    }
}
