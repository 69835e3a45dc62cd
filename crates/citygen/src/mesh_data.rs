//! Engine-agnostic triangle meshes.
//!
//! Roads and pads are each built into a single `MeshData` so the number of
//! renderable objects does not grow with the number of buildings.

use bitcode::Encode;

/// Indexed triangle list with per-vertex normals and UVs.
#[derive(Debug, Clone, Default, PartialEq, Encode)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

const UP: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Add a quad. Corners go counter-clockwise seen from the side `normal`
    /// points to.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.uvs.extend_from_slice(&uvs);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Flat quad facing up covering `[x0, x1] x [z0, z1]` at height `y`.
    pub fn push_ground_quad(&mut self, x0: f32, x1: f32, z0: f32, z1: f32, y: f32) {
        self.push_quad(
            [[x0, y, z0], [x0, y, z1], [x1, y, z1], [x1, y, z0]],
            UP,
            DEFAULT_UVS,
        );
    }

    /// Axis-aligned box from `min` to `max` without a bottom face: top plus
    /// four sides. Side UVs come from `side_uv(face_index)` with faces in the
    /// order +X, -X, +Z, -Z; the top uses `top_uvs`.
    fn push_open_box_with(
        &mut self,
        min: [f32; 3],
        max: [f32; 3],
        top_uvs: [[f32; 2]; 4],
        side_uv: impl Fn(usize) -> [[f32; 2]; 4],
    ) {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;

        self.push_quad(
            [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]],
            UP,
            top_uvs,
        );

        // Each side: bottom, top above it, top across, bottom across.
        #[rustfmt::skip]
        let sides: [([[f32; 3]; 4], [f32; 3]); 4] = [
            ([[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]], [1.0, 0.0, 0.0]),
            ([[x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [x0, y0, z0]], [-1.0, 0.0, 0.0]),
            ([[x1, y0, z1], [x1, y1, z1], [x0, y1, z1], [x0, y0, z1]], [0.0, 0.0, 1.0]),
            ([[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]], [0.0, 0.0, -1.0]),
        ];
        for (i, (corners, normal)) in sides.into_iter().enumerate() {
            self.push_quad(corners, normal, side_uv(i));
        }
    }

    /// Open-bottom box (top + four sides) with plain UVs.
    pub fn push_open_box(&mut self, min: [f32; 3], max: [f32; 3]) {
        self.push_open_box_with(min, max, DEFAULT_UVS, |_| DEFAULT_UVS);
    }
}

/// Unit-height building shell centred on the origin (`y` in `[-0.5, 0.5]`),
/// scaled vertically at render time.
///
/// Textured from a facade atlas whose left `split` share (in U) is the front
/// wall and the rest the side wall. Front and back faces map the front
/// texture, the two sides the side texture. The roof samples the atlas'
/// top-left texel, which is wall color.
pub fn building_shell(width: f32, depth: f32, split: f32) -> MeshData {
    let (hw, hd) = (width * 0.5, depth * 0.5);
    let band = |u0: f32, u1: f32| [[u0, 1.0], [u0, 0.0], [u1, 0.0], [u1, 1.0]];
    let front = band(0.0, split);
    let side = band(split, 1.0);

    let mut mesh = MeshData::default();
    mesh.push_open_box_with(
        [-hw, -0.5, -hd],
        [hw, 0.5, hd],
        [[0.0, 0.0]; 4],
        |face| if face < 2 { side } else { front },
    );
    mesh
}
