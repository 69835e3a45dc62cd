//! Street network between neighbouring buildings, plus the pads under them.

use std::collections::HashMap;

use bitcode::Encode;

use crate::config::{CELL_PITCH, PAD_HEIGHT, PAD_MARGIN, ROAD_Y, STREET_WIDTH};
use crate::layout::{BuildingRecord, GridCell};
use crate::mesh_data::MeshData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode)]
pub enum Orientation {
    /// Runs along x, between a cell and its east neighbour.
    EastWest,
    /// Runs along z, between a cell and its north neighbour.
    NorthSouth,
}

/// A straight street joining the centres of two adjacent buildings.
#[derive(Debug, Clone, PartialEq, Encode)]
pub struct RoadSegment {
    /// Sorted index of the west/south building.
    pub from: u32,
    /// Sorted index of the east/north building.
    pub to: u32,
    pub orientation: Orientation,
    /// World `(x, z)` of the two endpoints.
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub length: f32,
}

/// One segment per pair of orthogonally adjacent occupied cells.
///
/// Only the east (`x + 1`) and north (`z + 1`) neighbours are checked, so a
/// shared edge is found from exactly one side. Output order follows the
/// building order.
pub fn road_segments(buildings: &[BuildingRecord]) -> Vec<RoadSegment> {
    let occupied: HashMap<GridCell, usize> = buildings
        .iter()
        .enumerate()
        .map(|(i, b)| (b.cell(), i))
        .collect();

    let mut segments = Vec::new();
    for (i, building) in buildings.iter().enumerate() {
        for (dx, dz, orientation) in [
            (1, 0, Orientation::EastWest),
            (0, 1, Orientation::NorthSouth),
        ] {
            let Some(&j) = occupied.get(&building.cell().offset(dx, dz)) else {
                continue;
            };
            let other = &buildings[j];
            segments.push(RoadSegment {
                from: i as u32,
                to: j as u32,
                orientation,
                start: [building.world_x, building.world_z],
                end: [other.world_x, other.world_z],
                length: CELL_PITCH,
            });
        }
    }
    segments
}

/// All segments as one flat mesh, `STREET_WIDTH` wide.
pub fn road_mesh(segments: &[RoadSegment]) -> MeshData {
    let half = STREET_WIDTH * 0.5;
    let mut mesh = MeshData::default();
    for seg in segments {
        let [sx, sz] = seg.start;
        let [ex, ez] = seg.end;
        match seg.orientation {
            Orientation::EastWest => {
                mesh.push_ground_quad(sx.min(ex), sx.max(ex), sz - half, sz + half, ROAD_Y)
            }
            Orientation::NorthSouth => {
                mesh.push_ground_quad(sx - half, sx + half, sz.min(ez), sz.max(ez), ROAD_Y)
            }
        }
    }
    mesh
}

/// Pads (footprint plus `PAD_MARGIN`) under every building, merged.
pub fn pad_mesh(buildings: &[BuildingRecord]) -> MeshData {
    let mut mesh = MeshData::default();
    for b in buildings {
        let hw = b.width * 0.5 + PAD_MARGIN;
        let hd = b.depth * 0.5 + PAD_MARGIN;
        mesh.push_open_box(
            [b.world_x - hw, 0.0, b.world_z - hd],
            [b.world_x + hw, PAD_HEIGHT, b.world_z + hd],
        );
    }
    mesh
}
