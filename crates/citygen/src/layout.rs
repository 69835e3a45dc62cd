//! Spiral placement of buildings on the integer street grid.
//!
//! Buildings are placed in descending-star order along an outward square
//! spiral, so the most starred repositories cluster around the origin.

use bitcode::Encode;

use crate::config::{CELL_PITCH, FOOTPRINT_JITTER, FOOTPRINT_MIN};
use crate::repository::Repository;
use crate::scale::{floors_of, height_of};
use crate::seeded_rng::SeededRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub const ORIGIN: GridCell = GridCell { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

// ---------------------------------------------------------------------------
// Spiral traversal
// ---------------------------------------------------------------------------

/// Clockwise turn order seen from above: +x, +z, -x, -z.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Walks the square spiral: origin, then `steps` cells per leg, turning
/// clockwise after each leg and lengthening the leg after every second turn.
#[derive(Debug, Clone)]
pub struct SpiralIter {
    cell: GridCell,
    dir: usize,
    steps: u32,
    walked: u32,
    turns: u32,
    started: bool,
}

impl SpiralIter {
    pub fn new() -> Self {
        Self {
            cell: GridCell::ORIGIN,
            dir: 0,
            steps: 1,
            walked: 0,
            turns: 0,
            started: false,
        }
    }
}

impl Default for SpiralIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SpiralIter {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if !self.started {
            self.started = true;
            return Some(self.cell);
        }
        let (dx, dz) = DIRECTIONS[self.dir];
        self.cell = self.cell.offset(dx, dz);
        self.walked += 1;
        if self.walked == self.steps {
            self.walked = 0;
            self.dir = (self.dir + 1) % DIRECTIONS.len();
            self.turns += 1;
            if self.turns % 2 == 0 {
                self.steps += 1;
            }
        }
        Some(self.cell)
    }
}

/// The `index`-th spiral cell. Pure: walks a fresh iterator each call.
pub fn spiral_coordinate(index: usize) -> GridCell {
    SpiralIter::new().nth(index).unwrap_or(GridCell::ORIGIN)
}

/// The first `count` spiral cells in one forward pass.
pub fn spiral_coordinates(count: usize) -> Vec<GridCell> {
    SpiralIter::new().take(count).collect()
}

// ---------------------------------------------------------------------------
// Grid <-> world
// ---------------------------------------------------------------------------

pub fn grid_to_world(cell: GridCell) -> (f32, f32) {
    (cell.x as f32 * CELL_PITCH, cell.z as f32 * CELL_PITCH)
}

/// Nearest cell centre to a world position.
pub fn world_to_grid(x: f32, z: f32) -> GridCell {
    GridCell::new(
        (x / CELL_PITCH).round() as i32,
        (z / CELL_PITCH).round() as i32,
    )
}

/// Footprint `(width, depth)` for a repository, stable across regenerations.
pub fn footprint(name: &str) -> (f32, f32) {
    let mut rng = SeededRng::new(name);
    let width = rng.range(FOOTPRINT_MIN, FOOTPRINT_MIN + FOOTPRINT_JITTER);
    let depth = rng.range(FOOTPRINT_MIN, FOOTPRINT_MIN + FOOTPRINT_JITTER);
    (width, depth)
}

// ---------------------------------------------------------------------------
// BuildingRecord
// ---------------------------------------------------------------------------

/// Geometry of one repository's building.
#[derive(Debug, Clone, PartialEq, Encode)]
pub struct BuildingRecord {
    pub repo: Repository,
    pub grid_x: i32,
    pub grid_z: i32,
    pub world_x: f32,
    pub world_z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub floors: u32,
}

impl BuildingRecord {
    pub fn new(repo: Repository, cell: GridCell) -> Self {
        let (world_x, world_z) = grid_to_world(cell);
        let (width, depth) = footprint(&repo.name);
        let height = height_of(repo.stars);
        let floors = floors_of(repo.stars);
        Self {
            repo,
            grid_x: cell.x,
            grid_z: cell.z,
            world_x,
            world_z,
            width,
            depth,
            height,
            floors,
        }
    }

    pub fn cell(&self) -> GridCell {
        GridCell::new(self.grid_x, self.grid_z)
    }
}

/// Place already-sorted repositories on consecutive spiral cells.
pub fn place_buildings(sorted: Vec<Repository>) -> Vec<BuildingRecord> {
    let cells = spiral_coordinates(sorted.len());
    sorted
        .into_iter()
        .zip(cells)
        .map(|(repo, cell)| BuildingRecord::new(repo, cell))
        .collect()
}
