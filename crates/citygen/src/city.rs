//! Scene assembly: repository list in, complete immutable city out.

use std::collections::HashSet;

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use bitcode::Encode;

use crate::decorations::{
    accent_lights, billboards, street_lamps, AccentLight, Billboard, StreetLamp,
};
use crate::layout::{place_buildings, BuildingRecord};
use crate::material::MaterialParams;
use crate::mesh_data::{building_shell, MeshData};
use crate::raster::RasterImage;
use crate::repository::{parse_repositories, Branding, Repository};
use crate::roads::{pad_mesh, road_mesh, road_segments, RoadSegment};
use crate::textures::{render_label, window_palette, Face, WindowTexture, WALL_COLOR};
use xxhash_rust::xxh32::xxh32;

/// Seed for layout fingerprints.
const FINGERPRINT_SEED: u32 = 0x5EED_C17E;

/// Everything the renderer needs for one building.
#[derive(Debug, Clone, PartialEq, Encode)]
pub struct BuildingData {
    pub record: BuildingRecord,
    pub front: WindowTexture,
    pub side: WindowTexture,
    pub label: RasterImage,
    pub material: MaterialParams,
}

impl BuildingData {
    fn new(record: BuildingRecord, palette: &[[u8; 4]], branding: Option<&Branding>) -> Self {
        let name = &record.repo.name;
        let stars = record.repo.stars;
        let front = WindowTexture::generate(
            name,
            Face::Front,
            record.width,
            stars,
            record.floors,
            palette,
        );
        let side = WindowTexture::generate(
            name,
            Face::Side,
            record.depth,
            stars,
            record.floors,
            palette,
        );
        let label = render_label(name, stars);
        let material = MaterialParams::for_building(stars, branding.and_then(Branding::primary));
        Self {
            record,
            front,
            side,
            label,
            material,
        }
    }

    /// Front and side facades side by side, each stacked to full height.
    pub fn facade_atlas(&self) -> RasterImage {
        self.front
            .full_image()
            .hconcat(&self.side.full_image(), WALL_COLOR)
    }

    /// U coordinate where the side facade starts in `facade_atlas`.
    pub fn facade_split(&self) -> f32 {
        let front = self.front.tile.width as f32;
        front / (front + self.side.tile.width as f32)
    }

    /// Unit-height shell mesh matching `facade_atlas`.
    pub fn shell_mesh(&self) -> MeshData {
        building_shell(self.record.width, self.record.depth, self.facade_split())
    }
}

/// The assembled city. Built once per repository list and never mutated;
/// a new list replaces the whole resource.
#[derive(Resource, Debug, Clone, Default, PartialEq, Encode)]
pub struct CityLayout {
    /// Sorted by descending stars, ties in input order.
    pub buildings: Vec<BuildingData>,
    pub roads: Vec<RoadSegment>,
    pub road_mesh: MeshData,
    pub pad_mesh: MeshData,
    pub lamps: Vec<StreetLamp>,
    pub accent_lights: Vec<AccentLight>,
    pub billboards: Vec<Billboard>,
}

impl CityLayout {
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    /// Index of the building on `(grid_x, grid_z)`, if any.
    pub fn building_at(&self, grid_x: i32, grid_z: i32) -> Option<usize> {
        self.buildings
            .iter()
            .position(|b| b.record.grid_x == grid_x && b.record.grid_z == grid_z)
    }

    /// Distance from the origin to the farthest building corner.
    pub fn radius(&self) -> f32 {
        self.buildings
            .iter()
            .map(|b| {
                let r = &b.record;
                let x = r.world_x.abs() + r.width * 0.5;
                let z = r.world_z.abs() + r.depth * 0.5;
                (x * x + z * z).sqrt()
            })
            .fold(0.0, f32::max)
    }

    pub fn tallest(&self) -> f32 {
        self.buildings
            .iter()
            .map(|b| b.record.height)
            .fold(0.0, f32::max)
    }

    /// Hash of the full layout encoding. Equal layouts hash equal in every
    /// process on every platform.
    pub fn fingerprint(&self) -> u32 {
        xxh32(&bitcode::encode(self), FINGERPRINT_SEED)
    }
}

/// Stable sort by descending stars. Later repositories repeating an earlier
/// name are dropped.
fn sort_repositories(repositories: &[Repository]) -> Vec<Repository> {
    let mut seen = HashSet::new();
    let mut sorted: Vec<Repository> = Vec::with_capacity(repositories.len());
    for repo in repositories {
        if seen.insert(repo.name.as_str()) {
            sorted.push(repo.clone());
        } else {
            warn!("Duplicate repository '{}' ignored", repo.name);
        }
    }
    sorted.sort_by(|a, b| b.stars.cmp(&a.stars));
    sorted
}

/// Build the city for `repositories`. An empty list gives an empty city.
pub fn assemble(repositories: &[Repository], branding: Option<&Branding>) -> CityLayout {
    if repositories.is_empty() {
        debug!("No repositories; assembling an empty city");
        return CityLayout::default();
    }

    let records = place_buildings(sort_repositories(repositories));
    let palette = window_palette(&branding.map(Branding::palette_accents).unwrap_or_default());

    let roads = road_segments(&records);
    let road_mesh = road_mesh(&roads);
    let pad_mesh = pad_mesh(&records);
    let lamps = street_lamps(&records);
    let accent_lights = accent_lights(&records, branding);
    let billboards = billboards(&records, branding, &accent_lights);

    let buildings: Vec<BuildingData> = records
        .into_iter()
        .map(|record| BuildingData::new(record, &palette, branding))
        .collect();

    info!(
        "Assembled city: {} buildings, {} roads, {} lamps, {} accent lights",
        buildings.len(),
        roads.len(),
        lamps.len(),
        accent_lights.len()
    );

    CityLayout {
        buildings,
        roads,
        road_mesh,
        pad_mesh,
        lamps,
        accent_lights,
        billboards,
    }
}

/// Parse and assemble in one step. Malformed input yields an empty city and
/// a warning; the caller decides whether that is a "not found" page.
pub fn assemble_from_json(json: &str, branding: Option<&Branding>) -> CityLayout {
    match parse_repositories(json) {
        Ok(repos) => assemble(&repos, branding),
        Err(e) => {
            warn!("Repository list rejected, showing an empty city: {}", e);
            CityLayout::default()
        }
    }
}
