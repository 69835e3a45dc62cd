//! Turn a `CityLayout` into entities. Runs whenever the layout resource is
//! replaced; every entity it spawns carries `CityEntity` so the next layout
//! can clear the scene in one pass.

use bevy::asset::LoadState;
use bevy::log::{debug, info, warn};
use bevy::prelude::*;

use citygen::config::{LABEL_LIFT, LABEL_WORLD_PER_PX, LAMP_HEIGHT};
use citygen::decorations::{Billboard, BillboardKind};
use citygen::material::MaterialParams;
use citygen::{CityLayout, CityParams};

use crate::convert::{
    building_material, color_from_rgba, image_from_raster, mesh_from_data, sign_material,
};

/// Lamp light color, a warm sodium tone.
const LAMP_COLOR: Color = Color::srgb(1.0, 0.82, 0.55);
const LAMP_POLE_WIDTH: f32 = 0.5;

/// Everything spawned for the current layout.
#[derive(Component)]
pub struct CityEntity;

#[derive(Component, Debug, Clone)]
pub struct BuildingVisual {
    /// Index into `CityLayout::buildings`.
    pub index: usize,
    pub height: f32,
    pub material: Handle<StandardMaterial>,
    /// Last params written into `material`.
    pub applied: MaterialParams,
}

/// Floating name plate; rides on top of its building as it rises.
#[derive(Component, Debug, Clone)]
pub struct BuildingLabel {
    pub index: usize,
    pub height: f32,
    pub half_height: f32,
}

/// Decoration textured from a remote image that may never arrive.
#[derive(Component, Debug, Clone)]
pub struct RemoteDecoration {
    pub image: Handle<Image>,
    pub url: String,
}

#[derive(Component)]
pub struct StreetLampLight;

#[derive(Component)]
pub struct AccentLightMarker;

#[allow(clippy::too_many_arguments)]
pub fn spawn_city(
    mut commands: Commands,
    layout: Res<CityLayout>,
    params: Res<CityParams>,
    existing: Query<Entity, With<CityEntity>>,
    asset_server: Option<Res<AssetServer>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !layout.is_changed() {
        return;
    }

    let cleared = existing.iter().count();
    for entity in &existing {
        commands.entity(entity).despawn_recursive();
    }
    if cleared > 0 {
        debug!("Cleared {} entities from the previous city", cleared);
    }
    if layout.is_empty() {
        return;
    }

    spawn_ground_geometry(&mut commands, &layout, &mut meshes, &mut materials);

    for (index, building) in layout.buildings.iter().enumerate() {
        let record = &building.record;
        let atlas = images.add(image_from_raster(&building.facade_atlas()));
        let material = materials.add(building_material(atlas, &building.material));
        commands.spawn((
            CityEntity,
            BuildingVisual {
                index,
                height: record.height,
                material: material.clone(),
                applied: building.material,
            },
            Mesh3d(meshes.add(mesh_from_data(&building.shell_mesh()))),
            MeshMaterial3d(material),
            Transform::from_xyz(record.world_x, 0.0, record.world_z).with_scale(Vec3::new(
                1.0,
                record.height * params.min_rise_scale,
                1.0,
            )),
        ));

        let label = &building.label;
        let (w, h) = (
            label.width as f32 * LABEL_WORLD_PER_PX,
            label.height as f32 * LABEL_WORLD_PER_PX,
        );
        let texture = images.add(image_from_raster(label));
        commands.spawn((
            CityEntity,
            BuildingLabel {
                index,
                height: record.height,
                half_height: h * 0.5,
            },
            Mesh3d(meshes.add(Rectangle::new(w, h))),
            MeshMaterial3d(materials.add(sign_material(texture))),
            Transform::from_xyz(record.world_x, LABEL_LIFT + h * 0.5, record.world_z),
        ));
    }

    spawn_lights(&mut commands, &layout, &params, &mut meshes, &mut materials);

    match asset_server {
        Some(asset_server) => {
            for billboard in &layout.billboards {
                spawn_billboard(
                    &mut commands,
                    billboard,
                    &asset_server,
                    &mut meshes,
                    &mut materials,
                );
            }
        }
        None if !layout.billboards.is_empty() => {
            debug!("No asset server; skipping {} billboards", layout.billboards.len());
        }
        None => {}
    }

    info!("Spawned city with {} buildings", layout.len());
}

fn spawn_ground_geometry(
    commands: &mut Commands,
    layout: &CityLayout,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    if !layout.road_mesh.is_empty() {
        commands.spawn((
            CityEntity,
            Mesh3d(meshes.add(mesh_from_data(&layout.road_mesh))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.16, 0.17, 0.2),
                perceptual_roughness: 0.95,
                ..default()
            })),
            Transform::IDENTITY,
        ));
    }
    if !layout.pad_mesh.is_empty() {
        commands.spawn((
            CityEntity,
            Mesh3d(meshes.add(mesh_from_data(&layout.pad_mesh))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.42, 0.44, 0.47),
                perceptual_roughness: 0.9,
                ..default()
            })),
            Transform::IDENTITY,
        ));
    }
}

fn spawn_lights(
    commands: &mut Commands,
    layout: &CityLayout,
    params: &CityParams,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let pole = meshes.add(Cuboid::new(LAMP_POLE_WIDTH, LAMP_HEIGHT, LAMP_POLE_WIDTH));
    let pole_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.22),
        emissive: LinearRgba::rgb(1.0, 0.8, 0.5),
        ..default()
    });

    for lamp in &layout.lamps {
        let [x, y, z] = lamp.position;
        commands.spawn((
            CityEntity,
            Mesh3d(pole.clone()),
            MeshMaterial3d(pole_material.clone()),
            Transform::from_xyz(x, LAMP_HEIGHT * 0.5, z),
        ));
        commands.spawn((
            CityEntity,
            StreetLampLight,
            PointLight {
                color: LAMP_COLOR,
                intensity: params.lamp_intensity,
                range: params.lamp_range,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(x, y, z),
        ));
    }

    for accent in &layout.accent_lights {
        let [x, y, z] = accent.position;
        commands.spawn((
            CityEntity,
            AccentLightMarker,
            PointLight {
                color: color_from_rgba(accent.color),
                intensity: params.accent_intensity,
                range: params.accent_range,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(x, y, z),
        ));
    }
}

fn spawn_billboard(
    commands: &mut Commands,
    billboard: &Billboard,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let image: Handle<Image> = asset_server.load(billboard.url.clone());
    let [x, y, z] = billboard.position;
    let [w, h] = billboard.size;
    let mut transform = Transform::from_xyz(x, y, z);
    if billboard.kind == BillboardKind::Screenshot {
        // Tilt back slightly so it reads from a raised camera.
        transform.rotate_x(-0.3);
    }
    commands.spawn((
        CityEntity,
        RemoteDecoration {
            image: image.clone(),
            url: billboard.url.clone(),
        },
        Mesh3d(meshes.add(Rectangle::new(w, h))),
        MeshMaterial3d(materials.add(sign_material(image))),
        transform,
    ));
}

/// Remove billboards and badges whose image failed to load. The rest of the
/// city is unaffected.
pub fn drop_failed_decorations(
    mut commands: Commands,
    asset_server: Option<Res<AssetServer>>,
    decorations: Query<(Entity, &RemoteDecoration)>,
) {
    let Some(asset_server) = asset_server else {
        return;
    };
    for (entity, decoration) in &decorations {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(decoration.image.id()) {
            warn!(
                "Dropping decoration: image '{}' failed to load: {}",
                decoration.url, err
            );
            commands.entity(entity).despawn_recursive();
        }
    }
}
