use bevy::prelude::*;

use citygen::config::LABEL_LIFT;
use citygen::{CityLayout, CityParams, SceneController};

use crate::convert::apply_material_params;
use crate::spawn::{BuildingLabel, BuildingVisual};

/// Scale each shell to its current rise and keep its base on the ground.
/// Labels ride on the roof.
pub fn apply_rise_transforms(
    controller: Res<SceneController>,
    params: Res<CityParams>,
    mut buildings: Query<(&BuildingVisual, &mut Transform), Without<BuildingLabel>>,
    mut labels: Query<(&BuildingLabel, &mut Transform), Without<BuildingVisual>>,
) {
    if !controller.is_changed() {
        return;
    }
    for (visual, mut transform) in &mut buildings {
        let Some(state) = controller.state(visual.index) else {
            continue;
        };
        transform.scale.y = visual.height * state.vertical_scale(&params);
        transform.translation.y = state.center_y(visual.height, &params);
    }
    for (label, mut transform) in &mut labels {
        let Some(state) = controller.state(label.index) else {
            continue;
        };
        let roof = label.height * state.vertical_scale(&params);
        transform.translation.y = roof + LABEL_LIFT + label.half_height;
    }
}

/// Blend toward the dimmed look and add hover glow. Only touches materials
/// whose params actually moved, so settled frames upload nothing.
pub fn apply_building_materials(
    controller: Res<SceneController>,
    params: Res<CityParams>,
    layout: Res<CityLayout>,
    mut buildings: Query<&mut BuildingVisual>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !controller.is_changed() {
        return;
    }
    for mut visual in &mut buildings {
        let Some(building) = layout.buildings.get(visual.index) else {
            continue;
        };
        let target = controller.material_for(&building.material, visual.index, &params);
        if target == visual.applied {
            continue;
        }
        if let Some(material) = materials.get_mut(&visual.material) {
            apply_material_params(material, &target);
        }
        visual.applied = target;
    }
}

/// Turn name plates toward the camera around the vertical axis.
pub fn face_labels_to_camera(
    cameras: Query<&Transform, (With<Camera3d>, Without<BuildingLabel>)>,
    mut labels: Query<&mut Transform, With<BuildingLabel>>,
) {
    let Ok(camera) = cameras.get_single() else {
        return;
    };
    for mut transform in &mut labels {
        let dir = camera.translation - transform.translation;
        if dir.x == 0.0 && dir.z == 0.0 {
            continue;
        }
        transform.rotation = Quat::from_rotation_y(dir.x.atan2(dir.z));
    }
}
