use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use citygen::CityLayout;

const ZOOM_SPEED: f32 = 0.15;
const MIN_DISTANCE: f32 = 30.0;
const MAX_DISTANCE: f32 = 6000.0;
const MIN_PITCH: f32 = 5.0 * std::f32::consts::PI / 180.0; // near street level
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;
const KEY_ROTATE_SPEED: f32 = 1.2; // radians per second

/// Orbital camera: circles a focus point on the ground.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    /// Horizontal rotation in radians
    pub yaw: f32,
    /// Elevation angle in radians, clamped to `[MIN_PITCH, MAX_PITCH]`
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 35.0_f32.to_radians(),
            distance: 400.0,
        }
    }
}

#[derive(Resource, Default)]
pub struct CameraDrag {
    pub orbiting: bool,
    pub panning: bool,
    pub last_pos: Vec2,
}

/// Distance that keeps a city of `radius` and `tallest` building in view.
pub fn framing_distance(radius: f32, tallest: f32) -> f32 {
    (radius * 2.2 + tallest).clamp(MIN_DISTANCE, MAX_DISTANCE)
}

pub fn orbit_to_transform(orbit: &OrbitCamera) -> Transform {
    let x = orbit.distance * orbit.pitch.cos() * orbit.yaw.sin();
    let y = orbit.distance * orbit.pitch.sin();
    let z = orbit.distance * orbit.pitch.cos() * orbit.yaw.cos();
    Transform::from_translation(orbit.focus + Vec3::new(x, y, z)).looking_at(orbit.focus, Vec3::Y)
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((Camera3d::default(), orbit_to_transform(&orbit)));
    commands.insert_resource(orbit);
}

/// Pull back far enough to see a freshly assembled city.
pub fn frame_city(layout: Res<CityLayout>, mut orbit: ResMut<OrbitCamera>) {
    if !layout.is_changed() {
        return;
    }
    // Aim a little above the ground so tall cities sit mid-frame.
    orbit.focus = Vec3::new(0.0, layout.tallest() * 0.25, 0.0);
    orbit.distance = framing_distance(layout.radius(), layout.tallest());
}

pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = orbit_to_transform(&orbit);
}

/// Right drag orbits, middle drag pans along the ground.
pub fn camera_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<CameraDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(pos) = window.cursor_position() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Right) {
        drag.orbiting = true;
        drag.last_pos = pos;
    }
    if buttons.just_pressed(MouseButton::Middle) {
        drag.panning = true;
        drag.last_pos = pos;
    }
    if buttons.just_released(MouseButton::Right) {
        drag.orbiting = false;
    }
    if buttons.just_released(MouseButton::Middle) {
        drag.panning = false;
    }

    let delta = pos - drag.last_pos;
    if delta == Vec2::ZERO {
        return;
    }
    drag.last_pos = pos;

    if drag.orbiting {
        orbit.yaw -= delta.x * ORBIT_SENSITIVITY;
        orbit.pitch = (orbit.pitch + delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    } else if drag.panning {
        let scale = orbit.distance / 1000.0;
        let (sin_yaw, cos_yaw) = orbit.yaw.sin_cos();
        orbit.focus.x += (-delta.x * cos_yaw - delta.y * sin_yaw) * scale;
        orbit.focus.z += (delta.x * sin_yaw - delta.y * cos_yaw) * scale;
    }
}

pub fn camera_zoom(mut scroll_evts: EventReader<MouseWheel>, mut orbit: ResMut<OrbitCamera>) {
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        let factor = 1.0 - dy * ZOOM_SPEED;
        orbit.distance = (orbit.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Q/E: rotate around the focus.
pub fn camera_rotate_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let mut dir = 0.0;
    if keys.pressed(KeyCode::KeyQ) {
        dir -= 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        dir += 1.0;
    }
    if dir != 0.0 {
        orbit.yaw += dir * KEY_ROTATE_SPEED * time.delta_secs();
    }
}
