//! Cursor to building: hover follows the pointer, left click selects,
//! Escape clears the selection.

use bevy::prelude::*;

use citygen::layout::world_to_grid;
use citygen::{CityLayout, SceneController};

/// Ground-plane point under the cursor, if any.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct CursorGround {
    pub hit: Option<Vec2>,
}

/// Building whose footprint contains the ground point `hit` (`x`, `z`).
pub fn pick_building(layout: &CityLayout, hit: Vec2) -> Option<usize> {
    let cell = world_to_grid(hit.x, hit.y);
    let index = layout.building_at(cell.x, cell.z)?;
    let record = &layout.buildings[index].record;
    let inside = (hit.x - record.world_x).abs() <= record.width * 0.5
        && (hit.y - record.world_z).abs() <= record.depth * 0.5;
    inside.then_some(index)
}

/// Intersect a ray with the `y = 0` plane, in front of the origin only.
pub fn ray_ground_hit(origin: Vec3, direction: Vec3) -> Option<Vec2> {
    if direction.y.abs() <= 0.001 {
        return None;
    }
    let t = -origin.y / direction.y;
    if t <= 0.0 {
        return None;
    }
    let hit = origin + direction * t;
    Some(Vec2::new(hit.x, hit.z))
}

pub fn update_cursor_ground(
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut cursor: ResMut<CursorGround>,
) {
    let hit = (|| {
        let window = windows.get_single().ok()?;
        let (camera, cam_transform) = camera_q.get_single().ok()?;
        let screen_pos = window.cursor_position()?;
        let ray = camera.viewport_to_world(cam_transform, screen_pos).ok()?;
        ray_ground_hit(ray.origin, *ray.direction)
    })();
    if cursor.hit != hit {
        cursor.hit = hit;
    }
}

pub fn update_hovered_building(
    cursor: Res<CursorGround>,
    layout: Res<CityLayout>,
    mut controller: ResMut<SceneController>,
) {
    if !cursor.is_changed() && !layout.is_changed() {
        return;
    }
    let hovered = cursor.hit.and_then(|hit| pick_building(&layout, hit));
    if controller.hovered() != hovered {
        controller.set_hovered(hovered);
    }
}

/// Click a building to select it, click it again (or empty ground, or press
/// Escape) to clear.
pub fn select_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut controller: ResMut<SceneController>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        if controller.active().is_some() {
            controller.set_active(None);
        }
        return;
    }
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let clicked = controller.hovered();
    let next = if clicked == controller.active() {
        None
    } else {
        clicked
    };
    if next != controller.active() {
        controller.set_active(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citygen::{assemble, Repository};

    fn two_building_city() -> CityLayout {
        assemble(
            &[Repository::new("a", 0), Repository::new("b", 10_000)],
            None,
        )
    }

    #[test]
    fn test_pick_centre_of_each_building() {
        let layout = two_building_city();
        for (i, b) in layout.buildings.iter().enumerate() {
            let hit = Vec2::new(b.record.world_x, b.record.world_z);
            assert_eq!(pick_building(&layout, hit), Some(i));
        }
    }

    #[test]
    fn test_pick_misses_street_and_empty_cells() {
        let layout = two_building_city();
        let pitch = citygen::config::CELL_PITCH;
        // Midway between the two buildings is street.
        assert_eq!(pick_building(&layout, Vec2::new(pitch * 0.5, 0.0)), None);
        assert_eq!(pick_building(&layout, Vec2::new(-pitch, -pitch)), None);
    }

    #[test]
    fn test_ray_ground_hit() {
        let hit = ray_ground_hit(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        assert_eq!(hit, Some(Vec2::new(10.0, 0.0)));
        assert_eq!(ray_ground_hit(Vec3::Y, Vec3::X), None);
        assert_eq!(ray_ground_hit(Vec3::Y, Vec3::Y), None);
    }

    fn picking_app() -> App {
        let mut app = App::new();
        app.insert_resource(two_building_city())
            .insert_resource(SceneController::new(2))
            .init_resource::<CursorGround>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(
                Update,
                (update_hovered_building, select_on_click).chain(),
            );
        app
    }

    fn hover(app: &mut App, hit: Option<Vec2>) {
        app.world_mut().resource_mut::<CursorGround>().hit = hit;
    }

    fn click(app: &mut App) {
        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        buttons.release(MouseButton::Left);
        buttons.clear();
        buttons.press(MouseButton::Left);
        app.update();
    }

    #[test]
    fn test_hover_and_click_select() {
        let mut app = picking_app();
        hover(&mut app, Some(Vec2::ZERO));
        app.update();
        assert_eq!(app.world().resource::<SceneController>().hovered(), Some(0));

        click(&mut app);
        assert_eq!(app.world().resource::<SceneController>().active(), Some(0));

        // Same building again toggles off.
        click(&mut app);
        assert_eq!(app.world().resource::<SceneController>().active(), None);
    }

    #[test]
    fn test_escape_clears_selection() {
        let mut app = picking_app();
        hover(&mut app, Some(Vec2::ZERO));
        click(&mut app);
        assert_eq!(app.world().resource::<SceneController>().active(), Some(0));

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        assert_eq!(app.world().resource::<SceneController>().active(), None);
    }
}
