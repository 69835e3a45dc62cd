use std::time::Duration;

use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;

use citygen::CitySet;

pub mod animate;
pub mod camera;
pub mod convert;
pub mod picking;
pub mod spawn;

use camera::CameraDrag;
use picking::CursorGround;

/// Bevy side of the city: entities for the current `CityLayout`, animation
/// applied to them each frame, camera, and pointer selection. Expects
/// `citygen::CityGenPlugin` for the resources and phase ordering.
pub struct CityRenderPlugin;

impl Plugin for CityRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraDrag>()
            .init_resource::<CursorGround>()
            .add_systems(Startup, (camera::setup_camera, setup_environment))
            .add_systems(
                Update,
                (
                    spawn::spawn_city.after(citygen::reset_scene_on_layout_change),
                    camera::frame_city,
                )
                    .in_set(CitySet::Layout),
            )
            .add_systems(
                Update,
                (
                    (
                        picking::update_cursor_ground,
                        picking::update_hovered_building,
                        picking::select_on_click,
                    )
                        .chain(),
                    camera::camera_drag,
                    camera::camera_zoom,
                    camera::camera_rotate_keyboard,
                )
                    .in_set(CitySet::Input),
            )
            .add_systems(
                Update,
                (
                    animate::apply_rise_transforms,
                    animate::apply_building_materials,
                    camera::apply_orbit_camera,
                    animate::face_labels_to_camera.after(camera::apply_orbit_camera),
                )
                    .in_set(CitySet::Visual),
            )
            .add_systems(
                Update,
                spawn::drop_failed_decorations.run_if(on_timer(Duration::from_millis(500))),
            );
    }
}

fn setup_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ClearColor(Color::srgb(0.04, 0.05, 0.09)));

    // Dim bluish ambient so lit windows and lamps carry the scene.
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.65, 0.9),
        brightness: 120.0,
    });

    // Moonlight
    commands.spawn((
        DirectionalLight {
            illuminance: 1500.0,
            color: Color::srgb(0.75, 0.8, 1.0),
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20_000.0, 20_000.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.08, 0.09, 0.1),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::IDENTITY,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use citygen::{assemble, Branding, CityGenPlugin, CityLayout, Repository, SceneController};

    use crate::spawn::{
        AccentLightMarker, BuildingLabel, BuildingVisual, CityEntity, RemoteDecoration,
        StreetLampLight,
    };

    fn render_test_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<Image>>()
            .add_plugins(CityGenPlugin)
            .add_systems(
                Update,
                spawn::spawn_city
                    .after(citygen::reset_scene_on_layout_change)
                    .in_set(CitySet::Layout),
            )
            .add_systems(
                Update,
                (
                    animate::apply_rise_transforms,
                    animate::apply_building_materials,
                )
                    .in_set(CitySet::Visual),
            );
        app
    }

    fn advance(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    fn five_repos() -> Vec<Repository> {
        vec![
            Repository::new("kernel", 150_000),
            Repository::new("editor", 30_000),
            Repository::new("shell", 4_000),
            Repository::new("dotfiles", 12),
            Repository::new("scratch", 0),
        ]
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<C>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_spawns_entities_for_layout() {
        let mut app = render_test_app();
        let branding = Branding {
            accent_color: Some("#ff8800".into()),
            ..Default::default()
        };
        app.insert_resource(assemble(&five_repos(), Some(&branding)));
        advance(&mut app, 0.0);

        assert_eq!(count::<BuildingVisual>(&mut app), 5);
        assert_eq!(count::<BuildingLabel>(&mut app), 5);
        assert_eq!(count::<StreetLampLight>(&mut app), 2);
        assert_eq!(count::<AccentLightMarker>(&mut app), 4);
        // Buildings, labels, roads, pads, two lamp poles, two lamp lights, four accents.
        assert_eq!(count::<CityEntity>(&mut app), 5 + 5 + 1 + 1 + 2 + 2 + 4);
    }

    #[test]
    fn test_empty_layout_spawns_nothing() {
        let mut app = render_test_app();
        app.insert_resource(CityLayout::default());
        advance(&mut app, 0.0);
        assert_eq!(count::<CityEntity>(&mut app), 0);
    }

    #[test]
    fn test_billboards_need_asset_server() {
        let mut app = render_test_app();
        let branding = Branding {
            screenshot_url: Some("https://example.com/shot.png".into()),
            ..Default::default()
        };
        app.insert_resource(assemble(&five_repos(), Some(&branding)));
        advance(&mut app, 0.0);
        assert_eq!(count::<RemoteDecoration>(&mut app), 0);
        assert_eq!(count::<BuildingVisual>(&mut app), 5);
    }

    #[test]
    fn test_failed_image_drops_only_its_decoration() {
        use bevy::asset::LoadState;

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .add_plugins(CityGenPlugin)
            .add_systems(
                Update,
                (
                    spawn::spawn_city
                        .after(citygen::reset_scene_on_layout_change)
                        .in_set(CitySet::Layout),
                    spawn::drop_failed_decorations.after(CitySet::Visual),
                ),
            );
        let branding = Branding {
            screenshot_url: Some("repocity_missing_screenshot.png".into()),
            ..Default::default()
        };
        app.insert_resource(assemble(&five_repos(), Some(&branding)));
        app.update();
        assert_eq!(count::<RemoteDecoration>(&mut app), 1);
        assert_eq!(count::<BuildingVisual>(&mut app), 5);

        let image = app
            .world_mut()
            .query::<&RemoteDecoration>()
            .single(app.world())
            .image
            .id();
        let mut failed = false;
        for _ in 0..500 {
            app.update();
            let state = app.world().resource::<AssetServer>().get_load_state(image);
            if matches!(state, Some(LoadState::Failed(_))) {
                failed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(failed, "missing image never reported a failed load");

        app.update();
        assert_eq!(count::<RemoteDecoration>(&mut app), 0);
        assert_eq!(count::<BuildingVisual>(&mut app), 5);
        assert_eq!(count::<BuildingLabel>(&mut app), 5);
    }

    #[test]
    fn test_buildings_rise_to_full_height() {
        let mut app = render_test_app();
        app.insert_resource(assemble(&five_repos(), None));
        for _ in 0..40 {
            advance(&mut app, 0.1);
        }
        assert!(app.world().resource::<SceneController>().is_settled());

        let mut query = app.world_mut().query::<(&BuildingVisual, &Transform)>();
        for (visual, transform) in query.iter(app.world()) {
            assert_eq!(transform.scale.y, visual.height);
            assert_eq!(transform.translation.y, visual.height / 2.0);
        }
    }

    #[test]
    fn test_labels_sit_above_roofs_once_risen() {
        let mut app = render_test_app();
        app.insert_resource(assemble(&five_repos(), None));
        for _ in 0..40 {
            advance(&mut app, 0.1);
        }
        let mut query = app.world_mut().query::<(&BuildingLabel, &Transform)>();
        for (label, transform) in query.iter(app.world()) {
            assert!(transform.translation.y > label.height);
        }
    }

    #[test]
    fn test_replacing_layout_respawns_city() {
        let mut app = render_test_app();
        app.insert_resource(assemble(&five_repos(), None));
        advance(&mut app, 0.1);
        app.insert_resource(assemble(
            &[Repository::new("one", 1), Repository::new("two", 2)],
            None,
        ));
        advance(&mut app, 0.1);
        assert_eq!(count::<BuildingVisual>(&mut app), 2);
        assert_eq!(count::<BuildingLabel>(&mut app), 2);
        assert_eq!(app.world().resource::<SceneController>().states().len(), 2);
    }

    #[test]
    fn test_selection_dims_other_buildings() {
        let mut app = render_test_app();
        app.insert_resource(assemble(&five_repos(), None));
        for _ in 0..40 {
            advance(&mut app, 0.1);
        }
        app.world_mut()
            .resource_mut::<SceneController>()
            .set_active(Some(0));
        for _ in 0..40 {
            advance(&mut app, 0.1);
        }

        let mut query = app.world_mut().query::<&BuildingVisual>();
        let visuals: Vec<BuildingVisual> = query.iter(app.world()).cloned().collect();
        let materials = app.world().resource::<Assets<StandardMaterial>>();
        for visual in visuals {
            let material = materials.get(&visual.material).unwrap();
            let red = material.base_color.to_srgba().red;
            if visual.index == 0 {
                assert!((red - 1.0).abs() < 1e-4);
            } else {
                assert!(red < 0.9, "building {} not dimmed", visual.index);
                assert!(visual.applied.base_color[0] < 0.9);
            }
        }
    }
}
