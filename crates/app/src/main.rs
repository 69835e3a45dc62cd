use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use citygen::{CityGenPlugin, SceneController};
use rendering::CityRenderPlugin;

mod inputs;

use inputs::{build_city, InputPaths, SCREENSHOT_ENV};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "RepoCity".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .add_plugins((CityGenPlugin, CityRenderPlugin));

    // Inputs are read after DefaultPlugins so their warnings reach the log.
    let (layout, params) = build_city(&InputPaths::from_env());
    info!(
        "City fingerprint {:08x} ({} buildings)",
        layout.fingerprint(),
        layout.len()
    );
    app.insert_resource(layout).insert_resource(params);

    // Screenshot mode: wait for the rise to settle, capture, exit.
    if let Ok(path) = std::env::var(SCREENSHOT_ENV) {
        app.insert_resource(ScreenshotRequest {
            path,
            settled_frames: 0,
            taken: false,
        });
        app.add_systems(Update, drive_screenshot);
    }

    app.run();
}

#[derive(Resource)]
struct ScreenshotRequest {
    path: String,
    settled_frames: u32,
    taken: bool,
}

/// Frames to wait after settling so desaturation and lights have rendered.
const SETTLE_FRAMES: u32 = 10;

fn drive_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    controller: Res<SceneController>,
    mut exit: EventWriter<AppExit>,
) {
    if !controller.is_settled() {
        return;
    }
    request.settled_frames += 1;

    if !request.taken && request.settled_frames >= SETTLE_FRAMES {
        info!("Saving screenshot to {}", request.path);
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(request.path.clone()));
        request.taken = true;
    } else if request.taken && request.settled_frames >= SETTLE_FRAMES * 3 {
        exit.send(AppExit::Success);
    }
}
