//! Deterministic repository city: layout, textures, decorations, and the
//! per-frame animation state that brings it to life.

use bevy::prelude::*;

pub mod animation;
pub mod city;
pub mod config;
pub mod decorations;
pub mod error;
pub mod font;
pub mod layout;
pub mod material;
pub mod mesh_data;
pub mod params;
pub mod raster;
pub mod repository;
pub mod roads;
pub mod scale;
pub mod seeded_rng;
pub mod textures;

pub use animation::{AnimationState, RisePhase, SceneController};
pub use city::{assemble, assemble_from_json, BuildingData, CityLayout};
pub use error::CityError;
pub use params::CityParams;
pub use repository::{Branding, Repository};

// ---------------------------------------------------------------------------
// Update phases
// ---------------------------------------------------------------------------

/// Ordered phases for city systems in the `Update` schedule.
///
/// Configured as a chain: `Layout` → `Input` → `Animate` → `Visual`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CitySet {
    /// React to a replaced `CityLayout`: reset animation, respawn entities.
    Layout,
    /// Hover and selection from the pointer.
    Input,
    /// Advance the rise and desaturation clocks.
    Animate,
    /// Apply animation state to transforms and materials.
    Visual,
}

/// Discard in-flight animation whenever a new layout is published.
pub fn reset_scene_on_layout_change(
    layout: Res<CityLayout>,
    mut controller: ResMut<SceneController>,
) {
    if layout.is_changed() {
        controller.reset(layout.len());
    }
}

/// One tick per frame. The controller is only marked changed when the tick
/// actually moved something, so visual systems can skip idle frames.
pub fn advance_scene_clock(
    time: Res<Time>,
    params: Res<CityParams>,
    mut controller: ResMut<SceneController>,
) {
    if controller
        .bypass_change_detection()
        .tick(time.delta_secs(), &params)
    {
        controller.set_changed();
    }
}

pub struct CityGenPlugin;

impl Plugin for CityGenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CityParams>()
            .init_resource::<CityLayout>()
            .init_resource::<SceneController>()
            .configure_sets(
                Update,
                (
                    CitySet::Layout,
                    CitySet::Input,
                    CitySet::Animate,
                    CitySet::Visual,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    reset_scene_on_layout_change.in_set(CitySet::Layout),
                    advance_scene_clock.in_set(CitySet::Animate),
                ),
            );
    }
}
