//! Per-frame animation state: buildings rising out of the ground on load,
//! and the desaturation that dims everything but the selected building.

use bevy::log::debug;
use bevy::prelude::*;

use crate::material::MaterialParams;
use crate::params::CityParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RisePhase {
    /// The global clock has not reached this building's start yet.
    #[default]
    Pending,
    Rising,
    /// Terminal. Entered once, for every building at the same tick.
    Settled,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationState {
    /// Eased local rise progress in `[0, 1]`.
    pub rise_progress: f32,
    /// Blend toward the dimmed material, `[0, 1]`.
    pub desat_progress: f32,
    pub hovered: bool,
    pub active: bool,
    pub phase: RisePhase,
    desat_target: f32,
    desat_moving: bool,
}

impl AnimationState {
    /// Vertical scale applied to the unit-height shell. Exactly 1 once settled.
    pub fn vertical_scale(&self, params: &CityParams) -> f32 {
        match self.phase {
            RisePhase::Settled => 1.0,
            _ => self.rise_progress.max(params.min_rise_scale),
        }
    }

    /// Height of the building's centre so its base stays on the ground.
    pub fn center_y(&self, height: f32, params: &CityParams) -> f32 {
        height * self.vertical_scale(params) * 0.5
    }

    /// Whether the desaturation blend has snapped to its target.
    pub fn desat_resting(&self) -> bool {
        !self.desat_moving
    }

    fn retarget(&mut self, target: f32) {
        if self.desat_target != target {
            self.desat_target = target;
            self.desat_moving = true;
        }
    }

    /// Returns whether the blend moved.
    fn approach(&mut self, dt: f32, params: &CityParams) -> bool {
        if !self.desat_moving {
            return false;
        }
        let step = (dt * params.approach_rate).min(1.0);
        self.desat_progress += (self.desat_target - self.desat_progress) * step;
        if (self.desat_target - self.desat_progress).abs() < params.desat_epsilon {
            self.desat_progress = self.desat_target;
            self.desat_moving = false;
        }
        true
    }
}

/// `1 - (1 - x)^3`.
pub fn ease_out_cubic(x: f32) -> f32 {
    let inv = 1.0 - x.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Un-eased progress of building `index` when the shared clock reads `global`.
/// Later buildings start later and, near the end, rise over a shorter span
/// floored at `rise_min_span`.
pub fn local_rise_progress(global: f32, index: usize, params: &CityParams) -> f32 {
    let start = index as f32 * params.rise_delay;
    let span = (1.0 - start).max(params.rise_min_span);
    ((global - start) / span).clamp(0.0, 1.0)
}

/// Owns the global rise clock, every building's `AnimationState`, and the
/// hovered/active selection.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneController {
    global_rise: f32,
    settled: bool,
    states: Vec<AnimationState>,
    active: Option<usize>,
    hovered: Option<usize>,
}

impl SceneController {
    pub fn new(building_count: usize) -> Self {
        let mut controller = Self::default();
        controller.reset(building_count);
        controller
    }

    /// Discard all state and start a fresh rise for `building_count` buildings.
    pub fn reset(&mut self, building_count: usize) {
        debug!("Scene animation reset for {} buildings", building_count);
        self.global_rise = 0.0;
        self.settled = false;
        self.states = vec![AnimationState::default(); building_count];
        self.active = None;
        self.hovered = None;
    }

    pub fn global_rise(&self) -> f32 {
        self.global_rise
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn states(&self) -> &[AnimationState] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&AnimationState> {
        self.states.get(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Advance both machines by `dt` seconds. Returns whether any state moved.
    pub fn tick(&mut self, dt: f32, params: &CityParams) -> bool {
        if dt <= 0.0 {
            return false;
        }
        let rose = self.tick_rise(dt, params);
        let mut dimmed = false;
        for state in &mut self.states {
            dimmed |= state.approach(dt, params);
        }
        rose || dimmed
    }

    fn tick_rise(&mut self, dt: f32, params: &CityParams) -> bool {
        if self.settled {
            return false;
        }
        self.global_rise = (self.global_rise + dt * params.rise_rate).min(1.0);

        if self.global_rise >= 1.0 {
            for state in &mut self.states {
                state.phase = RisePhase::Settled;
                state.rise_progress = 1.0;
            }
            self.settled = true;
            debug!("City rise settled");
            return true;
        }

        let global = self.global_rise;
        for (i, state) in self.states.iter_mut().enumerate() {
            let local = local_rise_progress(global, i, params);
            state.rise_progress = ease_out_cubic(local);
            state.phase = if local > 0.0 {
                RisePhase::Rising
            } else {
                RisePhase::Pending
            };
        }
        true
    }

    /// Select a building (or clear with `None`). Out-of-range indices clear.
    /// Returns whether the selection changed.
    pub fn set_active(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.states.len());
        if index == self.active {
            return false;
        }
        self.active = index;
        for (i, state) in self.states.iter_mut().enumerate() {
            state.active = Some(i) == index;
            let dim = index.is_some() && !state.active;
            state.retarget(if dim { 1.0 } else { 0.0 });
        }
        true
    }

    pub fn set_hovered(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.states.len());
        if index == self.hovered {
            return false;
        }
        if let Some(state) = self.hovered.and_then(|i| self.states.get_mut(i)) {
            state.hovered = false;
        }
        if let Some(state) = index.and_then(|i| self.states.get_mut(i)) {
            state.hovered = true;
        }
        self.hovered = index;
        true
    }

    /// Material for building `index` this frame: its normal params blended
    /// toward the dimmed variant, with the hover boost on top.
    pub fn material_for(
        &self,
        base: &MaterialParams,
        index: usize,
        params: &CityParams,
    ) -> MaterialParams {
        let Some(state) = self.states.get(index) else {
            return *base;
        };
        let mut material = if state.desat_progress > 0.0 {
            base.lerp(&base.desaturated(params), state.desat_progress)
        } else {
            *base
        };
        if state.hovered {
            material.emissive *= params.hover_glow;
        }
        material
    }
}
