//! Runtime-tunable animation and decoration parameters.
//!
//! Geometry constants live in `config`; everything here can be overridden
//! from a JSON file without recompiling. Missing keys keep their defaults.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CityError;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityParams {
    /// Global rise clock advance per second (1.0 / seconds to full city).
    pub rise_rate: f32,
    /// Clock offset between consecutive buildings' rise starts.
    pub rise_delay: f32,
    /// Shortest local rise span, so late buildings still ease in.
    pub rise_min_span: f32,
    /// Vertical scale of a building that has not started rising.
    pub min_rise_scale: f32,
    /// Desaturation approach rate per second.
    pub approach_rate: f32,
    /// Distance to target under which desaturation snaps and rests.
    pub desat_epsilon: f32,
    /// How far a dimmed building's color moves toward its grey value.
    pub desat_mix: f32,
    /// Brightness multiplier for dimmed buildings.
    pub desat_dim: f32,
    /// Emissive multiplier for dimmed buildings.
    pub desat_glow: f32,
    /// Emissive multiplier for the hovered building.
    pub hover_glow: f32,
    pub lamp_intensity: f32,
    pub lamp_range: f32,
    pub accent_intensity: f32,
    pub accent_range: f32,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            rise_rate: 0.5,
            rise_delay: 0.015,
            rise_min_span: 0.25,
            min_rise_scale: 0.001,
            approach_rate: 8.0,
            desat_epsilon: 0.001,
            desat_mix: 0.85,
            desat_dim: 0.55,
            desat_glow: 0.2,
            hover_glow: 1.8,
            lamp_intensity: 150_000.0,
            lamp_range: 40.0,
            accent_intensity: 2_000_000.0,
            accent_range: 120.0,
        }
    }
}

impl CityParams {
    pub fn validate(&self) -> Result<(), CityError> {
        let positive = [
            ("rise_rate", self.rise_rate),
            ("rise_min_span", self.rise_min_span),
            ("min_rise_scale", self.min_rise_scale),
            ("approach_rate", self.approach_rate),
            ("desat_epsilon", self.desat_epsilon),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(CityError::InvalidParams(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.rise_delay) {
            return Err(CityError::InvalidParams(format!(
                "rise_delay must be in [0, 1), got {}",
                self.rise_delay
            )));
        }
        let unit = [
            ("desat_mix", self.desat_mix),
            ("desat_dim", self.desat_dim),
            ("desat_glow", self.desat_glow),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(CityError::InvalidParams(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, CityError> {
        let params: CityParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: &Path) -> Result<Self, CityError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
