//! Inputs supplied by the repository and branding providers.

use std::path::Path;

use bevy::log::warn;
use bitcode::Encode;
use serde::{Deserialize, Serialize};

use crate::error::CityError;

/// RGBA8 color.
pub type Rgba = [u8; 4];

/// One repository of the organisation being visualised. `name` is the
/// unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode)]
pub struct Repository {
    pub name: String,
    pub stars: u64,
    #[serde(default)]
    pub description: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, stars: u64) -> Self {
        Self {
            name: name.into(),
            stars,
            description: String::new(),
        }
    }
}

/// Optional organisation branding. Absent fields mean "no branding";
/// unparseable colors are treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub favicon_url: Option<String>,
    pub screenshot_url: Option<String>,
}

impl Branding {
    pub fn primary(&self) -> Option<Rgba> {
        parse_optional_color(self.primary_color.as_deref())
    }

    pub fn accent(&self) -> Option<Rgba> {
        parse_optional_color(self.accent_color.as_deref())
    }

    /// Colors that extend the window palette: primary then accent, each
    /// present one once.
    pub fn palette_accents(&self) -> Vec<Rgba> {
        self.primary().into_iter().chain(self.accent()).collect()
    }

    /// Color for the accent lights on the tallest buildings.
    pub fn light_color(&self) -> Option<Rgba> {
        self.accent().or_else(|| self.primary())
    }

    pub fn from_json(json: &str) -> Result<Self, CityError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn parse_optional_color(value: Option<&str>) -> Option<Rgba> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match parse_hex_color(value) {
        Ok(color) => Some(color),
        Err(e) => {
            warn!("Ignoring branding color: {}", e);
            None
        }
    }
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into opaque RGBA.
pub fn parse_hex_color(value: &str) -> Result<Rgba, CityError> {
    let invalid = || CityError::InvalidColor(value.to_string());
    let hex = value.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                out[i] = v * 17;
            }
            Ok(out)
        }
        6 => Ok([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ]),
        _ => Err(invalid()),
    }
}

/// Parse a JSON array of repositories.
///
/// Entries with a blank name are dropped with a warning; anything that is
/// not an array of `{name, stars, description?}` objects is rejected.
pub fn parse_repositories(json: &str) -> Result<Vec<Repository>, CityError> {
    let repos: Vec<Repository> = serde_json::from_str(json)?;
    let before = repos.len();
    let repos: Vec<Repository> = repos
        .into_iter()
        .filter(|r| !r.name.trim().is_empty())
        .collect();
    if repos.len() != before {
        warn!(
            "Dropped {} repositories with an empty name",
            before - repos.len()
        );
    }
    Ok(repos)
}

pub fn load_repositories(path: &Path) -> Result<Vec<Repository>, CityError> {
    let json = std::fs::read_to_string(path)?;
    parse_repositories(&json)
}

pub fn load_branding(path: &Path) -> Result<Branding, CityError> {
    let json = std::fs::read_to_string(path)?;
    Branding::from_json(&json)
}
