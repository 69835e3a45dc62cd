//! Street lamps, brand-accent lights, and branding billboards.
//!
//! Billboards point at remote images. When one fails to load the renderer
//! drops just that decoration; nothing else depends on it.

use bitcode::Encode;

use crate::config::{
    ACCENT_LIGHT_COUNT, ACCENT_LIGHT_LIFT, BADGE_SIZE, BILLBOARD_LIFT, LAMP_EVERY, LAMP_HEIGHT,
    PAD_MARGIN,
};
use crate::layout::BuildingRecord;
use crate::repository::{Branding, Rgba};
use crate::seeded_rng::SeededRng;

#[derive(Debug, Clone, PartialEq, Encode)]
pub struct StreetLamp {
    pub building: u32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Encode)]
pub struct AccentLight {
    pub building: u32,
    pub position: [f32; 3],
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode)]
pub enum BillboardKind {
    /// Website screenshot floating above the tallest building.
    Screenshot,
    /// Favicon badge standing on the roof of an accent-lit building.
    Favicon,
}

#[derive(Debug, Clone, PartialEq, Encode)]
pub struct Billboard {
    pub building: u32,
    pub kind: BillboardKind,
    pub url: String,
    /// Centre of the billboard quad.
    pub position: [f32; 3],
    /// Width and height in world units.
    pub size: [f32; 2],
}

/// A lamp beside every `LAMP_EVERY`-th building. The side of the pad and
/// the slide along that side come from the building's own generator.
pub fn street_lamps(buildings: &[BuildingRecord]) -> Vec<StreetLamp> {
    buildings
        .iter()
        .enumerate()
        .filter(|(i, _)| i % LAMP_EVERY == 0)
        .map(|(i, b)| {
            let mut rng = SeededRng::new(&format!("{}lamp", b.repo.name));
            let corner = rng.index(4);
            let along = rng.next_f64() as f32;
            let sx = if corner & 1 == 0 { 1.0 } else { -1.0 };
            let sz = if corner & 2 == 0 { 1.0 } else { -1.0 };
            let x = b.world_x + sx * (b.width * 0.5 + PAD_MARGIN * 0.5);
            let z = b.world_z + sz * (b.depth * 0.5 + PAD_MARGIN * 0.5) * along;
            StreetLamp {
                building: i as u32,
                position: [x, LAMP_HEIGHT, z],
            }
        })
        .collect()
}

/// Lights above the top `ACCENT_LIGHT_COUNT` buildings, only when branding
/// supplies a usable color.
pub fn accent_lights(
    buildings: &[BuildingRecord],
    branding: Option<&Branding>,
) -> Vec<AccentLight> {
    let Some(color) = branding.and_then(Branding::light_color) else {
        return Vec::new();
    };
    buildings
        .iter()
        .take(ACCENT_LIGHT_COUNT)
        .enumerate()
        .map(|(i, b)| AccentLight {
            building: i as u32,
            position: [b.world_x, b.height + ACCENT_LIGHT_LIFT, b.world_z],
            color,
        })
        .collect()
}

/// Screenshot billboard over the top building and a favicon roof badge on
/// each building in `accents`, for whichever URLs branding provides.
pub fn billboards(
    buildings: &[BuildingRecord],
    branding: Option<&Branding>,
    accents: &[AccentLight],
) -> Vec<Billboard> {
    let Some(branding) = branding else {
        return Vec::new();
    };
    let mut out = Vec::new();

    if let (Some(url), Some(top)) = (branding.screenshot_url.as_deref(), buildings.first()) {
        let width = top.width;
        let height = width * 0.625;
        out.push(Billboard {
            building: 0,
            kind: BillboardKind::Screenshot,
            url: url.to_string(),
            position: [top.world_x, top.height + BILLBOARD_LIFT, top.world_z],
            size: [width, height],
        });
    }

    if let Some(url) = branding.favicon_url.as_deref() {
        for light in accents {
            let Some(b) = buildings.get(light.building as usize) else {
                continue;
            };
            out.push(Billboard {
                building: light.building,
                kind: BillboardKind::Favicon,
                url: url.to_string(),
                position: [b.world_x, b.height + BADGE_SIZE * 0.5, b.world_z],
                size: [BADGE_SIZE, BADGE_SIZE],
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::place_buildings;
    use crate::repository::Repository;

    fn city(n: usize) -> Vec<BuildingRecord> {
        place_buildings(
            (0..n)
                .map(|i| Repository::new(format!("r{i}"), 100 * (n - i) as u64))
                .collect(),
        )
    }

    fn branded() -> Branding {
        Branding {
            primary_color: Some("#ff0000".into()),
            accent_color: Some("#00ffcc".into()),
            favicon_url: Some("https://example.com/favicon.png".into()),
            screenshot_url: Some("https://example.com/shot.png".into()),
        }
    }

    #[test]
    fn test_every_third_building_has_lamp() {
        let buildings = city(10);
        let lamps = street_lamps(&buildings);
        let owners: Vec<u32> = lamps.iter().map(|l| l.building).collect();
        assert_eq!(owners, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_lamp_sits_beside_footprint() {
        let buildings = city(7);
        for lamp in street_lamps(&buildings) {
            let b = &buildings[lamp.building as usize];
            let dx = (lamp.position[0] - b.world_x).abs();
            let dz = (lamp.position[2] - b.world_z).abs();
            assert!(dx > b.width * 0.5, "lamp inside the building");
            assert!(dx < b.width * 0.5 + PAD_MARGIN);
            assert!(dz <= b.depth * 0.5 + PAD_MARGIN);
            assert_eq!(lamp.position[1], LAMP_HEIGHT);
        }
    }

    #[test]
    fn test_lamps_deterministic() {
        assert_eq!(street_lamps(&city(9)), street_lamps(&city(9)));
    }

    #[test]
    fn test_accent_lights_need_branding() {
        let buildings = city(6);
        assert!(accent_lights(&buildings, None).is_empty());
        assert!(accent_lights(&buildings, Some(&Branding::default())).is_empty());
        let lights = accent_lights(&buildings, Some(&branded()));
        assert_eq!(lights.len(), ACCENT_LIGHT_COUNT);
        assert!(lights.iter().all(|l| l.color == [0, 255, 204, 255]));
        assert_eq!(
            lights.iter().map(|l| l.building).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_accent_lights_small_city() {
        let lights = accent_lights(&city(2), Some(&branded()));
        assert_eq!(lights.len(), 2);
    }

    #[test]
    fn test_billboards() {
        let buildings = city(6);
        assert!(billboards(&buildings, None, &[]).is_empty());
        let accents = accent_lights(&buildings, Some(&branded()));
        let boards = billboards(&buildings, Some(&branded()), &accents);
        let shots: Vec<_> = boards
            .iter()
            .filter(|b| b.kind == BillboardKind::Screenshot)
            .collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].building, 0);
        assert!(shots[0].position[1] > buildings[0].height);
        assert_eq!(
            boards
                .iter()
                .filter(|b| b.kind == BillboardKind::Favicon)
                .count(),
            ACCENT_LIGHT_COUNT
        );
    }

    #[test]
    fn test_no_screenshot_for_empty_city() {
        assert!(billboards(&[], Some(&branded()), &[]).is_empty());
    }

    #[test]
    fn test_favicon_without_color_has_no_badges() {
        let buildings = city(6);
        let branding = Branding {
            favicon_url: Some("https://example.com/favicon.png".into()),
            ..Default::default()
        };
        let accents = accent_lights(&buildings, Some(&branding));
        assert!(accents.is_empty());
        assert!(billboards(&buildings, Some(&branding), &accents).is_empty());
    }

    #[test]
    fn test_favicon_badges_sit_on_accent_lit_roofs() {
        let buildings = city(6);
        let accents = accent_lights(&buildings, Some(&branded()));
        let badges: Vec<Billboard> = billboards(&buildings, Some(&branded()), &accents)
            .into_iter()
            .filter(|b| b.kind == BillboardKind::Favicon)
            .collect();
        assert_eq!(
            badges.iter().map(|b| b.building).collect::<Vec<_>>(),
            accents.iter().map(|l| l.building).collect::<Vec<_>>()
        );
        for badge in &badges {
            let b = &buildings[badge.building as usize];
            assert_eq!(badge.position[0], b.world_x);
            assert_eq!(badge.position[2], b.world_z);
            assert!((badge.position[1] - badge.size[1] * 0.5 - b.height).abs() < 1e-4);
        }
    }
}
