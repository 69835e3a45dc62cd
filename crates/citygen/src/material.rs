use bitcode::Encode;

use crate::params::CityParams;
use crate::repository::Rgba;
use crate::textures::lit_probability;

/// Share of the brand primary color mixed into a building's tint.
const BRAND_TINT: f32 = 0.2;

/// Renderer-neutral material inputs for one building. `base_color` tints
/// the facade texture; `emissive` scales the window glow.
#[derive(Debug, Clone, Copy, PartialEq, Encode)]
pub struct MaterialParams {
    pub base_color: [f32; 3],
    pub emissive: f32,
}

impl MaterialParams {
    /// White tint (optionally pulled toward the brand color) and a glow that
    /// grows with popularity.
    pub fn for_building(stars: u64, brand_primary: Option<Rgba>) -> Self {
        let mut base_color = [1.0; 3];
        if let Some(primary) = brand_primary {
            for (c, p) in base_color.iter_mut().zip(primary) {
                *c += (f32::from(p) / 255.0 - *c) * BRAND_TINT;
            }
        }
        Self {
            base_color,
            emissive: lit_probability(stars) as f32,
        }
    }

    /// Near-greyscale, dimmer, low-glow variant used when another building
    /// is selected.
    pub fn desaturated(&self, params: &CityParams) -> Self {
        let [r, g, b] = self.base_color;
        let grey = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        let base_color = self
            .base_color
            .map(|c| (c + (grey - c) * params.desat_mix) * params.desat_dim);
        Self {
            base_color,
            emissive: self.emissive * params.desat_glow,
        }
    }

    pub fn lerp(&self, other: &MaterialParams, t: f32) -> Self {
        let mut base_color = self.base_color;
        for (c, o) in base_color.iter_mut().zip(other.base_color) {
            *c += (o - *c) * t;
        }
        Self {
            base_color,
            emissive: self.emissive + (other.emissive - self.emissive) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbranded_is_white() {
        let m = MaterialParams::for_building(0, None);
        assert_eq!(m.base_color, [1.0, 1.0, 1.0]);
        assert!((m.emissive - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_brand_tint() {
        let m = MaterialParams::for_building(0, Some([0, 0, 255, 255]));
        assert!((m.base_color[0] - 0.8).abs() < 1e-6);
        assert_eq!(m.base_color[2], 1.0);
    }

    #[test]
    fn test_popular_buildings_glow_more() {
        let low = MaterialParams::for_building(1, None);
        let high = MaterialParams::for_building(50_000, None);
        assert!(high.emissive > low.emissive);
    }

    #[test]
    fn test_desaturated_is_grey_and_dim() {
        let params = CityParams {
            desat_mix: 1.0,
            ..Default::default()
        };
        let m = MaterialParams {
            base_color: [1.0, 0.0, 0.0],
            emissive: 1.0,
        };
        let d = m.desaturated(&params);
        assert!((d.base_color[0] - d.base_color[1]).abs() < 1e-6);
        assert!((d.base_color[1] - d.base_color[2]).abs() < 1e-6);
        assert!(d.emissive < m.emissive);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = MaterialParams::for_building(10, None);
        let b = a.desaturated(&CityParams::default());
        assert_eq!(a.lerp(&b, 0.0), a);
        let end = a.lerp(&b, 1.0);
        for (x, y) in end.base_color.iter().zip(b.base_color) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
