//! Star count → building height and floor count.
//!
//! Five growth regimes (three linear, square root, logarithmic) keep a
//! 3-star toy project and a 200K-star framework on the same skyline without
//! the tall end dwarfing everything else. Each segment starts where the
//! previous one ended.

use crate::config::{FLOOR_HEIGHT, MIN_HEIGHT};

/// Height reached at the end of each segment.
const H_AT_5: f64 = 28.0;
const H_AT_50: f64 = 118.0;
const H_AT_500: f64 = 298.0;
const H_AT_5000: f64 = 450.0;

/// Height added per decade of stars beyond 5000.
const LOG_GAIN: f64 = 100.0;

pub fn height_of(stars: u64) -> f32 {
    let s = stars as f64;
    let h = match stars {
        0 => f64::from(MIN_HEIGHT),
        1..=5 => f64::from(MIN_HEIGHT) + 4.0 * s,
        6..=50 => H_AT_5 + 2.0 * (s - 5.0),
        51..=500 => H_AT_50 + 0.4 * (s - 50.0),
        501..=5000 => H_AT_500 + (H_AT_5000 - H_AT_500) * ((s - 500.0) / 4500.0).sqrt(),
        _ => H_AT_5000 + LOG_GAIN * (s / 5000.0).log10(),
    };
    h as f32
}

pub fn floors_of(stars: u64) -> u32 {
    ((height_of(stars) / FLOOR_HEIGHT).round() as u32).max(1)
}
