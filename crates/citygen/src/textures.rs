//! Procedural facade and label textures.
//!
//! A facade tile is `columns x WINDOW_ROWS` window cells. Every cell costs
//! exactly two draws from the face's generator whether it ends up lit or
//! dark, so draw `2k` always decides cell `k`. Changing the lit probability
//! therefore only flips cells between lit and dark; it never moves which
//! cell a given draw lands on, and a lit cell keeps its color.

use bitcode::Encode;

use crate::config::{
    LABEL_MAX_CHARS, LABEL_SCALE, MIN_WINDOW_COLUMNS, WINDOW_CELL_SIZE, WINDOW_PX, WINDOW_ROWS,
};
use crate::font::{pixel_on, ADVANCE, GLYPH_H, GLYPH_W};
use crate::raster::RasterImage;
use crate::repository::Rgba;
use crate::seeded_rng::SeededRng;

/// Warm and cool window lights.
pub const BASE_PALETTE: [Rgba; 5] = [
    [255, 232, 163, 255],
    [255, 244, 214, 255],
    [255, 210, 122, 255],
    [207, 232, 255, 255],
    [168, 216, 255, 255],
];

pub const UNLIT_WINDOW: Rgba = [26, 32, 48, 255];
pub const WALL_COLOR: Rgba = [42, 47, 58, 255];

const LABEL_BACKGROUND: Rgba = [12, 14, 20, 220];
const LABEL_TEXT: Rgba = [235, 238, 245, 255];
const LABEL_STARS: Rgba = [255, 205, 80, 255];
/// Label padding in font pixels.
const LABEL_PADDING: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode)]
pub enum Face {
    Front,
    Side,
}

impl Face {
    pub fn id(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Side => "side",
        }
    }
}

/// Share of lit windows: 0.2 for an unstarred repository, approaching 0.95
/// at 10K stars.
pub fn lit_probability(stars: u64) -> f64 {
    let t = ((stars as f64 + 1.0).log10() / 4.0).min(1.0);
    (0.2 + 0.75 * t).min(0.95)
}

pub fn window_columns(wall: f32) -> u32 {
    ((wall / WINDOW_CELL_SIZE).floor() as u32).max(MIN_WINDOW_COLUMNS)
}

/// Vertical tile copies needed to give every floor a row of windows.
pub fn tile_repeats(floors: u32) -> u32 {
    floors.div_ceil(WINDOW_ROWS).max(1)
}

/// Base palette plus each brand accent twice, which biases lit windows
/// toward the brand colors.
pub fn window_palette(accents: &[Rgba]) -> Vec<Rgba> {
    let mut palette = BASE_PALETTE.to_vec();
    for accent in accents {
        palette.push(*accent);
        palette.push(*accent);
    }
    palette
}

/// Lit/dark decision and color for each window cell, row-major from the
/// top-left.
pub fn window_cells(
    seed: &str,
    columns: u32,
    lit_probability: f64,
    palette: &[Rgba],
) -> Vec<Option<Rgba>> {
    let mut rng = SeededRng::new(seed);
    (0..columns * WINDOW_ROWS)
        .map(|_| {
            let roll = rng.next_f64();
            if roll < lit_probability {
                let i = rng.index(palette.len());
                Some(palette.get(i).copied().unwrap_or(BASE_PALETTE[0]))
            } else {
                // Keep the stream aligned with the lit branch.
                rng.skip();
                None
            }
        })
        .collect()
}

/// Paint a tile from per-cell decisions. Each cell is a framed window of
/// `WINDOW_PX` square.
pub fn render_window_tile(columns: u32, cells: &[Option<Rgba>]) -> RasterImage {
    let mut tile = RasterImage::new(columns * WINDOW_PX, WINDOW_ROWS * WINDOW_PX, WALL_COLOR);
    for (i, cell) in cells.iter().enumerate() {
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        let color = cell.unwrap_or(UNLIT_WINDOW);
        tile.fill_rect(
            col * WINDOW_PX + 1,
            row * WINDOW_PX + 1,
            WINDOW_PX - 2,
            WINDOW_PX - 3,
            color,
        );
    }
    tile
}

/// Window texture for one wall of one building.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct WindowTexture {
    pub face: Face,
    pub columns: u32,
    pub tile: RasterImage,
    /// Vertical copies of `tile` that cover the building.
    pub repeat_y: u32,
    pub lit_count: u32,
}

impl WindowTexture {
    pub fn generate(
        name: &str,
        face: Face,
        wall: f32,
        stars: u64,
        floors: u32,
        palette: &[Rgba],
    ) -> Self {
        let columns = window_columns(wall);
        let seed = format!("{name}{}", face.id());
        let cells = window_cells(&seed, columns, lit_probability(stars), palette);
        let lit_count = cells.iter().filter(|c| c.is_some()).count() as u32;
        Self {
            face,
            columns,
            tile: render_window_tile(columns, &cells),
            repeat_y: tile_repeats(floors),
            lit_count,
        }
    }

    /// The tile stacked to the building's full height.
    pub fn full_image(&self) -> RasterImage {
        self.tile.repeat_vertical(self.repeat_y)
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Repository name cut to `LABEL_MAX_CHARS`, ending in `...` when cut.
pub fn label_text(name: &str) -> String {
    if name.chars().count() <= LABEL_MAX_CHARS {
        return name.to_string();
    }
    let mut out: String = name.chars().take(LABEL_MAX_CHARS - 3).collect();
    out.push_str("...");
    out
}

/// `999`, `1.2K`, `34K`, `1.5M`, `12M`. Truncates rather than rounds.
pub fn format_stars(stars: u64) -> String {
    match stars {
        0..=999 => stars.to_string(),
        1_000..=9_999 => format!("{}.{}K", stars / 1_000, (stars / 100) % 10),
        10_000..=999_999 => format!("{}K", stars / 1_000),
        1_000_000..=9_999_999 => format!("{}.{}M", stars / 1_000_000, (stars / 100_000) % 10),
        _ => format!("{}M", stars / 1_000_000),
    }
}

fn draw_text(img: &mut RasterImage, text: &str, x0: u32, y0: u32, color: Rgba) {
    let s = LABEL_SCALE;
    for (i, c) in text.chars().enumerate() {
        let gx0 = x0 + i as u32 * ADVANCE * s;
        for gy in 0..GLYPH_H {
            for gx in 0..GLYPH_W {
                if pixel_on(c, gx, gy) {
                    img.fill_rect(gx0 + gx * s, y0 + gy * s, s, s, color);
                }
            }
        }
    }
}

/// Two-line name plate: repository name, then star count. Not random.
pub fn render_label(name: &str, stars: u64) -> RasterImage {
    let title = label_text(name);
    let star_line = format!("*{}", format_stars(stars));
    let chars = title.chars().count().max(star_line.chars().count()) as u32;

    let s = LABEL_SCALE;
    let width = (LABEL_PADDING * 2 + chars * ADVANCE - 1) * s;
    let height = (LABEL_PADDING * 2 + GLYPH_H * 2 + 2) * s;
    let mut img = RasterImage::new(width, height, LABEL_BACKGROUND);

    let x0 = LABEL_PADDING * s;
    draw_text(&mut img, &title, x0, LABEL_PADDING * s, LABEL_TEXT);
    draw_text(
        &mut img,
        &star_line,
        x0,
        (LABEL_PADDING + GLYPH_H + 2) * s,
        LABEL_STARS,
    );
    img
}
