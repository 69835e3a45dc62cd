/// Side length of one grid cell in world units (the lot a building sits on).
pub const CELL_SIZE: f32 = 40.0;
/// Width of the street between two neighbouring cells.
pub const STREET_WIDTH: f32 = 12.0;
/// Distance between the centres of two adjacent cells.
pub const CELL_PITCH: f32 = CELL_SIZE + STREET_WIDTH;

/// Smallest building footprint edge.
pub const FOOTPRINT_MIN: f32 = 22.0;
/// Random extra added to each footprint edge, drawn per repository.
pub const FOOTPRINT_JITTER: f32 = 12.0;

/// Height of a repository with zero stars.
pub const MIN_HEIGHT: f32 = 8.0;
/// World height of one floor; also one row of windows.
pub const FLOOR_HEIGHT: f32 = 4.0;

/// Wall length covered by one window column.
pub const WINDOW_CELL_SIZE: f32 = 4.0;
/// Window rows in one facade tile (the tile repeats vertically).
pub const WINDOW_ROWS: u32 = 4;
/// Pixel size of one window cell in the facade raster.
pub const WINDOW_PX: u32 = 8;
/// Minimum number of window columns on any wall.
pub const MIN_WINDOW_COLUMNS: u32 = 2;

/// Longest repository name printed on a label before truncation.
pub const LABEL_MAX_CHARS: usize = 24;
/// Pixels per font pixel on label images.
pub const LABEL_SCALE: u32 = 2;
/// World units per label pixel.
pub const LABEL_WORLD_PER_PX: f32 = 0.25;
/// Gap between a roof and its floating label.
pub const LABEL_LIFT: f32 = 4.0;

/// Pad inflation beyond the building footprint on every side.
pub const PAD_MARGIN: f32 = 3.0;
/// Extruded height of a pad.
pub const PAD_HEIGHT: f32 = 0.6;
/// Road surface height (just above the ground plane).
pub const ROAD_Y: f32 = 0.05;

/// Every n-th building (by sorted index) gets a street lamp.
pub const LAMP_EVERY: usize = 3;
/// Height of the lamp head above the ground.
pub const LAMP_HEIGHT: f32 = 9.0;
/// Number of top buildings that receive a brand-accent light.
pub const ACCENT_LIGHT_COUNT: usize = 4;
/// Height of an accent light above its roof.
pub const ACCENT_LIGHT_LIFT: f32 = 6.0;
/// Height of the screenshot billboard's centre above its roof.
pub const BILLBOARD_LIFT: f32 = 14.0;
/// Edge length of a favicon badge.
pub const BADGE_SIZE: f32 = 6.0;
