//! Plain RGBA8 pixel buffers.
//!
//! Texture synthesis only ever writes into these; turning one into an
//! engine texture is the render crate's job.

use bitcode::Encode;

use crate::repository::Rgba;

/// Row-major RGBA8 image, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Out-of-bounds writes are clipped.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        for py in y..y.saturating_add(h).min(self.height) {
            for px in x..x.saturating_add(w).min(self.width) {
                self.pixels[(py * self.width + px) as usize] = color;
            }
        }
    }

    /// Stack `times` copies of this image on top of each other.
    pub fn repeat_vertical(&self, times: u32) -> RasterImage {
        let times = times.max(1);
        let mut pixels = Vec::with_capacity(self.pixels.len() * times as usize);
        for _ in 0..times {
            pixels.extend_from_slice(&self.pixels);
        }
        RasterImage {
            width: self.width,
            height: self.height * times,
            pixels,
        }
    }

    /// Place `right` next to this image. Heights must match; the shorter one
    /// is padded with `fill` otherwise.
    pub fn hconcat(&self, right: &RasterImage, fill: Rgba) -> RasterImage {
        let height = self.height.max(right.height);
        let mut out = RasterImage::new(self.width + right.width, height, fill);
        for y in 0..height {
            for x in 0..self.width {
                if let Some(c) = self.get(x, y) {
                    out.set(x, y, c);
                }
            }
            for x in 0..right.width {
                if let Some(c) = right.get(x, y) {
                    out.set(self.width + x, y, c);
                }
            }
        }
        out
    }

    /// Flatten to tightly packed RGBA bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            data.extend_from_slice(pixel);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];
    const CLEAR: Rgba = [0, 0, 0, 0];

    #[test]
    fn test_set_get_and_clip() {
        let mut img = RasterImage::new(4, 3, CLEAR);
        img.set(3, 2, RED);
        img.set(4, 0, RED);
        img.set(0, 3, RED);
        assert_eq!(img.get(3, 2), Some(RED));
        assert_eq!(img.get(4, 0), None);
        assert_eq!(img.pixels.iter().filter(|p| **p == RED).count(), 1);
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut img = RasterImage::new(4, 4, CLEAR);
        img.fill_rect(2, 2, 10, 10, RED);
        assert_eq!(img.pixels.iter().filter(|p| **p == RED).count(), 4);
    }

    #[test]
    fn test_repeat_vertical_tiles_seamlessly() {
        let mut tile = RasterImage::new(2, 2, CLEAR);
        tile.set(0, 0, RED);
        let tall = tile.repeat_vertical(3);
        assert_eq!(tall.height, 6);
        for y in 0..6 {
            assert_eq!(tall.get(0, y), tile.get(0, y % 2));
            assert_eq!(tall.get(1, y), tile.get(1, y % 2));
        }
    }

    #[test]
    fn test_repeat_zero_is_one_copy() {
        let tile = RasterImage::new(2, 2, RED);
        assert_eq!(tile.repeat_vertical(0), tile);
    }

    #[test]
    fn test_hconcat() {
        let left = RasterImage::new(2, 2, RED);
        let right = RasterImage::new(3, 1, BLUE);
        let out = left.hconcat(&right, CLEAR);
        assert_eq!((out.width, out.height), (5, 2));
        assert_eq!(out.get(1, 1), Some(RED));
        assert_eq!(out.get(2, 0), Some(BLUE));
        assert_eq!(out.get(2, 1), Some(CLEAR));
    }

    #[test]
    fn test_to_bytes_layout() {
        let mut img = RasterImage::new(2, 1, CLEAR);
        img.set(1, 0, [1, 2, 3, 4]);
        assert_eq!(img.to_bytes(), vec![0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
