//! Colors, marker color sampling and region palettes
//!
//! Hue is in degrees (0-359); saturation, value and alpha are 0-255.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::partition::RegionId;
use crate::settings::Level;

/// An HSV color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsva {
    pub h: u16,
    pub s: u8,
    pub v: u8,
    pub a: u8,
}

impl Hsva {
    /// Marker color shown while the sampled background is too dull to match
    pub const TRANSPARENT: Hsva = Hsva {
        h: 0,
        s: 0,
        v: 255,
        a: 0,
    };

    /// # Panics
    ///
    /// Panics if `h` is above 359.
    pub fn new(h: u16, s: u8, v: u8, a: u8) -> Self {
        assert!(h <= 359, "hue {h} out of range 0..=359");
        Self { h, s, v, a }
    }

    /// Opaque color
    pub fn opaque(h: u16, s: u8, v: u8) -> Self {
        Self::new(h, s, v, 255)
    }
}

/// Circular distance between two hues, in degrees (0-180)
pub fn hue_distance(a: u16, b: u16) -> u16 {
    let diff = a.abs_diff(b) % 360;
    diff.min(360 - diff)
}

/// Convert an RGB triple (components 0-255) to integer HSV
///
/// Grey inputs get hue 0. Components are floored and clipped to their ranges.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (u16, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max != 0.0 { delta / max * 255.0 } else { 0.0 };

    (
        h.clamp(0.0, 359.0).floor() as u16,
        s.clamp(0.0, 255.0).floor() as u8,
        max.clamp(0.0, 255.0).floor() as u8,
    )
}

/// Sampling grid used to read the marker color from the camera image
pub const SAMPLE_COLS: u32 = 25;
pub const SAMPLE_ROWS: u32 = 25;
/// Pixel spacing between samples
pub const SAMPLE_SPACING: f32 = 2.0;

/// Pixel coordinates sampled around the viewport center, clamped to the viewport
pub fn sample_grid(width: f32, height: f32) -> Vec<(f32, f32)> {
    let center_x = (SAMPLE_COLS / 2) as f32;
    let center_y = (SAMPLE_ROWS / 2) as f32;
    let mut points = Vec::with_capacity((SAMPLE_COLS * SAMPLE_ROWS) as usize);
    for y in 0..SAMPLE_ROWS {
        for x in 0..SAMPLE_COLS {
            let px = width / 2.0 + (x as f32 - center_x) * SAMPLE_SPACING;
            let py = height / 2.0 + (y as f32 - center_y) * SAMPLE_SPACING;
            points.push((
                px.clamp(0.0, (width - 1.0).max(0.0)),
                py.clamp(0.0, (height - 1.0).max(0.0)),
            ));
        }
    }
    points
}

/// Saturation the marker is drawn with while it carries a color
pub const MARKER_SATURATION: u8 = 80;

/// Marker color derived from sampled background pixels
///
/// The samples are averaged. An average at least as saturated as
/// `saturation_floor` shows up as a vivid color with the average hue, anything
/// else as transparent white. The vivid color is drawn at
/// [`MARKER_SATURATION`], raised to the floor when the floor is higher so the
/// marker still passes the same floor when matched.
pub fn marker_color_from_samples(samples: &[[u8; 3]], saturation_floor: u8) -> Hsva {
    if samples.is_empty() {
        return Hsva::TRANSPARENT;
    }

    let mut sum = [0.0f32; 3];
    for px in samples {
        for (acc, &c) in sum.iter_mut().zip(px) {
            *acc += c as f32;
        }
    }
    let n = samples.len() as f32;
    let (h, s, _) = rgb_to_hsv(sum[0] / n, sum[1] / n, sum[2] / n);

    if s >= saturation_floor {
        Hsva::new(h, MARKER_SATURATION.max(saturation_floor), 100, 255)
    } else {
        Hsva::TRANSPARENT
    }
}

/// Hues region colors are drawn from on the easy level
pub const EASY_HUES: [u16; 7] = [0, 25, 50, 125, 200, 230, 330];
pub const REGION_SATURATION: u8 = 50;
pub const REGION_VALUE: u8 = 80;

/// Region colors indexed by palette slot; slot 0 is a reserved dummy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    level: Level,
    colors: Vec<Hsva>,
}

impl Palette {
    /// Generate colors for regions `1..=regions`
    pub fn generate<R: Rng + ?Sized>(level: Level, regions: usize, rng: &mut R) -> Self {
        let mut palette = Self {
            level,
            colors: vec![Hsva::TRANSPARENT],
        };
        palette.ensure_len(regions + 1, rng);
        palette
    }

    /// Build a palette from explicit region colors (slot 1 onward)
    pub fn from_colors(level: Level, region_colors: impl IntoIterator<Item = Hsva>) -> Self {
        let mut colors = vec![Hsva::TRANSPARENT];
        colors.extend(region_colors);
        Self { level, colors }
    }

    /// Grow the palette to at least `len` slots
    pub fn ensure_len<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) {
        while self.colors.len() < len {
            let hue = match self.level {
                Level::Easy => EASY_HUES[rng.random_range(0..EASY_HUES.len())],
                Level::Normal | Level::Hard => rng.random_range(0..=359),
            };
            self.colors.push(Hsva::opaque(hue, REGION_SATURATION, REGION_VALUE));
        }
    }

    /// Number of slots, including the dummy
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when no region has a color yet; the reserved slot does not count
    pub fn is_empty(&self) -> bool {
        self.colors.len() <= 1
    }

    pub fn color(&self, region: RegionId) -> Hsva {
        self.colors[region.palette_slot()]
    }
}
