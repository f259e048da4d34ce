//! Sprite decoding and half-block rendering

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};

const ALPHA_CUTOFF: u8 = 128;

#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("sprite has no visible pixels")]
    Empty,
}

/// RGBA pixels of a sprite, cropped to its visible bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, SpriteError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    let (min_x, min_y, max_x, max_y) = bounds.ok_or(SpriteError::Empty)?;

    let crop_width = max_x - min_x + 1;
    let crop_height = max_y - min_y + 1;
    let mut pixels = Vec::with_capacity((crop_width * crop_height) as usize);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            pixels.push(image.get_pixel(x, y).0);
        }
    }
    Ok(SpriteData {
        width: crop_width,
        height: crop_height,
        pixels,
    })
}

impl SpriteData {
    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = *self.pixels.get((y * self.width + x) as usize)?;
        (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
    }

    /// Cell size that fits `max_cols` x `max_rows` keeping the aspect ratio.
    /// Each cell covers one pixel column and two pixel rows.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if max_cols == 0 || max_rows == 0 || self.width == 0 || self.height == 0 {
            return (0, 0);
        }
        let scale_x = f32::from(max_cols) / self.width as f32;
        let scale_y = f32::from(max_rows) * 2.0 / self.height as f32;
        let scale = scale_x.min(scale_y);
        let cols = (self.width as f32 * scale).round().clamp(1.0, f32::from(max_cols));
        let rows = (self.height as f32 * scale / 2.0)
            .ceil()
            .clamp(1.0, f32::from(max_rows));
        (cols as u16, rows as u16)
    }

    /// Nearest-neighbour downsample into half-block lines.
    pub fn to_lines(&self, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
        let (cols, rows) = self.fit(max_cols, max_rows);
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let target_height = u32::from(rows) * 2;
        let sample = |col: u32, row: u32| {
            let x = col * self.width / u32::from(cols);
            let y = row * self.height / target_height;
            self.pixel(x, y)
        };

        (0..u32::from(rows))
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..u32::from(cols))
                    .map(|col| {
                        let top = sample(col, row * 2);
                        let bottom = sample(col, row * 2 + 1);
                        half_block(top, bottom)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn half_block(top: Option<Color>, bottom: Option<Color>) -> Span<'static> {
    match (top, bottom) {
        (None, None) => Span::raw(" "),
        (Some(top), None) => Span::styled("▀", Style::default().fg(top)),
        (None, Some(bottom)) => Span::styled("▄", Style::default().fg(bottom)),
        (Some(top), Some(bottom)) => Span::styled("▀", Style::default().fg(top).bg(bottom)),
    }
}
