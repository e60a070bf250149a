use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::error::Result;
use crate::render::style::{Rgb, FRAME, GRID, WHITE};
use crate::render::RenderedImage;

/// Pixel rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Rect {
    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }
}

/// Data range mapped onto one pixel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Range over the finite values, padded by `pad` of its span. A flat or
    /// empty input still yields a non-degenerate range.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a f64>, pad: f64) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !min.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        if min == max {
            return Self { min: min - 1.0, max: max + 1.0 };
        }
        let margin = (max - min) * pad;
        Self { min: min - margin, max: max + margin }
    }

    /// Fraction of the way from `min` to `max`.
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

/// Owned raster surface. Every figure gets a fresh one.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, image::Rgb(WHITE)),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Set one pixel; coordinates outside the canvas are ignored.
    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && x < self.img.width() as i64 && y < self.img.height() as i64 {
            self.img.put_pixel(x as u32, y as u32, image::Rgb(color));
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        let (r, b) = (rect.right() - 1, rect.bottom() - 1);
        self.line(rect.x, rect.y, r, rect.y, color, 1);
        self.line(rect.x, b, r, b, color, 1);
        self.line(rect.x, rect.y, rect.x, b, color, 1);
        self.line(r, rect.y, r, b, color, 1);
    }

    /// Bresenham line with a square pen of `width` pixels.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb, width: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        let half = width as i64 / 2;
        loop {
            for oy in 0..width as i64 {
                for ox in 0..width as i64 {
                    self.put(x + ox - half, y + oy - half, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Panel frame with `divisions` horizontal grid lines and matching
    /// tick marks on the left edge.
    pub fn frame(&mut self, area: Rect, divisions: u32) {
        for i in 1..divisions {
            let y = area.y + area.h * i as i64 / divisions as i64;
            self.line(area.x + 1, y, area.right() - 2, y, GRID, 1);
            self.line(area.x - 5, y, area.x - 1, y, FRAME, 1);
        }
        self.stroke_rect(area, FRAME);
    }

    pub fn encode_png(self, caption: String) -> Result<RenderedImage> {
        let (width, height) = (self.img.width(), self.img.height());
        let mut bytes = Vec::new();
        self.img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(RenderedImage { bytes, width, height, caption })
    }
}
