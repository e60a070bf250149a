use crate::error::{ReportError, Result};

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];
pub const RED: Rgb = [214, 39, 40];
pub const GREEN: Rgb = [0, 128, 0];
pub const BLUE: Rgb = [0, 0, 255];
/// First colour of the default plotting cycle.
pub const DEFAULT_BLUE: Rgb = [31, 119, 180];

pub const FRAME: Rgb = [64, 64, 64];
pub const GRID: Rgb = [222, 222, 222];

/// Pixel geometry shared by both figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self { width: 1500, height: 480 }
    }
}

impl FigureSize {
    /// Reject sizes too small to hold `panels` stacked plot areas.
    pub fn check(&self, panels: u32) -> Result<()> {
        let min_width = MARGIN_LEFT + MARGIN_RIGHT + 48;
        let min_height = MARGIN_TOP + MARGIN_BOTTOM + PANEL_GAP * panels.saturating_sub(1) + 8 * panels;
        if self.width < min_width || self.height < min_height {
            return Err(ReportError::UnsupportedFigureSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

pub const MARGIN_LEFT: u32 = 60;
pub const MARGIN_RIGHT: u32 = 20;
pub const MARGIN_TOP: u32 = 16;
pub const MARGIN_BOTTOM: u32 = 30;
pub const PANEL_GAP: u32 = 24;
pub const LINE_WIDTH: u32 = 2;
