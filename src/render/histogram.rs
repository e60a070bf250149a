use serde::Serialize;

use crate::error::Result;
use crate::render::canvas::{Canvas, Rect};
use crate::render::style::{FigureSize, DEFAULT_BLUE, FRAME, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP};
use crate::render::RenderedImage;

/// Flagged-row counts for each hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourHistogram {
    pub counts: [u64; 24],
}

impl HourHistogram {
    pub fn from_hours(hours: &[u32]) -> Self {
        let mut counts = [0u64; 24];
        for &h in hours {
            counts[(h % 24) as usize] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn peak(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Hour with the most flagged rows; earliest hour wins ties.
    pub fn busiest_hour(&self) -> Option<u32> {
        let peak = self.peak();
        if peak == 0 {
            return None;
        }
        self.counts.iter().position(|&c| c == peak).map(|h| h as u32)
    }
}

pub fn render(hist: &HourHistogram, fault_number: u8, size: FigureSize) -> Result<RenderedImage> {
    size.check(1)?;
    let mut canvas = Canvas::new(size.width, size.height);
    let area = Rect {
        x: MARGIN_LEFT as i64,
        y: MARGIN_TOP as i64,
        w: (size.width - MARGIN_LEFT - MARGIN_RIGHT) as i64,
        h: (size.height - MARGIN_TOP - MARGIN_BOTTOM) as i64,
    };
    canvas.frame(area, 4);

    let slot = area.w / 24;
    for hour in 0..24i64 {
        let x = area.x + hour * slot + slot / 2;
        canvas.line(x, area.bottom(), x, area.bottom() + 4, FRAME, 1);
    }

    let peak = hist.peak();
    if peak > 0 {
        for (hour, &count) in hist.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let bar_h = ((area.h - 1) as f64 * count as f64 / peak as f64).round() as i64;
            let bar = Rect {
                x: area.x + hour as i64 * slot + 2,
                y: area.bottom() - 1 - bar_h,
                w: slot - 4,
                h: bar_h,
            };
            canvas.fill_rect(bar, DEFAULT_BLUE);
            canvas.stroke_rect(bar, FRAME);
        }
    }

    let caption = format!(
        "Hour-Of-Day When Fault Flag {fault_number} is TRUE (x: 24 Hour Number in Day, y: Frequency, {} flagged samples)",
        hist.total()
    );
    canvas.encode_png(caption)
}
