//! Diagnostic figures rendered to self-contained PNG buffers.
//!
//! Every call rasterizes onto its own [`canvas::Canvas`]; nothing is shared
//! between calls, so renderers can be used from several threads at once.

pub mod canvas;
pub mod histogram;
pub mod style;
pub mod timeseries;

use crate::data::timeline::Timeline;
use crate::error::Result;
use crate::profile::{FaultProfile, PanelSpec};
use crate::render::style::{FigureSize, Rgb};

pub use histogram::HourHistogram;

/// Encoded PNG plus the text that stands in for axis labels and legends.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub caption: String,
}

impl RenderedImage {
    /// Wrap an externally supplied PNG, e.g. a static fault-definition figure.
    pub fn from_png(bytes: Vec<u8>, caption: impl Into<String>) -> Result<Self> {
        let (width, height) = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .map(|img| (img.width(), img.height()))?;
        Ok(Self { bytes, width, height, caption: caption.into() })
    }
}

/// Renders the two figures of a fault report.
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    fault_number: u8,
    panels: Vec<PanelSpec>,
    flag_color: Rgb,
    size: FigureSize,
}

impl PlotRenderer {
    pub fn new(profile: &FaultProfile) -> Self {
        Self {
            fault_number: profile.code.number(),
            panels: profile.panels.clone(),
            flag_color: profile.flag_color,
            size: FigureSize::default(),
        }
    }

    pub fn with_size(mut self, size: FigureSize) -> Self {
        self.size = size;
        self
    }

    /// Stacked sensor panels followed by the fault-flag trace.
    pub fn render_timeseries(&self, timeline: &Timeline, flag_col: &str) -> Result<RenderedImage> {
        let flag = timeline.resolve_flag(flag_col)?;
        timeseries::render(
            timeline,
            &self.panels,
            &flag,
            self.flag_color,
            self.fault_number,
            self.size,
        )
    }

    /// Frequency of flagged rows per hour of day.
    pub fn render_hour_histogram(&self, timeline: &Timeline, flag_col: &str) -> Result<RenderedImage> {
        let hist = self.hour_histogram(timeline, flag_col)?;
        self.render_histogram(&hist)
    }

    /// Draw an already counted histogram.
    pub fn render_histogram(&self, hist: &HourHistogram) -> Result<RenderedImage> {
        histogram::render(hist, self.fault_number, self.size)
    }

    pub fn hour_histogram(&self, timeline: &Timeline, flag_col: &str) -> Result<HourHistogram> {
        let flag = timeline.resolve_flag(flag_col)?;
        Ok(HourHistogram::from_hours(&timeline.flagged_hours_of_day(&flag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timeline::tests::hourly;
    use proptest::prelude::*;

    fn profile() -> FaultProfile {
        FaultProfile::mix_temp("mat", "rat", "oat", "fc2_flag")
    }

    fn timeline(flags: Vec<f64>) -> Timeline {
        let n = flags.len();
        Timeline::new(
            hourly(n),
            vec![
                ("fc2_flag".into(), flags),
                ("mat".into(), vec![55.0; n]),
                ("rat".into(), vec![70.0; n]),
                ("oat".into(), vec![40.0; n]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_histogram_figure_matches_counts() {
        let mut flags = vec![0.0; 48];
        flags[3] = 1.0;
        flags[27] = 1.0;
        let tl = timeline(flags);
        let renderer = PlotRenderer::new(&profile()).with_size(FigureSize { width: 600, height: 200 });

        let hist = renderer.hour_histogram(&tl, "fc2_flag").unwrap();
        assert_eq!(hist.counts[3], 2);
        let from_counts = renderer.render_histogram(&hist).unwrap();
        let from_timeline = renderer.render_hour_histogram(&tl, "fc2_flag").unwrap();
        assert_eq!(from_counts, from_timeline);
    }

    #[test]
    fn test_unknown_flag_column() {
        let tl = timeline(vec![0.0; 3]);
        let renderer = PlotRenderer::new(&profile());
        assert!(renderer.hour_histogram(&tl, "fc1_flag").is_err());
        assert!(renderer.render_timeseries(&tl, "fc1_flag").is_err());
    }

    proptest! {
        #[test]
        fn prop_histogram_total_is_flagged_rows(flags in prop::collection::vec(any::<bool>(), 0..24 * 5)) {
            let values: Vec<f64> = flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();
            let tl = timeline(values);
            let flag = tl.resolve_flag("fc2_flag").unwrap();
            let hist = PlotRenderer::new(&profile()).hour_histogram(&tl, "fc2_flag").unwrap();
            prop_assert_eq!(hist.total(), flag.flagged_count() as u64);
        }
    }
}
