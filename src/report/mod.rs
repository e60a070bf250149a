//! Report assembly: summarize, render, compose.

pub mod composer;
pub mod document;
pub mod markdown;

use crate::data::timeline::Timeline;
use crate::error::Result;
use crate::processing::summary::{FaultStatisticsSummarizer, SummaryStatistics};
use crate::render::{HourHistogram, PlotRenderer};

pub use composer::{ReportComposer, ReportImages};
pub use document::{ReportDocument, Section, TextStyle};

/// Everything produced by one report run.
#[derive(Debug, Clone)]
pub struct FaultReport {
    pub summary: SummaryStatistics,
    pub histogram: HourHistogram,
    pub document: ReportDocument,
}

/// Run the full pipeline for one timeline with the composer's profile.
///
/// All required columns are checked first, so a missing column aborts before
/// any statistic or figure is produced.
pub fn generate_report(composer: &ReportComposer, timeline: &Timeline) -> Result<FaultReport> {
    let profile = composer.profile();
    for column in profile.required_columns() {
        timeline.resolve(column)?;
    }

    let summary = FaultStatisticsSummarizer::new(profile).summarize(timeline)?;
    let renderer = PlotRenderer::new(profile);
    let histogram = renderer.hour_histogram(timeline, &profile.flag_col)?;
    let images = ReportImages {
        timeseries: renderer.render_timeseries(timeline, &profile.flag_col)?,
        histogram: renderer.render_histogram(&histogram)?,
    };
    let document = composer.create_report(&profile.title, timeline, &summary, &images)?;

    Ok(FaultReport { summary, histogram, document })
}
