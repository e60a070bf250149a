use chrono::{Local, NaiveDateTime};

use crate::data::timeline::Timeline;
use crate::error::Result;
use crate::processing::statistics::{round_to, DescriptiveStats};
use crate::processing::summary::SummaryStatistics;
use crate::profile::{format_number, FaultProfile, Metric};
use crate::render::RenderedImage;
use crate::report::document::{DocumentBuilder, ReportDocument, TextStyle};

const IMAGE_WIDTH_INCHES: f32 = 6.0;

/// The two figures rendered for a report.
#[derive(Debug, Clone)]
pub struct ReportImages {
    pub timeseries: RenderedImage,
    pub histogram: RenderedImage,
}

/// Assembles a [`ReportDocument`] for one fault profile.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    profile: FaultProfile,
    reference_image: Option<RenderedImage>,
}

impl ReportComposer {
    pub fn new(profile: FaultProfile) -> Self {
        Self { profile, reference_image: None }
    }

    /// Static figure shown under the description, typically the fault
    /// equation.
    pub fn with_reference_image(mut self, image: RenderedImage) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn profile(&self) -> &FaultProfile {
        &self.profile
    }

    pub fn create_report(
        &self,
        title: &str,
        timeline: &Timeline,
        summary: &SummaryStatistics,
        images: &ReportImages,
    ) -> Result<ReportDocument> {
        self.create_report_at(title, timeline, summary, images, Local::now().naive_local())
    }

    /// Like [`ReportComposer::create_report`] with an explicit footer time.
    pub fn create_report_at(
        &self,
        title: &str,
        timeline: &Timeline,
        summary: &SummaryStatistics,
        images: &ReportImages,
        generated_at: NaiveDateTime,
    ) -> Result<ReportDocument> {
        tracing::info!(title, rows = timeline.len(), "composing fault report");

        // Every column lookup happens here, before the first section.
        let described = self
            .profile
            .described_columns
            .iter()
            .map(|d| {
                let handle = timeline.resolve(&d.column)?;
                Ok((d, DescriptiveStats::compute(timeline.column(handle))))
            })
            .collect::<Result<Vec<_>>>()?;
        let suggestions = self
            .profile
            .narrative
            .iter()
            .map(|rule| {
                let value = match &rule.metric {
                    Metric::PercentFlagged => summary.percent_flagged,
                    Metric::ColumnStdDev(column) => {
                        let handle = timeline.resolve(column)?;
                        DescriptiveStats::compute(timeline.column(handle)).std_dev
                    }
                };
                Ok(rule.select(value).to_string())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut doc = DocumentBuilder::default();

        doc.heading(title, 0)
            .paragraph(self.profile.description.as_str(), None);
        match &self.reference_image {
            Some(image) => {
                doc.image(image.clone(), IMAGE_WIDTH_INCHES);
            }
            None => tracing::warn!(
                image = self.profile.code.definition_image(),
                "no fault definition image supplied; leaving it out"
            ),
        }

        doc.heading("Dataset Plot", 2)
            .image(images.timeseries.clone(), IMAGE_WIDTH_INCHES);

        doc.heading("Dataset Statistics", 2).bullets(statistic_bullets(summary));

        doc.heading("Time-of-day Histogram Plots", 2)
            .image(images.histogram.clone(), IMAGE_WIDTH_INCHES);

        match self.profile.commentary.render(&summary.conditional_mean_values()) {
            Some(text) => {
                doc.paragraph(text, Some(TextStyle::ListBullet));
            }
            None => tracing::debug!("no flagged rows; conditional commentary omitted"),
        }

        for (column, stats) in described {
            doc.heading(column.heading.as_str(), 2)
                .statistics(column.column.as_str(), stats);
        }

        doc.heading("Suggestions based on data analysis", 2).bullets(suggestions);

        doc.paragraph(
            format!("Report generated: {}", generated_at.format("%a %b %e %H:%M:%S %Y")),
            Some(TextStyle::Emphasis),
        );

        let document = doc.finish();
        tracing::info!(sections = document.sections().len(), "fault report composed");
        Ok(document)
    }
}

fn statistic_bullets(summary: &SummaryStatistics) -> Vec<String> {
    vec![
        format!("Total time in days calculated in dataset: {}", format_number(summary.total_days)),
        format!("Total time in hours calculated in dataset: {}", format_number(summary.total_hours)),
        format!(
            "Total time in hours for when fault flag is True: {}",
            format_number(summary.flagged_hours)
        ),
        format!(
            "Percent of time in the dataset when the fault flag is True: {}%",
            format_number(round_to(summary.percent_flagged, 2))
        ),
        format!(
            "Percent of time in the dataset when the fault flag is False: {}%",
            format_number(round_to(summary.percent_not_flagged, 2))
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timeline::tests::hourly;
    use crate::error::ReportError;
    use crate::processing::summary::FaultStatisticsSummarizer;
    use crate::report::document::Section;
    use chrono::NaiveDate;

    fn blank(caption: &str) -> RenderedImage {
        RenderedImage { bytes: vec![0x89], width: 1, height: 1, caption: caption.to_string() }
    }

    fn images() -> ReportImages {
        ReportImages { timeseries: blank("ts"), histogram: blank("hist") }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 7, 1).unwrap()
    }

    fn fc1_timeline(flags: Vec<f64>, setpoint: Vec<f64>) -> Timeline {
        let n = flags.len();
        Timeline::new(
            hourly(n),
            vec![
                ("fc1_flag".into(), flags),
                ("duct_static".into(), vec![1.0; n]),
                ("supply_vfd_speed".into(), vec![0.9; n]),
                ("duct_static_setpoint".into(), setpoint),
            ],
        )
        .unwrap()
    }

    fn fc1_report(tl: &Timeline, reference: bool) -> Result<ReportDocument> {
        let profile = FaultProfile::duct_static(
            "duct_static",
            "supply_vfd_speed",
            "duct_static_setpoint",
            0.95,
            "fc1_flag",
        );
        let summary = FaultStatisticsSummarizer::new(&profile).summarize(tl)?;
        let mut composer = ReportComposer::new(profile);
        if reference {
            composer = composer.with_reference_image(blank("definition"));
        }
        composer.create_report_at("Fault Condition One Report", tl, &summary, &images(), at())
    }

    #[test]
    fn test_section_order() {
        let mut flags = vec![0.0; 24];
        flags[..3].fill(1.0);
        let doc = fc1_report(&fc1_timeline(flags, vec![1.0; 24]), true).unwrap();

        assert_eq!(
            doc.headings(),
            vec![
                "Fault Condition One Report",
                "Dataset Plot",
                "Dataset Statistics",
                "Time-of-day Histogram Plots",
                "VFD Speed Statistics",
                "Duct Pressure Statistics",
                "Duct Pressure Setpoints Statistics",
                "Suggestions based on data analysis",
            ]
        );
        let captions: Vec<&str> = doc.images().iter().map(|i| i.caption.as_str()).collect();
        assert_eq!(captions, vec!["definition", "ts", "hist"]);

        match doc.sections().last() {
            Some(Section::Paragraph { text, style }) => {
                assert_eq!(text, "Report generated: Tue Mar  5 09:07:01 2024");
                assert_eq!(*style, Some(TextStyle::Emphasis));
            }
            other => panic!("unexpected footer {other:?}"),
        }
    }

    #[test]
    fn test_statistic_bullets_and_commentary() {
        let mut flags = vec![0.0; 24];
        flags[..3].fill(1.0);
        let doc = fc1_report(&fc1_timeline(flags, vec![1.0; 24]), true).unwrap();
        let bullets = doc.bullets();

        assert_eq!(bullets[0], "Total time in days calculated in dataset: 0.96");
        assert_eq!(bullets[1], "Total time in hours calculated in dataset: 23.0");
        assert_eq!(bullets[2], "Total time in hours for when fault flag is True: 2.0");
        assert_eq!(bullets[3], "Percent of time in the dataset when the fault flag is True: 12.5%");
        assert_eq!(bullets[4], "Percent of time in the dataset when the fault flag is False: 87.5%");
        assert_eq!(
            bullets[5],
            "Average duct system pressure for when in fault condition (fan VFD speed > 95%): 1.0\"WC"
        );
    }

    #[test]
    fn test_constant_setpoint_reports_no_reset() {
        let doc = fc1_report(&fc1_timeline(vec![0.0; 10], vec![1.0; 10]), true).unwrap();
        let bullets = doc.bullets();
        assert!(bullets.contains(&"No duct pressure setpoint reset detected (BAD)"));
        assert!(bullets.iter().any(|b| b.contains("is low indicating the fan appears")));
    }

    #[test]
    fn test_varying_setpoint_reports_reset() {
        let setpoint = (0..10).map(|i| 1.0 + i as f64 * 0.05).collect();
        let doc = fc1_report(&fc1_timeline(vec![1.0; 10], setpoint), true).unwrap();
        let bullets = doc.bullets();
        assert!(bullets.contains(&"Duct pressure reset detected (Good)"));
        assert!(bullets.iter().any(|b| b.contains("is high indicating the fan is running")));
    }

    #[test]
    fn test_commentary_omitted_without_flagged_rows() {
        let doc = fc1_report(&fc1_timeline(vec![0.0; 10], vec![1.0; 10]), true).unwrap();
        assert!(!doc.bullets().iter().any(|b| b.starts_with("Average duct system pressure")));
    }

    #[test]
    fn test_missing_reference_image_is_skipped() {
        let doc = fc1_report(&fc1_timeline(vec![0.0; 4], vec![1.0; 4]), false).unwrap();
        assert_eq!(doc.images().len(), 2);
    }

    #[test]
    fn test_empty_dataset_still_produces_report() {
        let doc = fc1_report(&fc1_timeline(vec![], vec![]), true).unwrap();
        let bullets = doc.bullets();
        assert_eq!(bullets[0], "Total time in days calculated in dataset: 0.0");
        assert_eq!(bullets[3], "Percent of time in the dataset when the fault flag is True: nan%");
        assert!(doc.headings().contains(&"Suggestions based on data analysis"));
    }

    #[test]
    fn test_missing_setpoint_column_is_fatal() {
        let profile = FaultProfile::duct_static("duct_static", "supply_vfd_speed", "sp", 0.95, "fc1_flag");
        let tl = fc1_timeline(vec![0.0; 4], vec![1.0; 4]);
        let summary = FaultStatisticsSummarizer::new(&profile).summarize(&tl).unwrap();
        let err = ReportComposer::new(profile)
            .create_report_at("t", &tl, &summary, &images(), at())
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "sp"));
    }

    #[test]
    fn test_fc2_calibration_polarity() {
        let profile = FaultProfile::mix_temp("mat", "rat", "oat", "fc2_flag");
        let tl = Timeline::new(
            hourly(2),
            vec![
                ("fc2_flag".into(), vec![0.0, 0.0]),
                ("mat".into(), vec![55.0, 56.0]),
                ("rat".into(), vec![70.0, 71.0]),
                ("oat".into(), vec![40.0, 41.0]),
            ],
        )
        .unwrap();
        let composer = ReportComposer::new(profile.clone());
        let summarizer = FaultStatisticsSummarizer::new(&profile);

        let mut summary = summarizer.summarize(&tl).unwrap();
        summary.percent_flagged = 3.0;
        summary.percent_not_flagged = 97.0;
        let doc = composer.create_report_at("t", &tl, &summary, &images(), at()).unwrap();
        assert!(doc.bullets().iter().any(|b| b.ends_with("out of calibration")));

        summary.percent_flagged = 10.0;
        summary.percent_not_flagged = 90.0;
        let doc = composer.create_report_at("t", &tl, &summary, &images(), at()).unwrap();
        assert!(doc.bullets().iter().any(|b| b.ends_with("within calibration")));
    }
}
