use serde::Serialize;

use crate::data::timeline::Timeline;
use crate::error::Result;
use crate::processing::statistics::round_to;
use crate::profile::FaultProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalMean {
    pub column: String,
    /// NaN when no row is flagged.
    pub value: f64,
}

/// Time-weighted fault statistics for one timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub rows: usize,
    pub flagged_rows: usize,
    pub total_days: f64,
    pub total_hours: f64,
    pub flagged_hours: f64,
    pub percent_flagged: f64,
    pub percent_not_flagged: f64,
    pub conditional_means: Vec<ConditionalMean>,
}

impl SummaryStatistics {
    pub fn conditional_mean(&self, column: &str) -> Option<f64> {
        self.conditional_means.iter().find(|m| m.column == column).map(|m| m.value)
    }

    pub fn conditional_mean_values(&self) -> Vec<f64> {
        self.conditional_means.iter().map(|m| m.value).collect()
    }
}

/// Computes [`SummaryStatistics`] for the flag and sensor columns of a
/// fault profile.
#[derive(Debug, Clone)]
pub struct FaultStatisticsSummarizer {
    flag_col: String,
    sensors: Vec<String>,
}

impl FaultStatisticsSummarizer {
    pub fn new(profile: &FaultProfile) -> Self {
        Self {
            flag_col: profile.flag_col.clone(),
            sensors: profile.conditional_sensors.clone(),
        }
    }

    /// All columns are resolved before anything is computed, so a missing
    /// column fails without partial work.
    pub fn summarize(&self, timeline: &Timeline) -> Result<SummaryStatistics> {
        let flag = timeline.resolve_flag(&self.flag_col)?;
        let sensors = self
            .sensors
            .iter()
            .map(|name| timeline.resolve(name).map(|h| (name, h)))
            .collect::<Result<Vec<_>>>()?;

        let percent_flagged = timeline.percent_flagged(&flag);
        let summary = SummaryStatistics {
            rows: timeline.len(),
            flagged_rows: flag.flagged_count(),
            total_days: round_to(timeline.elapsed_days(), 2),
            total_hours: timeline.elapsed_hours(),
            flagged_hours: timeline.flagged_elapsed_hours(&flag),
            percent_flagged,
            percent_not_flagged: 100.0 - percent_flagged,
            conditional_means: sensors
                .into_iter()
                .map(|(name, handle)| ConditionalMean {
                    column: name.clone(),
                    value: timeline.conditional_mean(handle, &flag),
                })
                .collect(),
        };

        tracing::debug!(
            flag = %self.flag_col,
            rows = summary.rows,
            flagged = summary.flagged_rows,
            percent_flagged = summary.percent_flagged,
            "summarized fault statistics"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::timeline::tests::hourly;
    use crate::error::ReportError;
    use proptest::prelude::*;

    fn fc1_profile() -> FaultProfile {
        FaultProfile::duct_static("duct_static", "fan", "setpoint", 0.95, "fc1_flag")
    }

    fn fc1_timeline(flags: Vec<f64>, static_values: Vec<f64>) -> Timeline {
        let n = flags.len();
        Timeline::new(
            hourly(n),
            vec![
                ("fc1_flag".into(), flags),
                ("duct_static".into(), static_values),
                ("fan".into(), vec![50.0; n]),
                ("setpoint".into(), vec![1.0; n]),
            ],
        )
        .unwrap()
    }

    fn same_bits(a: &SummaryStatistics, b: &SummaryStatistics) -> bool {
        let scalars = |s: &SummaryStatistics| {
            vec![s.total_days, s.total_hours, s.flagged_hours, s.percent_flagged, s.percent_not_flagged]
                .into_iter()
                .chain(s.conditional_mean_values())
                .map(f64::to_bits)
                .collect::<Vec<_>>()
        };
        a.rows == b.rows && a.flagged_rows == b.flagged_rows && scalars(a) == scalars(b)
    }

    #[test]
    fn test_scenario_three_flagged_hours() {
        let mut flags = vec![0.0; 24];
        flags[..3].fill(1.0);
        let tl = fc1_timeline(flags, vec![1.0; 24]);
        let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();

        assert_eq!(s.rows, 24);
        assert_eq!(s.flagged_rows, 3);
        assert_eq!(s.total_hours, 23.0);
        assert_eq!(s.total_days, 0.96);
        assert_eq!(s.flagged_hours, 2.0);
        assert_eq!(s.percent_flagged, 12.5);
        assert_eq!(s.percent_not_flagged, 87.5);
        assert_eq!(s.conditional_mean("duct_static"), Some(1.0));
    }

    #[test]
    fn test_total_days_round_half_to_even() {
        // Three hours is 0.125 days.
        let tl = fc1_timeline(vec![0.0; 4], vec![1.0; 4]);
        let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
        assert_eq!(s.total_hours, 3.0);
        assert_eq!(s.total_days, 0.12);
    }

    #[test]
    fn test_missing_sensor_is_fatal() {
        let tl = Timeline::new(hourly(2), vec![("fc1_flag".into(), vec![0.0, 1.0])]).unwrap();
        let err = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "duct_static"));
    }

    #[test]
    fn test_missing_flag_is_fatal() {
        let tl = Timeline::new(hourly(2), vec![("duct_static".into(), vec![0.0, 1.0])]).unwrap();
        let err = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "fc1_flag"));
    }

    #[test]
    fn test_empty_timeline_summary() {
        let tl = fc1_timeline(vec![], vec![]);
        let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
        assert_eq!(s.rows, 0);
        for total in [s.total_days, s.total_hours, s.flagged_hours] {
            assert_eq!(total, 0.0);
            assert!(total.is_sign_positive());
        }
        assert!(s.percent_flagged.is_nan());
        assert!(s.percent_not_flagged.is_nan());
        assert!(s.conditional_mean("duct_static").unwrap().is_nan());
    }

    #[test]
    fn test_fc2_means_for_three_sensors() {
        let profile = FaultProfile::mix_temp("mat", "rat", "oat", "fc2_flag");
        let tl = Timeline::new(
            hourly(4),
            vec![
                ("fc2_flag".into(), vec![1.0, 1.0, 0.0, 0.0]),
                ("mat".into(), vec![50.0, 52.0, 60.0, 60.0]),
                ("rat".into(), vec![70.0, 72.0, 0.0, 0.0]),
                ("oat".into(), vec![40.0, 41.0, 0.0, 0.0]),
            ],
        )
        .unwrap();
        let s = FaultStatisticsSummarizer::new(&profile).summarize(&tl).unwrap();
        let names: Vec<&str> = s.conditional_means.iter().map(|m| m.column.as_str()).collect();
        assert_eq!(names, vec!["mat", "oat", "rat"]);
        assert_eq!(s.conditional_mean_values(), vec![51.0, 40.5, 71.0]);
    }

    #[test]
    fn test_summary_serializes_nan_as_null() {
        let tl = fc1_timeline(vec![0.0, 0.0], vec![1.0, 2.0]);
        let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["conditional_means"][0]["value"].is_null());
        assert_eq!(json["percent_flagged"], 0.0);
    }

    proptest! {
        #[test]
        fn prop_percentages_are_exact_complements(flags in prop::collection::vec(any::<bool>(), 1..200)) {
            let values: Vec<f64> = flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();
            let n = values.len();
            let tl = fc1_timeline(values, vec![2.5; n]);
            let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
            prop_assert_eq!(s.percent_flagged + s.percent_not_flagged, 100.0);
        }

        #[test]
        fn prop_all_clear_flags(n in 1usize..100) {
            let tl = fc1_timeline(vec![0.0; n], vec![3.0; n]);
            let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
            prop_assert_eq!(s.percent_flagged, 0.0);
            prop_assert_eq!(s.percent_not_flagged, 100.0);
            prop_assert_eq!(s.flagged_hours, 0.0);
            prop_assert!(s.conditional_mean("duct_static").unwrap().is_nan());
        }

        #[test]
        fn prop_all_set_flags_match_unconditional_mean(
            readings in prop::collection::vec(-10.0f64..10.0, 1..100)
        ) {
            let n = readings.len();
            let mean = round_to(readings.iter().sum::<f64>() / n as f64, 2);
            let tl = fc1_timeline(vec![1.0; n], readings);
            let s = FaultStatisticsSummarizer::new(&fc1_profile()).summarize(&tl).unwrap();
            prop_assert_eq!(s.percent_flagged, 100.0);
            prop_assert_eq!(s.conditional_mean("duct_static"), Some(mean));
            prop_assert_eq!(s.flagged_hours, s.total_hours);
        }

        #[test]
        fn prop_summarize_is_idempotent(flags in prop::collection::vec(any::<bool>(), 0..100)) {
            let values: Vec<f64> = flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect();
            let n = values.len();
            let tl = fc1_timeline(values, (0..n).map(|i| i as f64 * 0.1).collect());
            let summarizer = FaultStatisticsSummarizer::new(&fc1_profile());
            let a = summarizer.summarize(&tl).unwrap();
            let b = summarizer.summarize(&tl).unwrap();
            prop_assert!(same_bits(&a, &b));
        }
    }
}
