//! Per-fault-code report profiles.
//!
//! A [`FaultProfile`] is everything that differs between fault codes: which
//! columns are plotted and summarized, the text blocks, and the narrative
//! rules. The summarizer, renderer and composer are shared.

use serde::{Deserialize, Serialize};

use crate::render::style::{Rgb, BLACK, BLUE, DEFAULT_BLUE, GREEN, RED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultCode {
    Fc1,
    Fc2,
}

impl FaultCode {
    pub fn number(&self) -> u8 {
        match self {
            FaultCode::Fc1 => 1,
            FaultCode::Fc2 => 2,
        }
    }

    pub fn default_flag_col(&self) -> &'static str {
        match self {
            FaultCode::Fc1 => "fc1_flag",
            FaultCode::Fc2 => "fc2_flag",
        }
    }

    /// File name of the static fault-definition figure.
    pub fn definition_image(&self) -> &'static str {
        match self {
            FaultCode::Fc1 => "fc1_definition.png",
            FaultCode::Fc2 => "fc2_definition.png",
        }
    }
}

/// One plotted trace inside a panel.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub column: String,
    pub legend: String,
    pub color: Rgb,
}

/// One stacked panel of the time-series figure.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub unit: String,
    pub series: Vec<SeriesSpec>,
}

/// A column that gets its own descriptive-statistics block.
#[derive(Debug, Clone)]
pub struct DescribedColumn {
    pub heading: String,
    pub column: String,
}

/// Quantity a narrative rule is evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    PercentFlagged,
    /// Sample standard deviation of the named column.
    ColumnStdDev(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    LessThan,
    EqualTo,
}

/// Threshold-driven choice between two mutually exclusive suggestions.
#[derive(Debug, Clone)]
pub struct NarrativeRule {
    pub metric: Metric,
    pub comparison: Comparison,
    pub threshold: f64,
    pub when_met: String,
    pub otherwise: String,
}

impl NarrativeRule {
    /// NaN never satisfies a comparison, so it selects `otherwise`.
    pub fn holds(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::GreaterThan => value > self.threshold,
            Comparison::LessThan => value < self.threshold,
            Comparison::EqualTo => value == self.threshold,
        }
    }

    pub fn select(&self, value: f64) -> &str {
        if self.holds(value) {
            &self.when_met
        } else {
            &self.otherwise
        }
    }
}

/// Commentary paragraph built from conditional means.
///
/// `{0}`, `{1}`, ... are replaced by the conditional means of
/// [`FaultProfile::conditional_sensors`] in order. The paragraph is only
/// emitted when the first of those means is defined.
#[derive(Debug, Clone)]
pub struct Commentary {
    pub template: String,
}

impl Commentary {
    pub fn render(&self, means: &[f64]) -> Option<String> {
        let gate = means.first()?;
        if gate.is_nan() {
            return None;
        }
        let mut text = self.template.clone();
        for (i, v) in means.iter().enumerate() {
            text = text.replace(&format!("{{{i}}}"), &format_number(*v));
        }
        Some(text)
    }
}

#[derive(Debug, Clone)]
pub struct FaultProfile {
    pub code: FaultCode,
    pub title: String,
    pub description: String,
    pub flag_col: String,
    pub panels: Vec<PanelSpec>,
    pub flag_color: Rgb,
    pub conditional_sensors: Vec<String>,
    pub commentary: Commentary,
    pub described_columns: Vec<DescribedColumn>,
    pub narrative: Vec<NarrativeRule>,
}

impl FaultProfile {
    /// Duct static pressure / supply fan profile.
    pub fn duct_static(
        duct_static_col: &str,
        supply_vfd_speed_col: &str,
        duct_static_setpoint_col: &str,
        vfd_speed_percent_max: f64,
        flag_col: &str,
    ) -> Self {
        let vfd_max_pct = if vfd_speed_percent_max <= 1.0 {
            vfd_speed_percent_max * 100.0
        } else {
            vfd_speed_percent_max
        };

        Self {
            code: FaultCode::Fc1,
            title: "Fault Condition One Report".to_string(),
            description: "Fault condition one of ASHRAE Guideline 36 is related to flagging poor \
                performance of a AHU variable supply fan attempting to control to a duct pressure \
                setpoint. Fault condition equation as defined by ASHRAE:"
                .to_string(),
            flag_col: flag_col.to_string(),
            panels: vec![
                PanelSpec {
                    unit: "Inch WC".to_string(),
                    series: vec![SeriesSpec {
                        column: duct_static_col.to_string(),
                        legend: "STATIC".to_string(),
                        color: DEFAULT_BLUE,
                    }],
                },
                PanelSpec {
                    unit: "%".to_string(),
                    series: vec![SeriesSpec {
                        column: supply_vfd_speed_col.to_string(),
                        legend: "FAN".to_string(),
                        color: GREEN,
                    }],
                },
            ],
            flag_color: BLACK,
            conditional_sensors: vec![duct_static_col.to_string()],
            commentary: Commentary {
                template: format!(
                    "Average duct system pressure for when in fault condition \
                     (fan VFD speed > {vfd_max_pct:.0}%): {{0}}\"WC"
                ),
            },
            described_columns: vec![
                DescribedColumn {
                    heading: "VFD Speed Statistics".to_string(),
                    column: supply_vfd_speed_col.to_string(),
                },
                DescribedColumn {
                    heading: "Duct Pressure Statistics".to_string(),
                    column: duct_static_col.to_string(),
                },
                DescribedColumn {
                    heading: "Duct Pressure Setpoints Statistics".to_string(),
                    column: duct_static_setpoint_col.to_string(),
                },
            ],
            narrative: vec![
                NarrativeRule {
                    metric: Metric::PercentFlagged,
                    comparison: Comparison::GreaterThan,
                    threshold: 5.0,
                    when_met: "The percent True metric that represents the amount of time for \
                        when the fault flag is True is high indicating the fan is running at high \
                        speeds and appearing to not generate good duct static pressure"
                        .to_string(),
                    otherwise: "The percent True metric that represents the amount of time for \
                        when the fault flag is True is low indicating the fan appears to generate \
                        good duct static pressure"
                        .to_string(),
                },
                NarrativeRule {
                    metric: Metric::ColumnStdDev(duct_static_setpoint_col.to_string()),
                    comparison: Comparison::EqualTo,
                    threshold: 0.0,
                    when_met: "No duct pressure setpoint reset detected (BAD)".to_string(),
                    otherwise: "Duct pressure reset detected (Good)".to_string(),
                },
            ],
        }
    }

    /// Mixed air temperature profile.
    pub fn mix_temp(mat_col: &str, rat_col: &str, oat_col: &str, flag_col: &str) -> Self {
        Self {
            code: FaultCode::Fc2,
            title: "Fault Condition Two Report".to_string(),
            description: "Fault condition two and three of ASHRAE Guideline 36 is related to \
                flagging mixing air temperatures of the AHU that are out of acceptable ranges. \
                Fault condition 2 flags mixing air temperatures that are too low and fault \
                condition 3 flags mixing temperatures that are too high when in comparison to \
                return and outside air data. The mixing air temperatures in theory should always \
                be in between the return and outside air temperatures ranges. Fault condition two \
                equation as defined by ASHRAE:"
                .to_string(),
            flag_col: flag_col.to_string(),
            panels: vec![PanelSpec {
                unit: "\u{00B0}F".to_string(),
                series: vec![
                    SeriesSpec {
                        column: mat_col.to_string(),
                        legend: "Mix Temp".to_string(),
                        color: RED,
                    },
                    SeriesSpec {
                        column: rat_col.to_string(),
                        legend: "Return Temp".to_string(),
                        color: BLUE,
                    },
                    SeriesSpec {
                        column: oat_col.to_string(),
                        legend: "Out Temp".to_string(),
                        color: GREEN,
                    },
                ],
            }],
            flag_color: BLACK,
            conditional_sensors: vec![mat_col.to_string(), oat_col.to_string(), rat_col.to_string()],
            commentary: Commentary {
                template: "When fault condition 2 is True the average mix air temp is {0}\u{00B0}F, \
                    outside air temp is {1}\u{00B0}F, and return air temp is {2}\u{00B0}F. This \
                    could possibly help with pin pointing AHU operating conditions for when this \
                    fault is True."
                    .to_string(),
            },
            described_columns: vec![
                DescribedColumn {
                    heading: "Mix Temp Statistics".to_string(),
                    column: mat_col.to_string(),
                },
                DescribedColumn {
                    heading: "Return Temp Statistics".to_string(),
                    column: rat_col.to_string(),
                },
                DescribedColumn {
                    heading: "Outside Temp Statistics".to_string(),
                    column: oat_col.to_string(),
                },
            ],
            narrative: vec![NarrativeRule {
                metric: Metric::PercentFlagged,
                comparison: Comparison::LessThan,
                threshold: 5.0,
                when_met: "The percent True of time in fault condition 2 or 3 is high indicating \
                    the AHU temperature sensors are out of calibration"
                    .to_string(),
                otherwise: "The percent True of time is low indicating the AHU temperature sensors \
                    are within calibration"
                    .to_string(),
            }],
        }
    }

    /// Every column the report reads, flag column first.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.flag_col.as_str()];
        let plotted = self.panels.iter().flat_map(|p| p.series.iter().map(|s| s.column.as_str()));
        let described = self.described_columns.iter().map(|d| d.column.as_str());
        for c in plotted.chain(self.conditional_sensors.iter().map(String::as_str)).chain(described) {
            if !cols.contains(&c) {
                cols.push(c);
            }
        }
        cols
    }
}

/// Render a number the way the report text shows it: integral values keep
/// one decimal (`12.0`), NaN is `nan`.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
