use chrono::{NaiveDateTime, Timelike};

use crate::error::{ReportError, Result};
use crate::processing::statistics::round_to;

const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Index of a column inside the [`Timeline`] that resolved it.
///
/// Handles are only meaningful for the timeline that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnHandle(usize);

/// A validated fault-flag column: one boolean per row.
#[derive(Debug, Clone)]
pub struct FlagColumn {
    name: String,
    flags: Vec<bool>,
}

impl FlagColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn flagged_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

/// Elapsed time between each sample and the one before it, in seconds.
/// The first entry has no predecessor and is NaN.
#[derive(Debug, Clone)]
pub struct DurationSeries {
    seconds: Vec<f64>,
}

impl DurationSeries {
    pub fn seconds(&self) -> &[f64] {
        &self.seconds
    }

    /// Sum of all defined deltas.
    pub fn total_seconds(&self) -> f64 {
        // Folded from +0.0: an empty f64 `sum()` yields -0.0.
        self.seconds.iter().filter(|v| !v.is_nan()).fold(0.0f64, |acc, d| acc + d)
    }

    /// Sum of the deltas whose closing sample is flagged.
    pub fn flagged_seconds(&self, flags: &[bool]) -> f64 {
        self.seconds
            .iter()
            .zip(flags)
            .filter(|&(d, &f)| f && !d.is_nan())
            .fold(0.0f64, |acc, (d, _)| acc + d)
    }
}

/// Immutable, timestamp-ordered snapshot of a sensor dataset.
#[derive(Debug, Clone)]
pub struct Timeline {
    timestamps: Vec<NaiveDateTime>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Timeline {
    /// Build a timeline, checking that timestamps strictly increase and that
    /// every column has exactly one value per timestamp.
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        if let Some(row) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ReportError::NonIncreasingTimestamps { row: row + 1 });
        }

        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != timestamps.len() {
                return Err(ReportError::ColumnLengthMismatch {
                    column: name,
                    expected: timestamps.len(),
                    actual: values.len(),
                });
            }
            if names.contains(&name) {
                return Err(ReportError::DuplicateColumn(name));
            }
            names.push(name);
            data.push(values);
        }

        if timestamps.is_empty() {
            tracing::warn!("timeline has no rows; statistics will be empty");
        }

        Ok(Self { timestamps, names, columns: data })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn resolve(&self, name: &str) -> Result<ColumnHandle> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(ColumnHandle)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    /// Resolve a flag column, rejecting anything other than 0 or 1.
    pub fn resolve_flag(&self, name: &str) -> Result<FlagColumn> {
        let handle = self.resolve(name)?;
        let mut flags = Vec::with_capacity(self.len());
        for (row, &value) in self.column(handle).iter().enumerate() {
            if value == 1.0 {
                flags.push(true);
            } else if value == 0.0 {
                flags.push(false);
            } else {
                return Err(ReportError::InvalidFlagValue {
                    column: name.to_string(),
                    row,
                    value,
                });
            }
        }
        Ok(FlagColumn { name: name.to_string(), flags })
    }

    pub fn column(&self, handle: ColumnHandle) -> &[f64] {
        &self.columns[handle.0]
    }

    pub fn column_name(&self, handle: ColumnHandle) -> &str {
        &self.names[handle.0]
    }

    pub fn durations(&self) -> DurationSeries {
        let mut seconds = Vec::with_capacity(self.len());
        if !self.timestamps.is_empty() {
            seconds.push(f64::NAN);
        }
        for w in self.timestamps.windows(2) {
            let delta = w[1].signed_duration_since(w[0]);
            seconds.push(delta.num_milliseconds() as f64 / 1000.0);
        }
        DurationSeries { seconds }
    }

    pub fn elapsed_days(&self) -> f64 {
        self.durations().total_seconds() / SECONDS_PER_DAY
    }

    pub fn elapsed_hours(&self) -> f64 {
        self.durations().total_seconds() / SECONDS_PER_HOUR
    }

    pub fn flagged_elapsed_hours(&self, flag: &FlagColumn) -> f64 {
        self.durations().flagged_seconds(flag.flags()) / SECONDS_PER_HOUR
    }

    /// Share of rows (by count, not time) with the flag set, as a percentage
    /// rounded to 2 decimals. NaN for an empty timeline.
    pub fn percent_flagged(&self, flag: &FlagColumn) -> f64 {
        if flag.flags.is_empty() {
            return f64::NAN;
        }
        let mean = flag.flagged_count() as f64 / flag.flags.len() as f64;
        round_to(mean * 100.0, 2)
    }

    pub fn percent_not_flagged(&self, flag: &FlagColumn) -> f64 {
        100.0 - self.percent_flagged(flag)
    }

    /// Mean of `column` over flagged rows, rounded to 2 decimals.
    /// NaN readings are skipped; NaN when nothing is left to average.
    pub fn conditional_mean(&self, column: ColumnHandle, flag: &FlagColumn) -> f64 {
        let (sum, count) = self
            .column(column)
            .iter()
            .zip(flag.flags())
            .filter(|&(v, &f)| f && !v.is_nan())
            .fold((0.0f64, 0usize), |(s, n), (v, _)| (s + v, n + 1));
        if count == 0 {
            return f64::NAN;
        }
        round_to(sum / count as f64, 2)
    }

    /// Hour of day (0-23) of every flagged row, in row order.
    pub fn flagged_hours_of_day(&self, flag: &FlagColumn) -> Vec<u32> {
        self.timestamps
            .iter()
            .zip(flag.flags())
            .filter(|&(_, &f)| f)
            .map(|(ts, _)| ts.hour())
            .collect()
    }
}
