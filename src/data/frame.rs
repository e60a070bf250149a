use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

use crate::data::datetime::detect_date_format;
use crate::data::timeline::Timeline;
use crate::error::{ReportError, Result};

/// Build a [`Timeline`] from a polars frame whose `index_col` holds the
/// timestamps. The index may be a datetime, integer epoch milliseconds or
/// text; other string columns are dropped and the rest cast to `f64` with
/// nulls as NaN.
pub fn timeline_from_frame(df: &DataFrame, index_col: &str) -> Result<Timeline> {
    let index = df
        .column(index_col)
        .map_err(|_| ReportError::MissingColumn(index_col.to_string()))?
        .as_materialized_series();
    let timestamps = index_timestamps(index)?;

    let mut columns = Vec::new();
    for column in df.get_columns() {
        let name = column.name().to_string();
        if name == index_col {
            continue;
        }
        if matches!(column.dtype(), DataType::String) {
            tracing::debug!(column = %name, "skipping text column");
            continue;
        }
        let values = column
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        columns.push((name, values));
    }

    tracing::debug!(rows = df.height(), columns = columns.len(), "frame converted");
    Timeline::new(timestamps, columns)
}

fn index_timestamps(index: &Series) -> Result<Vec<NaiveDateTime>> {
    let unparseable = || ReportError::UnparseableTimestamps(index.name().to_string());

    if matches!(index.dtype(), DataType::String) {
        let raw: Vec<String> = index
            .str()?
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let format = detect_date_format(&raw).ok_or_else(unparseable)?;
        return raw
            .iter()
            .map(|s| format.parse(s))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(unparseable);
    }

    let millis = index
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    millis
        .i64()?
        .iter()
        .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(unparseable)
}
