use std::io::Read;
use std::path::Path;

use crate::data::datetime::detect_date_format;
use crate::data::timeline::Timeline;
use crate::error::{ReportError, Result};

/// How to read a delimited sensor export.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Name of the timestamp column; the first column when `None`.
    pub timestamp_col: Option<String>,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { timestamp_col: None, delimiter: b',' }
    }
}

/// Load a CSV file into a [`Timeline`].
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Timeline> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Loading {:?}", path);
    read_csv(file, options)
}

/// Parse CSV text with a header row. The timestamp column is parsed with an
/// auto-detected layout; every other column becomes numeric, with blanks and
/// unparseable cells as NaN and `true`/`false` as 1/0. Columns with no
/// numeric cell at all are dropped.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Timeline> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let ts_idx = match &options.timestamp_col {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingColumn(name.clone()))?,
        None if headers.is_empty() => return Err(ReportError::MissingColumn("timestamp".to_string())),
        None => 0,
    };

    // column-major: column_data[col_idx][row_idx]
    let mut column_data: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col_idx, col) in column_data.iter_mut().enumerate() {
            col.push(record.get(col_idx).unwrap_or_default().to_string());
        }
    }

    let ts_name = &headers[ts_idx];
    let raw_ts = &column_data[ts_idx];
    let timestamps = if raw_ts.is_empty() {
        Vec::new()
    } else {
        let format = detect_date_format(raw_ts)
            .ok_or_else(|| ReportError::UnparseableTimestamps(ts_name.clone()))?;
        raw_ts
            .iter()
            .map(|s| format.parse(s))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ReportError::UnparseableTimestamps(ts_name.clone()))?
    };

    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    for (idx, (name, data)) in headers.iter().zip(&column_data).enumerate() {
        if idx == ts_idx {
            continue;
        }
        let (values, valid) = column_to_f64(data);
        if valid == 0 && !data.is_empty() {
            tracing::debug!(column = %name, "skipping non-numeric column");
            continue;
        }
        columns.push((name.clone(), values));
    }

    tracing::info!(rows = timestamps.len(), columns = columns.len(), "loaded dataset");
    Timeline::new(timestamps, columns)
}

/// Numeric values of a string column and how many of them parsed.
pub fn column_to_f64(data: &[String]) -> (Vec<f64>, usize) {
    let mut valid = 0usize;
    let values = data
        .iter()
        .map(|s| {
            let v = match s.trim() {
                "" => f64::NAN,
                t if t.eq_ignore_ascii_case("true") => 1.0,
                t if t.eq_ignore_ascii_case("false") => 0.0,
                t => t.parse::<f64>().unwrap_or(f64::NAN),
            };
            if v.is_finite() {
                valid += 1;
            }
            v
        })
        .collect();
    (values, valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
timestamp,duct_static,supply_vfd_speed,label,fc1_flag
2024-01-01 00:00:00,1.1,0.95,a,True
2024-01-01 01:00:00,,0.96,b,False
2024-01-01 02:00:00,1.3,0.97,c,0
";

    #[test]
    fn test_read_csv_columns() {
        let tl = read_csv(SAMPLE.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(tl.len(), 3);
        assert_eq!(tl.column_names(), &["duct_static", "supply_vfd_speed", "fc1_flag"]);

        let ds = tl.column(tl.resolve("duct_static").unwrap());
        assert_eq!(ds[0], 1.1);
        assert!(ds[1].is_nan());

        let flag = tl.resolve_flag("fc1_flag").unwrap();
        assert_eq!(flag.flags(), &[true, false, false]);
        assert_eq!(tl.elapsed_hours(), 2.0);
    }

    #[test]
    fn test_named_timestamp_column() {
        let text = "value,time\n1,2024-01-01T00:00:00\n2,2024-01-01T00:30:00\n";
        let options = CsvOptions { timestamp_col: Some("time".into()), ..Default::default() };
        let tl = read_csv(text.as_bytes(), &options).unwrap();
        assert_eq!(tl.column_names(), &["value"]);
        assert_eq!(tl.elapsed_hours(), 0.5);
    }

    #[test]
    fn test_missing_timestamp_column() {
        let options = CsvOptions { timestamp_col: Some("when".into()), ..Default::default() };
        let err = read_csv(SAMPLE.as_bytes(), &options).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "when"));
    }

    #[test]
    fn test_bad_timestamp_row() {
        let text = "t,v\n2024-01-01 00:00:00,1\nsoon,2\n";
        let err = read_csv(text.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ReportError::UnparseableTimestamps(_)));
    }

    #[test]
    fn test_unsorted_rows_rejected() {
        let text = "t,v\n2024-01-01 02:00:00,1\n2024-01-01 01:00:00,2\n";
        let err = read_csv(text.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, ReportError::NonIncreasingTimestamps { row: 1 }));
    }

    #[test]
    fn test_header_only_gives_empty_timeline() {
        let tl = read_csv("t,v,fc2_flag\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert!(tl.is_empty());
        assert_eq!(tl.column_names().len(), 2);
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let tl = load_csv(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(tl.len(), 3);
    }

    #[test]
    fn test_column_to_f64() {
        let data: Vec<String> = ["1.5", "x", "", "TRUE"].iter().map(|s| s.to_string()).collect();
        let (values, valid) = column_to_f64(&data);
        assert_eq!(valid, 2);
        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        assert_eq!(values[3], 1.0);
    }
}
