use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Layouts tried when detecting the timestamp format of a column.
pub const DATE_FORMATS: &[&str] = &[
    // `%.f` also matches whole seconds, so the fractional layouts go first.
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// RFC 3339 / ISO 8601 with an offset, e.g. `2024-02-10T22:26:28-05:00`.
    /// The wall-clock time in that offset is kept.
    Rfc3339,
    Pattern(&'static str),
}

impl DateFormat {
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()),
            DateFormat::Pattern(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .or_else(|| NaiveDate::parse_from_str(value, fmt).ok()?.and_hms_opt(0, 0, 0)),
        }
    }
}

/// Pick the format that parses the largest share of a sample of `values`.
/// Returns `None` when nothing parses.
pub fn detect_date_format(values: &[String]) -> Option<DateFormat> {
    let sample: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();
    if sample.is_empty() {
        return None;
    }

    let score = |fmt: DateFormat| sample.iter().filter(|s| fmt.parse(s).is_some()).count();

    std::iter::once(DateFormat::Rfc3339)
        .chain(DATE_FORMATS.iter().map(|&f| DateFormat::Pattern(f)))
        .map(|fmt| (score(fmt), fmt))
        .filter(|(hits, _)| *hits > 0)
        // First format wins a tie.
        .fold(None, |best: Option<(usize, DateFormat)>, cand| match best {
            Some(b) if b.0 >= cand.0 => Some(b),
            _ => Some(cand),
        })
        .map(|(_, fmt)| fmt)
}
