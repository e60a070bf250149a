use serde::Serialize;

/// Round to a fixed number of decimal places, ties to even. NaN passes
/// through.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Descriptive statistics for one sensor column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Compute statistics from raw readings, ignoring NaN.
    /// With no usable readings every field except `count` is NaN.
    pub fn compute(values: &[f64]) -> Self {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let count = vals.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std_dev: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        vals.sort_by(|a, b| a.total_cmp(b));
        let min = vals[0];
        let max = vals[count - 1];
        let mean = vals.iter().sum::<f64>() / count as f64;

        let std_dev = if count < 2 {
            f64::NAN
        } else if min == max {
            // Summation error must not turn a flat series into a varying one.
            0.0
        } else {
            let ss = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (count - 1) as f64).sqrt()
        };

        Self {
            count,
            mean,
            std_dev,
            min,
            q25: quantile_sorted(&vals, 0.25),
            median: quantile_sorted(&vals, 0.5),
            q75: quantile_sorted(&vals, 0.75),
            max,
        }
    }

    /// Format as an aligned multi-line block, one statistic per line.
    pub fn report(&self, label: &str) -> String {
        let rows = [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std_dev),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ];
        let formatted: Vec<String> = rows.iter().map(|(_, v)| format!("{v:.6}")).collect();
        let width = formatted.iter().map(|s| s.len()).max().unwrap_or(0) + 4;

        let mut out = String::new();
        for ((name, _), value) in rows.iter().zip(&formatted) {
            out.push_str(&format!("{name:<5}{value:>width$}\n"));
        }
        out.push_str(&format!("Name: {label}, dtype: float64"));
        out
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
