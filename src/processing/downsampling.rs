/// Largest-Triangle-Three-Buckets (LTTB) downsampling over `(x, y)` points.
/// Keeps the first and last point and, from each bucket in between, the point
/// forming the largest triangle with the previous pick and the next bucket's
/// centroid.
pub fn lttb(points: &[(f64, f64)], target: usize) -> Vec<(f64, f64)> {
    let n = points.len();
    if n <= target || target < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(target);
    out.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target - 2) as f64;
    let bound = |i: usize| (((i as f64) * bucket_size) as usize + 1).min(n - 1);
    let mut prev = points[0];

    for i in 0..(target - 2) {
        let (start, end) = (bound(i), bound(i + 1));
        // The last bucket looks ahead to the final point.
        let next = &points[end..bound(i + 2).max(end + 1).min(n)];
        let (cx, cy) = centroid(next);

        let mut best = points[start];
        let mut best_area = -1.0f64;
        for &p in &points[start..end.max(start + 1)] {
            // Doubled area; only compared.
            let area = ((prev.0 - cx) * (p.1 - prev.1) - (prev.0 - p.0) * (cy - prev.1)).abs();
            if area > best_area {
                best_area = area;
                best = p;
            }
        }
        out.push(best);
        prev = best;
    }

    out.push(points[n - 1]);
    out
}

fn centroid(points: &[(f64, f64)]) -> (f64, f64) {
    let count = points.len().max(1) as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.0, sy + p.1));
    (sx / count, sy / count)
}

/// Reduce a trace to at most `max_points` for rasterizing. Traces with gaps
/// (NaN readings) are returned untouched so the gaps survive.
pub fn decimate(points: Vec<(f64, f64)>, max_points: usize) -> Vec<(f64, f64)> {
    if points.len() <= max_points || points.iter().any(|p| !p.1.is_finite()) {
        return points;
    }
    lttb(&points, max_points)
}
