//! Hurst Estimator
//!
//! Rescaled-range (R/S) analysis. For each window size `n` the series is cut
//! into non-overlapping windows; each window is demeaned, the range `R` of
//! its cumulative deviations is divided by its standard deviation `S`, and
//! the ratios are averaged. Since `E[R/S] ~ c · n^H`, the slope of the
//! ordinary least-squares line through `(ln n, ln R/S)` estimates `H`.

/// Returned when the series is too short or the regression is degenerate
pub const DEFAULT_HURST: f64 = 0.5;

/// Series shorter than this are not analysed
pub const MIN_SERIES_LEN: usize = 10;

/// Candidate window sizes, ascending
pub const WINDOW_SIZES: [usize; 7] = [10, 20, 50, 100, 200, 500, 1000];

/// Estimate the Hurst exponent of `series`
///
/// ```
/// let trend: Vec<f64> = (0..1000).map(|i| i as f64).collect();
/// assert!(selfsim::ss_hurst::estimate(&trend) > 0.7);
/// assert_eq!(selfsim::ss_hurst::estimate(&[1.0, 2.0]), 0.5);
/// ```
pub fn estimate(series: &[f64]) -> f64 {
    if series.len() < MIN_SERIES_LEN {
        return DEFAULT_HURST;
    }

    let points: Vec<(f64, f64)> = WINDOW_SIZES
        .iter()
        .take_while(|&&w| w < series.len())
        .filter_map(|&w| {
            let rs = mean_rescaled_range(series, w)?;
            (rs > 0.0).then(|| ((w as f64).ln(), rs.ln()))
        })
        .collect();

    regression_slope(&points).unwrap_or(DEFAULT_HURST)
}

/// Mean R/S over the non-overlapping windows of size `window`
///
/// Windows with zero standard deviation are skipped. Returns `None` when no
/// window is usable.
pub fn mean_rescaled_range(series: &[f64], window: usize) -> Option<f64> {
    if window < 2 {
        return None;
    }

    let (total, used) = series
        .chunks_exact(window)
        .filter_map(rescaled_range)
        .fold((0.0, 0usize), |(sum, n), rs| (sum + rs, n + 1));

    if used == 0 {
        None
    } else {
        Some(total / used as f64)
    }
}

/// R/S of a single window, `None` if the window is flat
///
/// Demeaning a constant window of a value such as 0.1 leaves rounding
/// residue, so flatness is judged on the raw values and on a relative floor.
fn rescaled_range(segment: &[f64]) -> Option<f64> {
    let first = *segment.first()?;
    if segment.iter().all(|&v| v == first) {
        return None;
    }

    let n = segment.len() as f64;
    let mean = segment.iter().sum::<f64>() / n;

    let mut cumulative = 0.0;
    let mut min_cum = f64::INFINITY;
    let mut max_cum = f64::NEG_INFINITY;
    let mut sum_sq = 0.0;

    for &v in segment {
        let dev = v - mean;
        cumulative += dev;
        min_cum = min_cum.min(cumulative);
        max_cum = max_cum.max(cumulative);
        sum_sq += dev * dev;
    }

    let std_dev = (sum_sq / n).sqrt();
    if std_dev <= f64::EPSILON * mean.abs().max(1.0) {
        return None;
    }

    Some((max_cum - min_cum) / std_dev)
}

/// OLS slope of `y` on `x`; `None` for fewer than two points or zero spread
pub fn regression_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = points.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), &(x, y)| (sx + x, sy + y, sxy + x * y, sxx + x * x),
    );

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    Some((n * sum_xy - sum_x * sum_y) / denominator)
}
