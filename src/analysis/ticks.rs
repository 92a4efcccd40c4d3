//! Sparse tick selection and label formatting for log-scale axes.
//!
//! Dense default log ticks crowd a small figure, so the overlay style labels
//! at most a handful of round mantissas from the low end of the range and
//! leaves the rest to the grid.

/// Pick at most `max_labels` tick positions for a log axis spanning
/// `[ymin, ymax]`.
///
/// Candidates are the mantissas 1.0, 1.2, … 9.8 in `ymin`'s decade; if none
/// land inside the range, a geometric progression across the range's
/// mantissas stands in. The survivors are thinned by evenly spaced indices.
/// A non-positive or non-finite range yields no ticks, letting the renderer
/// keep its default labelling.
pub fn sparse_log_ticks(ymin: f64, ymax: f64, max_labels: usize) -> Vec<f64> {
    if !(ymin.is_finite() && ymax.is_finite()) || ymin <= 0.0 || ymax <= 0.0 {
        return Vec::new();
    }
    if max_labels == 0 {
        return Vec::new();
    }

    let base = 10f64.powf(ymin.log10().floor());
    let mmin = ymin / base;
    let mmax = ymax / base;

    let mut picks: Vec<f64> = (0..45)
        .map(|i| (10 + 2 * i) as f64 / 10.0)
        .filter(|&c| c >= mmin - 1e-12 && c <= mmax + 1e-12)
        .collect();
    if picks.is_empty() {
        picks = geometric_mantissas(mmin.max(1.0), mmax.min(9.99), max_labels);
    }
    if picks.is_empty() {
        return Vec::new();
    }

    let count = max_labels.min(picks.len());
    if count == 1 {
        return vec![picks[0] * base];
    }
    let last = (picks.len() - 1) as f64;
    (0..count)
        .map(|i| {
            let idx = (i as f64 * last / (count - 1) as f64) as usize;
            picks[idx] * base
        })
        .collect()
}

/// Inclusive geometric progression of `num` values from `start` to `stop`.
fn geometric_mantissas(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let ratio = (stop / start).powf(1.0 / (num - 1) as f64);
            (0..num).map(|i| start * ratio.powi(i as i32)).collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Label formatting
// ---------------------------------------------------------------------------

/// `"1.2 × 10^-3"`-style label for a log-axis tick. Empty for values the
/// axis cannot hold (non-positive or non-finite).
pub fn format_mantissa_pow10(y: f64) -> String {
    if !y.is_finite() || y <= 0.0 {
        return String::new();
    }
    let k = y.log10().floor();
    let mantissa = y / 10f64.powf(k);
    format!("{mantissa:.1} × 10^{}", k as i64)
}

/// Compact step-size label: four decimals with trailing zeros (and a bare
/// trailing dot) stripped, so 0.0100 renders as "0.01" and 1.0000 as "1".
pub fn format_step_size(x: f64) -> String {
    let s = format!("{x:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
