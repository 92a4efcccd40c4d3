//! Power-law fitting on log10–log10 axes.
//!
//! A tail-median series that scales as `y = c · x^m` is a straight line in
//! log space, so an ordinary least-squares slope estimates the convergence
//! order directly.

// ---------------------------------------------------------------------------
// PowerLawFit – slope, interval, and goodness of fit
// ---------------------------------------------------------------------------

/// Result of a log–log OLS fit.
#[derive(Debug, Clone, Copy)]
pub struct PowerLawFit {
    /// Slope in log10–log10 space (the estimated order).
    pub slope: f64,
    /// Intercept in log10 space: `log10 y = slope · log10 x + intercept`.
    pub intercept: f64,
    /// Lower bound of the two-sided 95% interval for the slope.
    pub ci_low: f64,
    /// Upper bound of the two-sided 95% interval for the slope.
    pub ci_high: f64,
    /// Coefficient of determination in log space; 0.0 when the responses
    /// have zero variance.
    pub r_squared: f64,
    /// Points actually used by the fit.
    pub n: usize,
}

// ---------------------------------------------------------------------------
// Fitting
// ---------------------------------------------------------------------------

/// Fit `log10 y = m · log10 x + b` by ordinary least squares.
///
/// Only pairs where both values are finite and strictly positive enter the
/// fit. Returns `None` when fewer than 3 usable pairs remain or when all
/// usable `x` coincide (zero variance in log space, slope undefined).
///
/// The interval uses a fixed table of two-sided 95% t critical values.
pub fn fit_power_law(x: &[f64], y: &[f64]) -> Option<PowerLawFit> {
    let pts: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|&(&a, &b)| a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a.log10(), b.log10()))
        .collect();
    let n = pts.len();
    if n < 3 {
        return None;
    }

    let xm = pts.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let ym = pts.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let sxx: f64 = pts.iter().map(|p| (p.0 - xm).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = pts.iter().map(|p| (p.0 - xm) * (p.1 - ym)).sum();

    let slope = sxy / sxx;
    let intercept = ym - slope * xm;

    let rss: f64 = pts
        .iter()
        .map(|p| (p.1 - (slope * p.0 + intercept)).powi(2))
        .sum();
    let tss: f64 = pts.iter().map(|p| (p.1 - ym).powi(2)).sum();
    let r_squared = if tss == 0.0 { 0.0 } else { 1.0 - rss / tss };

    let df = n - 2;
    let se = (rss / df.max(1) as f64 / sxx).sqrt();
    let t = t_critical_95(df);

    Some(PowerLawFit {
        slope,
        intercept,
        ci_low: slope - t * se,
        ci_high: slope + t * se,
        r_squared,
        n,
    })
}

/// Two-sided 95% t critical values by degrees of freedom.
fn t_critical_95(df: usize) -> f64 {
    match df {
        0 => 1.96,
        1 => 12.706,
        2 => 4.303,
        3..=20 => 2.086,
        _ => 1.96,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fit_is_none_or_well_formed(
            pts in proptest::collection::vec((1e-6..1e2f64, 1e-6..1e2f64), 0..40)
        ) {
            let x: Vec<f64> = pts.iter().map(|p| p.0).collect();
            let y: Vec<f64> = pts.iter().map(|p| p.1).collect();
            if let Some(fit) = fit_power_law(&x, &y) {
                prop_assert!(fit.slope.is_finite());
                prop_assert!(fit.r_squared <= 1.0);
                prop_assert!(fit.ci_low <= fit.slope && fit.slope <= fit.ci_high);
                prop_assert!(fit.n >= 3);
            }
        }

        #[test]
        fn two_points_never_fit(
            a in (1e-6..1e2f64, 1e-6..1e2f64),
            b in (1e-6..1e2f64, 1e-6..1e2f64),
        ) {
            prop_assert!(fit_power_law(&[a.0, b.0], &[a.1, b.1]).is_none());
        }

        #[test]
        fn exact_power_laws_recover_the_exponent(
            m in prop_oneof![-3.0..-0.5f64, 0.5..3.0f64],
            c in 0.1..10.0f64,
        ) {
            let x = [1e-3f64, 3e-3, 1e-2, 3e-2, 1e-1];
            let y: Vec<f64> = x.iter().map(|&v| c * v.powf(m)).collect();
            let fit = fit_power_law(&x, &y).expect("exact law fits");
            prop_assert!((fit.slope - m).abs() < 1e-6);
            prop_assert!(fit.r_squared > 1.0 - 1e-6);
        }
    }
}
