//! Shapiro-Wilk normality test
//!
//! Implements Royston's (1995) approximation (algorithm AS R94), the same
//! procedure used by R's `shapiro.test` and SciPy's `shapiro`. Normal quantiles
//! and tail probabilities come from statrs.
//!
//! Reference:
//! Royston, P. (1995). Remark AS R94: A remark on algorithm AS 181: The
//! W-test for normality. Applied Statistics, 44(4), 547-551.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

/// Smallest sample the test is defined for
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Largest sample the approximation was validated for
pub const MAX_ACCURATE_SAMPLE_SIZE: usize = 5000;

const SMALL: f64 = 1e-19;

// Polynomial coefficients from AS R94
const G: [f64; 2] = [-2.273, 0.459];
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalityError {
    #[error("Shapiro-Wilk needs at least 3 values, got {0}")]
    TooFewValues(usize),

    #[error("Sample contains a non-finite value")]
    NonFinite,
}

/// Result of a Shapiro-Wilk test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapiroWilk {
    /// W statistic in (0, 1]; values near 1 indicate normality
    pub statistic: f64,
    /// Probability of a W this small under the normal hypothesis
    pub pvalue: f64,
    /// Number of values tested
    pub n: usize,
}

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Half of the antisymmetric coefficient vector `a` (largest first)
fn coefficients(n: usize, normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let an25 = an + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; half];
    a[0] = a1;

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        a[1] = a2;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };

    for i in first_scaled..half {
        a[i] = -m[i] / fac;
    }
    a
}

/// Significance of W (upper tail of the normalizing transform)
fn pvalue(w: f64, n: usize, normal: &Normal) -> f64 {
    if n == 3 {
        const PI6: f64 = 6.0 / std::f64::consts::PI;
        const STQR: f64 = std::f64::consts::FRAC_PI_3;
        return (PI6 * (w.sqrt().asin() - STQR)).clamp(0.0, 1.0);
    }

    let an = n as f64;
    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    normal.sf((y - m) / s).clamp(0.0, 1.0)
}

/// Run the Shapiro-Wilk test on a sample
///
/// The sample does not need to be sorted. Constant samples have no spread to
/// test and are reported as W = 1, p = 1.
///
/// # Example
/// ```
/// use sad::normality::shapiro_wilk;
///
/// let result = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
/// assert!((result.statistic - 1.0).abs() < 1e-9);
/// assert!(result.pvalue > 0.99);
/// ```
pub fn shapiro_wilk(sample: &[f64]) -> Result<ShapiroWilk, NormalityError> {
    let n = sample.len();
    if n < MIN_SAMPLE_SIZE {
        return Err(NormalityError::TooFewValues(n));
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(NormalityError::NonFinite);
    }
    if n > MAX_ACCURATE_SAMPLE_SIZE {
        tracing::warn!(
            n,
            "Shapiro-Wilk p-value may be inaccurate for more than {} values",
            MAX_ACCURATE_SAMPLE_SIZE
        );
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));

    let range = x[n - 1] - x[0];
    if range < SMALL {
        tracing::warn!(n, "sample has zero range; treating as normal (W=1, p=1)");
        return Ok(ShapiroWilk {
            statistic: 1.0,
            pvalue: 1.0,
            n,
        });
    }

    let normal = Normal::standard();
    let a = coefficients(n, &normal);

    // Scale by the range to keep the sums well conditioned
    let scaled: Vec<f64> = x.iter().map(|v| v / range).collect();
    let mean = scaled.iter().sum::<f64>() / n as f64;
    let ss: f64 = scaled.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (scaled[n - 1 - i] - scaled[i]))
        .sum();

    let statistic = (numerator * numerator / ss).min(1.0);
    let pvalue = pvalue(statistic, n, &normal);

    tracing::debug!(n, statistic, pvalue, "Shapiro-Wilk");

    Ok(ShapiroWilk {
        statistic,
        pvalue,
        n,
    })
}
