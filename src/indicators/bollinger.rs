// =============================================================================
// Bollinger Bands + Rolling Standard Deviation
// =============================================================================
//
// Bollinger Bands are a middle band (SMA) flanked by bands at ± `mult`
// population standard deviations:
//
//   mid   = SMA(period)
//   upper = mid + mult * σ
//   lower = mid - mult * σ
//
// σ is the rolling population standard deviation over the same window,
// computed from a running sum and sum of squares. Floating-point cancellation
// can push the variance fractionally below zero, so it is floored at zero
// before the square root.
// =============================================================================

use anyhow::{bail, Result};

use super::sma::calculate_sma;

/// The three Bollinger output series, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub mid: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Rolling population standard deviation over a trailing `period` window.
///
/// `None` until the window has filled. Variance is computed as
/// `E[x²] - E[x]²` over the window and floored at zero.
///
/// # Edge cases
/// - `period == 0` => error (empty window has no mean)
/// - `period == 1` => defined everywhere, always `Some(0.0)`.
pub fn rolling_std(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period == 0 {
        bail!("stddev period must be >= 1");
    }

    let period_f = period as f64;
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        sum_sq += v * v;
        if i >= period {
            let old = values[i - period];
            sum -= old;
            sum_sq -= old * old;
        }
        if i + 1 >= period {
            let mean = sum / period_f;
            let variance = (sum_sq / period_f - mean * mean).max(0.0);
            out.push(Some(variance.sqrt()));
        } else {
            out.push(None);
        }
    }

    Ok(out)
}

/// Compute Bollinger Bands for `values` with look-back `period` and band
/// width `mult` (in standard deviations).
///
/// Each output series has exactly `values.len()` elements. All three are
/// `None` wherever either the SMA or σ is still warming up.
pub fn calculate_bollinger(
    values: &[f64],
    period: usize,
    mult: f64,
) -> Result<BollingerSeries> {
    let mid = calculate_sma(values, period);
    let sigma = rolling_std(values, period)?;

    let mut upper = Vec::with_capacity(values.len());
    let mut lower = Vec::with_capacity(values.len());
    for (m, s) in mid.iter().zip(sigma.iter()) {
        match (m, s) {
            (Some(m), Some(s)) => {
                upper.push(Some(m + mult * s));
                lower.push(Some(m - mult * s));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    Ok(BollingerSeries { mid, upper, lower })
}
