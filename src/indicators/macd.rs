// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// Three index-aligned series:
//
//   macd   = EMA(fast) - EMA(slow)        (pointwise, None where either is)
//   signal = EMA(macd, signal_period)
//   hist   = macd - signal                (pointwise, None where either is)
//
// The signal line is smoothed over the macd series with not-yet-defined macd
// samples fed in as 0.0. That zero-fill pulls early signal values toward
// zero; it is kept on purpose for compatibility with the historical output
// of this engine. Do not "fix" it without versioning the contract.
// =============================================================================

use anyhow::Result;

use super::ema::calculate_ema;

/// The three MACD output series, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub hist: Vec<Option<f64>>,
}

/// Compute MACD for `values` with the given fast/slow/signal periods.
///
/// # Edge cases
/// - any period of 0 => error (propagated from the underlying EMA)
/// - `fast >= slow` is accepted; the macd line is simply inverted/flattened.
pub fn calculate_macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries> {
    let fast_ema = calculate_ema(values, fast)?;
    let slow_ema = calculate_ema(values, slow)?;

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // Zero-fill undefined macd samples for the smoothing input only; the
    // macd series itself keeps its None warm-up.
    let signal_input: Vec<f64> = macd.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal = calculate_ema(&signal_input, signal_period)?;

    let hist: Vec<Option<f64>> = macd
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    Ok(MacdSeries { macd, signal, hist })
}
