// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1 — Seed average gain / average loss with the plain mean of the first
//          `period` one-bar deltas (closes[1..=period]).
// Step 2 — First output at index `period`:
//            RS  = avg_gain / avg_loss
//            RSI = 100 - 100 / (1 + RS)
// Step 3 — Every later bar updates the averages with Wilder's smoothing,
//          not a fresh window mean:
//            avg_gain = (avg_gain * (period - 1) + gain) / period
//            avg_loss = (avg_loss * (period - 1) + loss) / period
//
// When avg_loss is zero the RSI is pinned at 100 (no losses recorded).
// =============================================================================

use anyhow::{bail, Result};

/// Compute the RSI series for `closes` with the given `period`.
///
/// The output has exactly `closes.len()` elements; indices `0..period` are
/// `None` (the seed consumes the first `period` deltas) and every index from
/// `period` onward carries a value in `[0, 100]`.
///
/// # Edge cases
/// - `period == 0` => error (Wilder's update divides by the period)
/// - `closes.len() <= period` => all `None` (not enough deltas to seed)
/// - `avg_loss == 0` => RSI is 100, including for a perfectly flat series.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period == 0 {
        bail!("rsi period must be >= 1");
    }

    let mut out = vec![None; closes.len()];
    if closes.len() <= period {
        return Ok(out);
    }

    let period_f = period as f64;

    // Seed: plain average of the first `period` gains / losses.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss += -delta;
        }
    }
    avg_gain /= period_f;
    avg_loss /= period_f;
    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // Wilder's smoothing for every subsequent bar.
    for i in period + 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(out)
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
