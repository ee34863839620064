// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The arithmetic mean of the trailing `period` closes. Implemented with a
// running sum: each step adds the newest sample and, once the window has
// filled, subtracts the sample that fell out. No per-index rescan of the
// window.
// =============================================================================

/// Compute the SMA series for `values` with the given look-back `period`.
///
/// The output has exactly `values.len()` elements. Index `i` is `Some(mean)`
/// of `values[i - period + 1..=i]` once `i >= period - 1`, and `None` during
/// the warm-up before the window has filled.
///
/// # Edge cases
/// - `period <= 1` => the input passed through unchanged (every index
///   defined). A one-sample mean is the sample itself.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period <= 1 {
        return values.iter().map(|&v| Some(v)).collect();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }

    out
}
