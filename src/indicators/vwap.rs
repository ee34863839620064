// =============================================================================
// Volume-Weighted Average Price (VWAP) — session cumulative
// =============================================================================
//
// VWAP at bar `i` is the volume-weighted mean of the typical price
// `(high + low + close) / 3` over every bar from the start of the series
// through `i`. There is no session reset: the accumulators run once over the
// whole input.
//
// Highs, lows and volumes may be shorter than the closes (or empty); missing
// samples contribute 0.0, so a series with no volume at all never produces a
// value.
// =============================================================================

use super::finite_or_zero;

/// Compute the cumulative VWAP series.
///
/// The output has exactly `closes.len()` elements. Index `i` is
/// `Some(cum_pv / cum_v)` while the cumulative volume is nonzero, `None`
/// otherwise (leading zero-volume bars stay undefined).
pub fn calculate_vwap(
    closes: &[f64],
    highs: &[f64],
    lows: &[f64],
    volumes: &[f64],
) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    let mut cum_pv = 0.0;
    let mut cum_v = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        let high = highs.get(i).copied().map_or(0.0, finite_or_zero);
        let low = lows.get(i).copied().map_or(0.0, finite_or_zero);
        let volume = volumes.get(i).copied().map_or(0.0, finite_or_zero);

        let typical = (high + low + finite_or_zero(close)) / 3.0;
        cum_pv += typical * volume;
        cum_v += volume;

        if cum_v != 0.0 {
            out.push(Some(cum_pv / cum_v));
        } else {
            out.push(None);
        }
    }

    out
}
