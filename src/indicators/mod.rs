// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator algorithms exposed
// by the engine.  Every function returns one output sample per input sample;
// indices where the indicator cannot be computed yet (the warm-up period)
// carry `None` so that outputs stay positionally aligned with the input
// series.  `None` is a real "no value yet" marker: it is never collapsed to
// zero and never dropped.
//
// Fallible functions return `anyhow::Result` so the dispatcher can isolate a
// bad parameter set to its own result key without aborting the batch.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod vwap;

/// Coerce a possibly malformed sample into something safe to accumulate.
///
/// Mirrors the numeric-parse-or-zero rule applied to raw feed data: anything
/// non-finite (NaN, ±inf) contributes `0.0` instead of poisoning a running
/// sum.
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
