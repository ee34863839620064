// =============================================================================
// Indicator Engine — request dispatch
// =============================================================================
//
// The single entry point for a computation batch: a declarative list of
// indicator requests plus one price/volume series in, a result set out.
// Stateless; nothing survives between calls.
//
// Failure policy:
//   - Unknown indicator names are skipped silently (no key in the output).
//   - A failing computation (bad parameters) stores `null` under its own
//     key and never aborts the sibling requests.
// =============================================================================

use tracing::{debug, warn};

use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::ema::calculate_ema;
use crate::indicators::finite_or_zero;
use crate::indicators::macd::calculate_macd;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::vwap::calculate_vwap;
use crate::types::{IndicatorRequest, IndicatorValue, PriceSeries, ResultSet};

/// Fallback look-back for `sma`, `ema` and `rsi` when the request carries no
/// period.
const DEFAULT_PERIOD: usize = 14;
/// Bollinger defaults: 20-bar window, 2 standard deviations.
const DEFAULT_BB_PERIOD: usize = 20;
const DEFAULT_BB_MULT: f64 = 2.0;
/// MACD defaults: 12/26/9.
const DEFAULT_MACD_FAST: usize = 12;
const DEFAULT_MACD_SLOW: usize = 26;
const DEFAULT_MACD_SIGNAL: usize = 9;

/// Compute every requested indicator over `series`.
///
/// Result keys are derived from the request: `sma{p}`, `ema{p}`, `rsi{p}`,
/// `bb{p}`, `macd`, `vwap`. Every output series is index-aligned with
/// `series.closes` and exactly as long.
pub fn compute(requests: &[IndicatorRequest], series: &PriceSeries) -> ResultSet {
    // Coerce malformed close samples once; individual algorithms then only
    // see finite numbers. VWAP applies the same rule to highs/lows/volumes
    // internally because those may be shorter than the closes.
    let closes: Vec<f64> = series.closes.iter().map(|&v| finite_or_zero(v)).collect();

    let mut out = ResultSet::new();

    for request in requests {
        let name = request.name.trim().to_ascii_lowercase();
        let (key, value) = match name.as_str() {
            "sma" => {
                let p = request.period.unwrap_or(DEFAULT_PERIOD);
                (
                    format!("sma{p}"),
                    Ok(IndicatorValue::Series(calculate_sma(&closes, p))),
                )
            }
            "ema" => {
                let p = request.period.unwrap_or(DEFAULT_PERIOD);
                (
                    format!("ema{p}"),
                    calculate_ema(&closes, p).map(IndicatorValue::Series),
                )
            }
            "rsi" => {
                let p = request.period.unwrap_or(DEFAULT_PERIOD);
                (
                    format!("rsi{p}"),
                    calculate_rsi(&closes, p).map(IndicatorValue::Series),
                )
            }
            "bb" => {
                let p = request.period.unwrap_or(DEFAULT_BB_PERIOD);
                let mult = request.mult.unwrap_or(DEFAULT_BB_MULT);
                (
                    format!("bb{p}"),
                    calculate_bollinger(&closes, p, mult).map(|b| {
                        IndicatorValue::Bands {
                            mid: b.mid,
                            upper: b.upper,
                            lower: b.lower,
                        }
                    }),
                )
            }
            "macd" => {
                let fast = request.fast.unwrap_or(DEFAULT_MACD_FAST);
                let slow = request.slow.unwrap_or(DEFAULT_MACD_SLOW);
                let signal = request.signal.unwrap_or(DEFAULT_MACD_SIGNAL);
                (
                    "macd".to_string(),
                    calculate_macd(&closes, fast, slow, signal).map(|m| {
                        IndicatorValue::Macd {
                            macd: m.macd,
                            signal: m.signal,
                            hist: m.hist,
                        }
                    }),
                )
            }
            "vwap" => (
                "vwap".to_string(),
                Ok(IndicatorValue::Series(calculate_vwap(
                    &closes,
                    &series.highs,
                    &series.lows,
                    &series.volumes,
                ))),
            ),
            _ => {
                debug!(name = %request.name, "unknown indicator, skipped");
                continue;
            }
        };

        match value {
            Ok(v) => {
                out.insert(key, v);
            }
            Err(e) => {
                warn!(key = %key, error = %e, "indicator computation failed");
                out.insert(key, IndicatorValue::Unavailable);
            }
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn closes_only(closes: Vec<f64>) -> PriceSeries {
        PriceSeries {
            closes,
            ..Default::default()
        }
    }

    #[test]
    fn sma3_over_linear_ramp() {
        let series = closes_only((10..=20).map(|x| x as f64).collect());
        let out = compute(&[IndicatorRequest::with_period("sma", 3)], &series);
        let expected: Vec<Option<f64>> = vec![
            None,
            None,
            Some(11.0),
            Some(12.0),
            Some(13.0),
            Some(14.0),
            Some(15.0),
            Some(16.0),
            Some(17.0),
            Some(18.0),
            Some(19.0),
        ];
        match out.get("sma3") {
            Some(IndicatorValue::Series(s)) => assert_eq!(s, &expected),
            other => panic!("expected sma3 series, got {other:?}"),
        }
    }

    #[test]
    fn rsi_of_constant_series_is_100() {
        let series = closes_only(vec![100.0; 20]);
        let out = compute(&[IndicatorRequest::with_period("rsi", 14)], &series);
        match out.get("rsi14") {
            Some(IndicatorValue::Series(s)) => {
                assert!(s[..14].iter().all(Option::is_none));
                assert!(s[14..].iter().all(|v| *v == Some(100.0)));
            }
            other => panic!("expected rsi14 series, got {other:?}"),
        }
    }

    #[test]
    fn unknown_indicator_is_omitted() {
        let series = closes_only((1..=30).map(|x| x as f64).collect());
        let requests = [
            IndicatorRequest::with_period("sma", 5),
            IndicatorRequest::named("bogus"),
            IndicatorRequest::named("vwap"),
        ];
        let out = compute(&requests, &series);
        assert_eq!(out.len(), 2);
        assert!(out.contains_key("sma5"));
        assert!(out.contains_key("vwap"));
        assert!(!out.contains_key("bogus"));
    }

    #[test]
    fn name_matching_is_case_insensitive() {
        let series = closes_only((1..=10).map(|x| x as f64).collect());
        let out = compute(&[IndicatorRequest::with_period("SMA", 3)], &series);
        assert!(out.contains_key("sma3"));
    }

    #[test]
    fn failing_indicator_stores_null_without_aborting_batch() {
        let series = closes_only((1..=30).map(|x| x as f64).collect());
        let requests = [
            IndicatorRequest::with_period("rsi", 0),
            IndicatorRequest::with_period("sma", 3),
        ];
        let out = compute(&requests, &series);
        assert!(matches!(out.get("rsi0"), Some(IndicatorValue::Unavailable)));
        assert!(matches!(out.get("sma3"), Some(IndicatorValue::Series(_))));
    }

    #[test]
    fn defaults_apply_when_fields_absent() {
        let series = closes_only((1..=60).map(|x| x as f64).collect());
        let requests = [
            IndicatorRequest::named("rsi"),
            IndicatorRequest::named("bb"),
            IndicatorRequest::named("macd"),
        ];
        let out = compute(&requests, &series);
        assert!(out.contains_key("rsi14"));
        assert!(out.contains_key("bb20"));
        assert!(out.contains_key("macd"));
    }

    #[test]
    fn bollinger_bundle_is_aligned_and_symmetric() {
        let series = closes_only(
            (0..40).map(|x| 50.0 + ((x * 7) % 11) as f64).collect(),
        );
        let out = compute(&[IndicatorRequest::named("bb")], &series);
        match out.get("bb20") {
            Some(IndicatorValue::Bands { mid, upper, lower }) => {
                assert_eq!(mid.len(), 40);
                assert_eq!(upper.len(), 40);
                assert_eq!(lower.len(), 40);
                for i in 19..40 {
                    let m = mid[i].unwrap();
                    let spread_up = upper[i].unwrap() - m;
                    let spread_down = m - lower[i].unwrap();
                    assert!((spread_up - spread_down).abs() < 1e-12);
                }
            }
            other => panic!("expected bb20 bundle, got {other:?}"),
        }
    }

    #[test]
    fn outputs_stay_aligned_with_input_length() {
        let n = 37;
        let mut series = closes_only((0..n).map(|x| x as f64 * 1.5).collect());
        series.highs = series.closes.iter().map(|c| c + 1.0).collect();
        series.lows = series.closes.iter().map(|c| c - 1.0).collect();
        series.volumes = vec![10.0; n];

        let requests = [
            IndicatorRequest::with_period("sma", 5),
            IndicatorRequest::with_period("ema", 8),
            IndicatorRequest::with_period("rsi", 14),
            IndicatorRequest::named("bb"),
            IndicatorRequest::named("macd"),
            IndicatorRequest::named("vwap"),
        ];
        let out = compute(&requests, &series);
        for (key, value) in &out {
            match value {
                IndicatorValue::Series(s) => assert_eq!(s.len(), n, "{key}"),
                IndicatorValue::Bands { mid, upper, lower } => {
                    assert_eq!(mid.len(), n, "{key}");
                    assert_eq!(upper.len(), n, "{key}");
                    assert_eq!(lower.len(), n, "{key}");
                }
                IndicatorValue::Macd { macd, signal, hist } => {
                    assert_eq!(macd.len(), n, "{key}");
                    assert_eq!(signal.len(), n, "{key}");
                    assert_eq!(hist.len(), n, "{key}");
                }
                IndicatorValue::Unavailable => panic!("{key} failed"),
            }
        }
    }

    #[test]
    fn stateless_across_calls() {
        let series = closes_only((1..=25).map(|x| x as f64).collect());
        let requests = [IndicatorRequest::with_period("ema", 5)];
        let first = compute(&requests, &series);
        let second = compute(&requests, &series);
        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }
}
