// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA weights recent samples more heavily than the SMA.
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first sample seeds the running value and is never emitted; the
// recursion starts accumulating from index 1. Values computed before index
// `period - 1` are withheld as `None`, keeping the standard warm-up
// convention even though the smoothing is already running underneath.
// =============================================================================

use anyhow::{bail, Result};

/// Compute the EMA series for `values` with the given look-back `period`.
///
/// The output has exactly `values.len()` elements. Index 0 is always `None`
/// (it is the seed), indices `1..period-1` are `None` (warm-up), and every
/// index from `period - 1` onward carries the smoothed value.
///
/// # Edge cases
/// - `period == 0` => error (the multiplier would be degenerate)
/// - `period == 1` => multiplier is 1, so from index 1 the output tracks the
///   input exactly; index 0 stays `None` because the seed is never emitted.
pub fn calculate_ema(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period == 0 {
        bail!("ema period must be >= 1");
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i == 0 {
            prev = v;
            out.push(None);
            continue;
        }
        prev = v * multiplier + prev * (1.0 - multiplier);
        if i + 1 >= period {
            out.push(Some(prev));
        } else {
            out.push(None);
        }
    }

    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn ema_period_zero_is_error() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_err());
    }

    #[test]
    fn ema_output_length_matches_input() {
        let values = vec![1.0, 2.0, 3.0];
        assert_eq!(calculate_ema(&values, 10).unwrap().len(), values.len());
    }

    #[test]
    fn ema_seed_index_is_none() {
        let ema = calculate_ema(&[5.0, 5.0, 5.0], 1).unwrap();
        assert_eq!(ema[0], None);
    }

    #[test]
    fn ema_warm_up_is_none() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 5).unwrap();
        assert!(ema[..4].iter().all(Option::is_none));
        assert!(ema[4..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_known_values() {
        // period 3 => k = 0.5; seed = 2.0, then halfway between new and old.
        let values = vec![2.0, 4.0, 8.0, 4.0];
        let ema = calculate_ema(&values, 3).unwrap();
        // internal: prev1 = 4*0.5 + 2*0.5 = 3, prev2 = 8*0.5 + 3*0.5 = 5.5,
        //           prev3 = 4*0.5 + 5.5*0.5 = 4.75
        assert_eq!(ema[0], None);
        assert_eq!(ema[1], None);
        assert!((ema[2].unwrap() - 5.5).abs() < 1e-12);
        assert!((ema[3].unwrap() - 4.75).abs() < 1e-12);
    }

    #[test]
    fn ema_converges_to_constant_input() {
        let values = vec![100.0; 50];
        let ema = calculate_ema(&values, 10).unwrap();
        for v in ema.iter().flatten() {
            assert!((v - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_period_one_tracks_input_after_seed() {
        let values = vec![3.0, 7.0, 1.0, 5.0];
        let ema = calculate_ema(&values, 1).unwrap();
        assert_eq!(ema, vec![None, Some(7.0), Some(1.0), Some(5.0)]);
    }
}
