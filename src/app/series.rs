//! Finite-sample arithmetic over sensor time series.
//!
//! Raw glider series are intermittently sampled: most samples are NaN and the
//! finite ones are irregular in time. These helpers implement the masked,
//! time-aware operations the derivers are built from.

/// Indices of finite samples, in order
pub fn finite_indices(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, _)| i)
        .collect()
}

/// Index of the last finite sample, if any
pub fn last_finite_index(values: &[f64]) -> Option<usize> {
    values.iter().rposition(|v| v.is_finite())
}

/// Count of finite samples
pub fn finite_count(values: &[f64]) -> usize {
    values.iter().filter(|v| v.is_finite()).count()
}

/// True when the series holds no finite sample
pub fn all_nan(values: &[f64]) -> bool {
    !values.iter().any(|v| v.is_finite())
}

/// Mean over finite samples; NaN when there are none
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Maximum over finite samples; NaN when there are none
pub fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}

/// Piecewise-linear interpolation of `(xp, fp)` sample points at `x`.
///
/// `xp` must be increasing. Values outside the sampled range hold the edge
/// value; an empty sample set yields NaN everywhere and a single sample
/// yields that constant.
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xp.len(), fp.len());
    if xp.is_empty() {
        return vec![f64::NAN; x.len()];
    }

    x.iter()
        .map(|&xi| {
            if !xi.is_finite() {
                return f64::NAN;
            }
            if xi <= xp[0] {
                return fp[0];
            }
            let last = xp.len() - 1;
            if xi >= xp[last] {
                return fp[last];
            }
            // partition_point gives the first xp strictly greater than xi
            let hi = xp.partition_point(|&p| p <= xi);
            let lo = hi - 1;
            let span = xp[hi] - xp[lo];
            if span == 0.0 {
                return fp[lo];
            }
            fp[lo] + (fp[hi] - fp[lo]) * (xi - xp[lo]) / span
        })
        .collect()
}

/// Interpolate a sparse series onto a full time base.
///
/// Uses only the mutually finite `(time, value)` samples as interpolation
/// sources; time-aware, never index-aware. Sentinel-nulled or otherwise
/// missing samples can therefore never leak into the output's finite values.
pub fn interp_onto(time: &[f64], values: &[f64]) -> Vec<f64> {
    debug_assert_eq!(time.len(), values.len());
    let mut xp = Vec::new();
    let mut fp = Vec::new();
    for (t, v) in time.iter().zip(values.iter()) {
        if t.is_finite() && v.is_finite() {
            xp.push(*t);
            fp.push(*v);
        }
    }
    interp(time, &xp, &fp)
}

/// Interpolate `values` sampled at `time` onto arbitrary target timestamps
pub fn interp_at(target: &[f64], time: &[f64], values: &[f64]) -> Vec<f64> {
    debug_assert_eq!(time.len(), values.len());
    let mut xp = Vec::new();
    let mut fp = Vec::new();
    for (t, v) in time.iter().zip(values.iter()) {
        if t.is_finite() && v.is_finite() {
            xp.push(*t);
            fp.push(*v);
        }
    }
    interp(target, &xp, &fp)
}

/// Forward-fill NaN gaps with the last preceding finite sample.
///
/// Leading NaNs stay NaN.
pub fn fwd_fill(values: &[f64]) -> Vec<f64> {
    let mut filled = Vec::with_capacity(values.len());
    let mut last = f64::NAN;
    for &v in values {
        if v.is_finite() {
            last = v;
        }
        filled.push(last);
    }
    filled
}

/// Index of the sample nearest in time to `target`
pub fn nearest_index(time: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &t) in time.iter().enumerate() {
        if !t.is_finite() {
            continue;
        }
        let diff = (t - target).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((i, diff)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn interp_matches_linear_segments() {
        let out = interp(&[0.5, 1.5], &[0.0, 1.0, 2.0], &[0.0, 10.0, 20.0]);
        assert_eq!(out, vec![5.0, 15.0]);
    }

    #[test]
    fn interp_clamps_to_edges() {
        let out = interp(&[-1.0, 5.0], &[0.0, 2.0], &[3.0, 7.0]);
        assert_eq!(out, vec![3.0, 7.0]);
    }

    #[test]
    fn interp_with_no_sources_is_nan() {
        let out = interp(&[0.0, 1.0], &[], &[]);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn interp_onto_skips_nan_sources() {
        let time = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values = [NAN, 10.0, NAN, NAN, 30.0];
        let out = interp_onto(&time, &values);
        assert_eq!(out[1], 10.0);
        assert_eq!(out[4], 30.0);
        // midpoint between the two finite sources, by time
        assert!((out[2] - 16.666666666666668).abs() < 1e-12);
    }

    #[test]
    fn interp_onto_is_time_aware_not_index_aware() {
        // Uneven time spacing must weight the interpolation
        let time = [0.0, 1.0, 10.0];
        let values = [0.0, NAN, 100.0];
        let out = interp_onto(&time, &values);
        assert!((out[1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn fwd_fill_holds_last_value() {
        let out = fwd_fill(&[NAN, 1.0, NAN, NAN, 2.0]);
        assert!(out[0].is_nan());
        assert_eq!(&out[1..], &[1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn nan_mean_ignores_nan() {
        assert_eq!(nan_mean(&[1.0, NAN, 3.0]), 2.0);
        assert!(nan_mean(&[NAN, NAN]).is_nan());
    }

    #[test]
    fn nearest_index_minimizes_time_difference() {
        assert_eq!(nearest_index(&[0.0, 4.0, 10.0], 5.0), Some(1));
        assert_eq!(nearest_index(&[NAN, 4.0], 100.0), Some(1));
        assert_eq!(nearest_index(&[], 0.0), None);
    }

    #[test]
    fn last_finite_index_finds_trailing_sample() {
        assert_eq!(last_finite_index(&[NAN, 1.0, NAN]), Some(1));
        assert_eq!(last_finite_index(&[NAN, NAN]), None);
    }
}
