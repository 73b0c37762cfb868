//! Amplitude generators for the named shapes.

use std::f64::consts::PI;

use rand::Rng;

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Rescale `values` onto `[low, high]`.
///
/// NaN maps to `low` and infinities to the matching bound. A constant
/// array maps to `high`.
pub fn normalize(values: Vec<f64>, low: f64, high: f64) -> Vec<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = max - min;
    let degenerate = !span.is_finite() || span <= 0.0;

    values
        .into_iter()
        .map(|v| {
            if v.is_nan() {
                low
            } else if v == f64::INFINITY {
                high
            } else if v == f64::NEG_INFINITY {
                low
            } else if degenerate {
                high
            } else {
                ((v - min) / span).clamp(0.0, 1.0) * (high - low) + low
            }
        })
        .collect()
}

pub(super) fn square(n: usize) -> Vec<f64> {
    vec![1.0; n]
}

pub(super) fn gaussian(n: usize, center: Option<f64>, sigma: Option<f64>) -> Vec<f64> {
    let x0 = center.unwrap_or(0.5);
    let sigma = sigma.unwrap_or(1.0 / 6.0);
    let s = linspace(0.0, 1.0, n)
        .into_iter()
        .map(|x| (-(x - x0).powi(2) / 2.0 / sigma.powi(2)).exp())
        .collect();
    normalize(s, 0.0, 1.0)
}

pub(super) fn ramp(n: usize, percent: Option<f64>) -> Vec<f64> {
    let percent = percent.unwrap_or(40.0);
    let mut s = linspace(1.0 - percent.abs() / 100.0, 1.0, n);
    if percent <= 0.0 {
        s.reverse();
    }
    s
}

pub(super) fn tangent(n: usize, percent: Option<f64>, curvature: Option<f64>) -> Vec<f64> {
    let percent = percent.unwrap_or(50.0);
    let curvature = curvature.unwrap_or(0.1);
    let p = percent.abs() / 100.0;
    let s = linspace(0.0, 1.0, n)
        .into_iter()
        .map(|x| ((x - 0.5) / curvature).sinh())
        .collect();
    let mut s = normalize(s, 1.0 - p, 1.0);
    if percent <= 0.0 {
        s.reverse();
    }
    s
}

fn decay(n: usize, freq: Option<f64>, rate: Option<f64>) -> Vec<f64> {
    let freq = freq.unwrap_or(10.0) * 2.0 * PI;
    let rate = rate.unwrap_or(5.0);
    linspace(0.0, 1.0, n)
        .into_iter()
        .map(|x| (-rate * x).exp() * (freq * x).cos())
        .collect()
}

pub(super) fn fid(n: usize, freq: Option<f64>, rate: Option<f64>) -> Vec<f64> {
    normalize(decay(n, freq, rate), 0.0, 1.0)
}

pub(super) fn fid_jitter<R: Rng>(n: usize, freq: Option<f64>, rate: Option<f64>, rng: &mut R) -> Vec<f64> {
    let s = fid(n, freq, rate)
        .into_iter()
        .map(|v| v + (rng.gen::<f64>() - 0.5) * 0.1)
        .collect();
    normalize(s, 0.0, 1.0)
}

pub(super) fn gradient(n: usize, rise: Option<f64>) -> Vec<f64> {
    let rise = rise.unwrap_or(8.0);
    let scale = 0.5f64.powf(rise);
    let s = linspace(0.0, 1.0, n)
        .into_iter()
        .map(|x| (-(x - 0.5).abs().powf(rise) / scale).exp())
        .collect();
    normalize(s, 0.0, 1.0)
}

pub(super) fn sine(n: usize) -> Vec<f64> {
    linspace(0.0, PI, n).into_iter().map(f64::sin).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn within(values: &[f64], low: f64, high: f64) -> bool {
        values.iter().all(|&v| v >= low - 1e-12 && v <= high + 1e-12)
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_normalize_handles_degenerate_input() {
        assert_eq!(normalize(vec![3.0, 3.0], 0.0, 1.0), vec![1.0, 1.0]);
        let out = normalize(vec![f64::NAN, 0.0, 2.0, f64::INFINITY], 0.0, 1.0);
        assert_eq!(out, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_gaussian_peaks_at_center() {
        let s = gaussian(101, None, None);
        assert_abs_diff_eq!(s[50], 1.0);
        assert!(s[0] < 0.01);
        assert!(within(&s, 0.0, 1.0));
    }

    #[test]
    fn test_ramp_direction() {
        let up = ramp(11, Some(50.0));
        assert_abs_diff_eq!(up[0], 0.5);
        assert_abs_diff_eq!(up[10], 1.0);
        let down = ramp(11, Some(-50.0));
        assert_abs_diff_eq!(down[0], 1.0);
        assert_abs_diff_eq!(down[10], 0.5);
    }

    #[test]
    fn test_tangent_range() {
        let s = tangent(51, Some(30.0), None);
        assert_abs_diff_eq!(s[0], 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(s[50], 1.0, epsilon = 1e-12);
        let reversed = tangent(51, Some(-30.0), None);
        assert_abs_diff_eq!(reversed[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sine_lobe() {
        let s = sine(3);
        assert_abs_diff_eq!(s[0], 0.0);
        assert_abs_diff_eq!(s[1], 1.0);
        assert_abs_diff_eq!(s[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shapes_stay_in_range_for_any_parameters() {
        let params = [None, Some(-3.0), Some(0.0), Some(1e-9), Some(0.5), Some(37.0), Some(1e6)];
        for &a in &params {
            for &b in &params {
                assert!(within(&gaussian(64, a, b), 0.0, 1.0), "gauss {a:?} {b:?}");
                assert!(within(&fid(64, a, b), 0.0, 1.0), "fid {a:?} {b:?}");
            }
            assert!(within(&gradient(64, a), 0.0, 1.0), "grad {a:?}");
            let percent = a.unwrap_or(40.0);
            let low = 1.0 - percent.abs() / 100.0;
            assert!(within(&ramp(64, a), low.min(1.0), 1.0), "ramp {a:?}");
        }
    }

    #[test]
    fn test_fid_jitter_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = fid_jitter(200, Some(20.0), None, &mut rng);
        assert_eq!(s.len(), 200);
        assert!(within(&s, 0.0, 1.0));
    }
}
