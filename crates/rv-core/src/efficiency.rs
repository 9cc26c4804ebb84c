//! Per-bin efficiencies with exact (Clopper-Pearson) binomial intervals.

use statrs::distribution::{Beta, ContinuousCDF};

use crate::error::{Error, Result};
use crate::hist::Hist1D;

/// One-sigma coverage used for validation plots.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.683;

/// Point estimates and interval bounds, one entry per bin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Efficiency {
    /// `passing / total`
    pub estimate: Vec<f64>,
    /// Lower interval bound
    pub lower: Vec<f64>,
    /// Upper interval bound
    pub upper: Vec<f64>,
}

/// Efficiency of `passing` out of `total` for each bin.
///
/// Counts are truncated to integers. Bins with `total == 0` report 0 for the
/// estimate and both bounds.
pub fn efficiency(passing: &[f64], total: &[f64], level: f64) -> Result<Efficiency> {
    if passing.len() != total.len() {
        return Err(Error::Validation(format!(
            "passing has {} bins, total has {}",
            passing.len(),
            total.len()
        )));
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::Validation(format!("confidence level must be in (0, 1), got {level}")));
    }

    let mut out = Efficiency {
        estimate: Vec::with_capacity(total.len()),
        lower: Vec::with_capacity(total.len()),
        upper: Vec::with_capacity(total.len()),
    };
    for (i, (&p, &t)) in passing.iter().zip(total).enumerate() {
        let (k, n) = counts(i, p, t)?;
        let (est, lo, hi) = clopper_pearson(k, n, level)?;
        out.estimate.push(est);
        out.lower.push(lo);
        out.upper.push(hi);
    }
    Ok(out)
}

/// Efficiency histogram from passing and total count histograms.
///
/// Variances are the squared half-width of the interval.
pub fn efficiency_hist(passing: &Hist1D, total: &Hist1D, level: f64) -> Result<Hist1D> {
    passing.check_compatible(total)?;
    let eff = efficiency(&passing.values, &total.values, level)?;
    let variances = eff.lower.iter().zip(&eff.upper).map(|(lo, hi)| (0.5 * (hi - lo)).powi(2)).collect();
    Hist1D::new(passing.name.clone(), passing.title.clone(), passing.edges.clone(), eff.estimate, variances)
}

fn counts(bin: usize, passing: f64, total: f64) -> Result<(u64, u64)> {
    if !passing.is_finite() || !total.is_finite() || passing < 0.0 || total < 0.0 {
        return Err(Error::Validation(format!(
            "bin {bin}: counts must be finite and non-negative, got {passing}/{total}"
        )));
    }
    let (k, n) = (passing.trunc() as u64, total.trunc() as u64);
    if k > n {
        return Err(Error::Validation(format!("bin {bin}: passing {k} exceeds total {n}")));
    }
    Ok((k, n))
}

/// `(k/n, lower, upper)` for the central interval at `level`.
fn clopper_pearson(k: u64, n: u64, level: f64) -> Result<(f64, f64, f64)> {
    if n == 0 {
        return Ok((0.0, 0.0, 0.0));
    }
    let alpha = 1.0 - level;
    let (kf, nf) = (k as f64, n as f64);

    let lower = if k == 0 { 0.0 } else { beta_quantile(kf, nf - kf + 1.0, alpha / 2.0)? };
    let upper = if k == n { 1.0 } else { beta_quantile(kf + 1.0, nf - kf, 1.0 - alpha / 2.0)? };
    Ok((kf / nf, lower, upper))
}

fn beta_quantile(a: f64, b: f64, p: f64) -> Result<f64> {
    let dist = Beta::new(a, b).map_err(|e| Error::Validation(format!("Beta({a}, {b}): {e}")))?;
    Ok(dist.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALPHA: f64 = 1.0 - DEFAULT_CONFIDENCE_LEVEL;

    #[test]
    fn empty_bins_are_zero() {
        let e = efficiency(&[0.0, 0.0], &[0.0, 0.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        assert_eq!(e.estimate, vec![0.0, 0.0]);
        assert_eq!(e.lower, vec![0.0, 0.0]);
        assert_eq!(e.upper, vec![0.0, 0.0]);
    }

    #[test]
    fn no_passing_has_closed_form_upper_bound() {
        // Beta(1, n) quantile: 1 - (1 - q)^(1/n)
        let e = efficiency(&[0.0], &[10.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        assert_eq!(e.estimate[0], 0.0);
        assert_eq!(e.lower[0], 0.0);
        assert_relative_eq!(e.upper[0], 1.0 - (ALPHA / 2.0).powf(0.1), max_relative = 1e-6);
    }

    #[test]
    fn all_passing_has_closed_form_lower_bound() {
        // Beta(n, 1) quantile: q^(1/n)
        let e = efficiency(&[8.0], &[8.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        assert_eq!(e.estimate[0], 1.0);
        assert_eq!(e.upper[0], 1.0);
        assert_relative_eq!(e.lower[0], (ALPHA / 2.0).powf(1.0 / 8.0), max_relative = 1e-6);
    }

    #[test]
    fn estimate_lies_inside_interval() {
        let passing = [1.0, 5.0, 37.0, 99.0, 250.0];
        let total = [3.0, 10.0, 40.0, 100.0, 1000.0];
        let e = efficiency(&passing, &total, DEFAULT_CONFIDENCE_LEVEL).unwrap();
        for i in 0..passing.len() {
            assert!(e.lower[i] <= e.estimate[i] && e.estimate[i] <= e.upper[i], "bin {i}: {e:?}");
            assert!(e.lower[i] >= 0.0 && e.upper[i] <= 1.0);
        }
    }

    #[test]
    fn symmetric_counts_give_symmetric_interval() {
        let e = efficiency(&[5.0], &[10.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        assert_relative_eq!(e.estimate[0], 0.5);
        assert_relative_eq!(e.lower[0] + e.upper[0], 1.0, max_relative = 1e-6);
    }

    #[test]
    fn wider_level_widens_interval() {
        let narrow = efficiency(&[30.0], &[50.0], 0.683).unwrap();
        let wide = efficiency(&[30.0], &[50.0], 0.95).unwrap();
        assert!(wide.lower[0] < narrow.lower[0]);
        assert!(wide.upper[0] > narrow.upper[0]);
    }

    #[test]
    fn counts_are_truncated() {
        let a = efficiency(&[4.9], &[10.2], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        let b = efficiency(&[4.0], &[10.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_inputs() {
        let level = DEFAULT_CONFIDENCE_LEVEL;
        assert!(efficiency(&[1.0], &[1.0, 2.0], level).is_err());
        assert!(efficiency(&[3.0], &[2.0], level).is_err());
        assert!(efficiency(&[-1.0], &[2.0], level).is_err());
        assert!(efficiency(&[f64::NAN], &[2.0], level).is_err());
        assert!(efficiency(&[1.0], &[2.0], 1.0).is_err());
        assert!(efficiency(&[1.0], &[2.0], 0.0).is_err());
    }

    #[test]
    fn efficiency_histogram_uses_half_width_as_error() {
        let pass = Hist1D::from_counts("pass", vec![0.0, 1.0, 2.0], vec![5.0, 0.0]).unwrap();
        let total = Hist1D::from_counts("total", vec![0.0, 1.0, 2.0], vec![10.0, 0.0]).unwrap();
        let h = efficiency_hist(&pass, &total, DEFAULT_CONFIDENCE_LEVEL).unwrap();
        let e = efficiency(&[5.0], &[10.0], DEFAULT_CONFIDENCE_LEVEL).unwrap();

        assert_eq!(h.values, vec![0.5, 0.0]);
        assert_relative_eq!(h.variances[0], (0.5 * (e.upper[0] - e.lower[0])).powi(2));
        assert_eq!(h.variances[1], 0.0);
    }
}
