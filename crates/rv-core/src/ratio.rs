//! Bin-by-bin ratio of two histograms with propagated uncertainty.

use crate::error::Result;
use crate::hist::Hist1D;

/// `a / b`, or 0 when `b == 0`.
#[inline]
fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 { 0.0 } else { a / b }
}

/// Ratio `num / den` for histograms with identical binning.
///
/// Values are `num[i] / den[i]`; variances are
/// `|r| * sqrt((vn/n)^2 + (vd/d)^2)` with every division by zero taken as 0,
/// so empty bins give 0 rather than NaN or an error.
///
/// Identical operands are fully correlated: the ratio is 1 wherever the
/// denominator is non-zero, with zero variance everywhere.
///
/// The result keeps the numerator's edges, name and title.
pub fn ratio(num: &Hist1D, den: &Hist1D) -> Result<Hist1D> {
    num.check_compatible(den)?;
    let correlated = num.values == den.values && num.variances == den.variances;

    let values: Vec<f64> = num.values.iter().zip(&den.values).map(|(&n, &d)| safe_div(n, d)).collect();

    let variances = if correlated {
        vec![0.0; values.len()]
    } else {
        values
            .iter()
            .zip(num.values.iter().zip(&num.variances))
            .zip(den.values.iter().zip(&den.variances))
            .map(|((&r, (&n, &vn)), (&d, &vd))| {
                r.abs() * (safe_div(vn, n).powi(2) + safe_div(vd, d).powi(2)).sqrt()
            })
            .collect()
    };

    Ok(Hist1D {
        name: num.name.clone(),
        title: num.title.clone(),
        edges: num.edges.clone(),
        values,
        variances,
    })
}
