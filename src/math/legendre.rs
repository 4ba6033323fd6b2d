//! Legendre series evaluation and least-squares fitting.
//!
//! Colour-colour relations are fitted as Legendre series over the *natural*
//! domain of the independent colour (no rescaling to [-1, 1]). The basis is
//! orthogonal on [-1, 1] only, but even on wider colour ranges it stays far
//! better conditioned than a plain power basis at the orders used here.
//!
//! Conventions:
//! - coefficients are ordered low-to-high degree
//! - `legval` evaluates the series on the raw x value
//! - `legfit` solves the unweighted least-squares problem over the sample

use nalgebra::{DMatrix, DVector};

/// Evaluate a Legendre series at `x`.
///
/// Backward (Clenshaw-style) recurrence; an empty series evaluates to 0.
pub fn legval(x: f64, coeffs: &[f64]) -> f64 {
    match coeffs {
        [] => 0.0,
        [c0] => *c0,
        [c0, c1] => c0 + c1 * x,
        _ => {
            let n = coeffs.len();
            let mut nd = n as f64;
            let mut c0 = coeffs[n - 2];
            let mut c1 = coeffs[n - 1];
            for i in 3..=n {
                let tmp = c0;
                nd -= 1.0;
                c0 = coeffs[n - i] - (c1 * (nd - 1.0)) / nd;
                c1 = tmp + (c1 * x * (2.0 * nd - 1.0)) / nd;
            }
            c0 + c1 * x
        }
    }
}

/// Build the Legendre design matrix: column k holds P_k evaluated at each x.
///
/// Forward three-term recurrence: `(k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}`.
pub fn legvander(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let rows = xs.len();
    let cols = degree + 1;
    let mut vander = DMatrix::zeros(rows, cols);
    for (i, &x) in xs.iter().enumerate() {
        vander[(i, 0)] = 1.0;
        if cols > 1 {
            vander[(i, 1)] = x;
        }
        for k in 1..degree {
            let pk = vander[(i, k)];
            let pk_1 = vander[(i, k - 1)];
            let kf = k as f64;
            vander[(i, k + 1)] = ((2.0 * kf + 1.0) * x * pk - kf * pk_1) / (kf + 1.0);
        }
    }
    vander
}

/// Fit a Legendre series of the given degree to (xs, ys) by least squares.
///
/// Returns coefficients ordered low-to-high, or `None` if the solve fails
/// (the colour-composer and fit-engine validation make that unreachable for
/// well-formed model grids, but ill-conditioned input is not a panic here).
pub fn legfit(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }
    let design = legvander(xs, degree);
    let rhs = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &rhs)?;
    Some(beta.iter().copied().collect())
}

/// Solve min ||A·beta - y||_2 by SVD.
///
/// Model colours for neighbouring filters can be nearly collinear, so the
/// solve is retried at progressively looser singular-value tolerances before
/// giving up.
fn solve_least_squares(a: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = a.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
