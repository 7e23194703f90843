//! Spline envelope evaluation.
//!
//! Interpolates a sparse set of nodes `(x, y)` and samples the interpolant at
//! every integer abscissa `0..=x[M-1]`. Four or more nodes use a cubic spline
//! with not-a-node end conditions, so the third derivative is continuous at the
//! second and second-to-last node. Two or three nodes fall back to the unique
//! interpolating polynomial (linear or quadratic).
//!
//! The cubic case solves an `(M-2)x(M-2)` tridiagonal system for the second
//! derivative coefficients. All of its storage comes from a caller supplied
//! scratch slice of [`spline_workspace_len`] elements.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::EmdError;

/// Number of scratch elements needed to evaluate a spline with `nodes` nodes.
///
/// The worst case when enveloping a signal of length `N` is `nodes = N`.
pub const fn spline_workspace_len(nodes: usize) -> usize {
    if nodes >= 3 {
        5 * nodes - 10
    } else {
        0
    }
}

fn check_nodes(x: &[f64], y: &[f64]) -> Result<usize, EmdError> {
    if x.len() != y.len() {
        return Err(EmdError::MismatchedLengths);
    }
    if x.len() <= 1 {
        return Err(EmdError::NotEnoughPointsForSpline);
    }
    let last = x[x.len() - 1];
    if x[0] != 0.0 || !last.is_finite() || libm::trunc(last) != last {
        return Err(EmdError::InvalidSplinePoints);
    }
    if x.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(EmdError::InvalidSplinePoints);
    }
    Ok(last as usize + 1)
}

/// Evaluate the interpolant through `(x, y)` at every integer in
/// `0..=x[x.len()-1]`, writing the values to the front of `out`.
///
/// `scratch` must hold at least [`spline_workspace_len`]`(x.len())` elements.
///
/// # Errors
///
/// - [`EmdError::NotEnoughPointsForSpline`] for fewer than two nodes
/// - [`EmdError::InvalidSplinePoints`] unless `x` starts at zero, increases
///   strictly and ends on an integer
/// - [`EmdError::MismatchedLengths`] if `x` and `y` differ in length or a
///   buffer is too short
/// - [`EmdError::SolverFailure`] if the tridiagonal system is singular
pub fn evaluate_spline_into(
    x: &[f64],
    y: &[f64],
    out: &mut [f64],
    scratch: &mut [f64],
) -> Result<(), EmdError> {
    let samples = check_nodes(x, y)?;
    if out.len() < samples {
        return Err(EmdError::MismatchedLengths);
    }
    let out = &mut out[..samples];
    if x.len() <= 3 {
        polynomial(x, y, out);
        return Ok(());
    }
    if scratch.len() < spline_workspace_len(x.len()) {
        return Err(EmdError::MismatchedLengths);
    }
    not_a_node(x, y, out, scratch)
}

/// Allocating convenience wrapper around [`evaluate_spline_into`].
pub fn evaluate_spline(x: &[f64], y: &[f64]) -> Result<Vec<f64>, EmdError> {
    let samples = check_nodes(x, y)?;
    let mut out = vec![0.0; samples];
    let mut scratch = vec![0.0; spline_workspace_len(x.len())];
    evaluate_spline_into(x, y, &mut out, &mut scratch)?;
    Ok(out)
}

/// Newton divided differences for two or three nodes.
fn polynomial(x: &[f64], y: &[f64], out: &mut [f64]) {
    let m = x.len();
    let mut dd = [0.0f64; 3];
    dd[..m].copy_from_slice(y);
    for k in 1..m {
        for i in (k..m).rev() {
            dd[i] = (dd[i] - dd[i - 1]) / (x[i] - x[i - k]);
        }
    }
    for (j, v) in out.iter_mut().enumerate() {
        let t = j as f64;
        let mut acc = dd[m - 1];
        for i in (0..m - 1).rev() {
            acc = dd[i] + (t - x[i]) * acc;
        }
        *v = acc;
    }
}

/// Cubic spline with not-a-node end conditions. The system follows
/// Engeln-Müllges & Uhlig, "Numerical Algorithms with C", p. 257.
fn not_a_node(x: &[f64], y: &[f64], out: &mut [f64], scratch: &mut [f64]) -> Result<(), EmdError> {
    let m = x.len();
    let n = m - 1;
    let sys = m - 2;
    let (c, rest) = scratch.split_at_mut(m);
    let (diag, rest) = rest.split_at_mut(sys);
    let (sup, rest) = rest.split_at_mut(sys - 1);
    let (sub, rest) = rest.split_at_mut(sys - 1);
    let g = &mut rest[..sys];

    let h_0 = x[1] - x[0];
    let h_1 = x[2] - x[1];
    let h_nm1 = x[n] - x[n - 1];
    let h_nm2 = x[n - 1] - x[n - 2];

    diag[0] = h_0 + 2.0 * h_1;
    sup[0] = h_1 - h_0;
    g[0] = 3.0 / (h_0 + h_1) * ((y[2] - y[1]) - (h_1 / h_0) * (y[1] - y[0]));
    for i in 2..=n - 2 {
        let h_i = x[i + 1] - x[i];
        let h_im1 = x[i] - x[i - 1];
        sub[i - 2] = h_im1;
        diag[i - 1] = 2.0 * (h_im1 + h_i);
        sup[i - 1] = h_i;
        g[i - 1] = 3.0 * ((y[i + 1] - y[i]) / h_i - (y[i] - y[i - 1]) / h_im1);
    }
    sub[n - 3] = h_nm2 - h_nm1;
    diag[n - 2] = 2.0 * h_nm2 + h_nm1;
    g[n - 2] = 3.0 / (h_nm1 + h_nm2) * ((h_nm2 / h_nm1) * (y[n] - y[n - 1]) - (y[n - 1] - y[n - 2]));

    solve_tridiagonal(diag, sup, sub, g, &mut c[1..n])?;

    c[0] = c[1] + (h_0 / h_1) * (c[1] - c[2]);
    c[n] = c[n - 1] + (h_nm1 / h_nm2) * (c[n - 1] - c[n - 2]);

    // Evaluation points increase monotonically, so the active interval only
    // ever moves forward.
    let mut i = 0;
    for (j, v) in out.iter_mut().enumerate() {
        let t = j as f64;
        while i + 1 < n && t > x[i + 1] {
            i += 1;
        }
        let dx = t - x[i];
        if dx == 0.0 {
            *v = y[i];
            continue;
        }
        let h_i = x[i + 1] - x[i];
        let a_i = y[i];
        let b_i = (y[i + 1] - y[i]) / h_i - (h_i / 3.0) * (c[i + 1] + 2.0 * c[i]);
        let c_i = c[i];
        let d_i = (c[i + 1] - c[i]) / (3.0 * h_i);
        *v = a_i + dx * (b_i + dx * (c_i + dx * d_i));
    }
    Ok(())
}

/// Thomas algorithm for a general tridiagonal system without pivoting.
///
/// `sub[i]` couples row `i + 1` to column `i`, `sup[i]` couples row `i` to
/// column `i + 1`. `sup` and `rhs` are overwritten with the eliminated
/// coefficients.
fn solve_tridiagonal(
    diag: &[f64],
    sup: &mut [f64],
    sub: &[f64],
    rhs: &mut [f64],
    solution: &mut [f64],
) -> Result<(), EmdError> {
    let len = diag.len();
    debug_assert_eq!(solution.len(), len);
    let mut pivot = diag[0];
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(EmdError::SolverFailure);
    }
    if len > 1 {
        sup[0] /= pivot;
    }
    rhs[0] /= pivot;
    for i in 1..len {
        pivot = diag[i] - sub[i - 1] * sup[i - 1];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(EmdError::SolverFailure);
        }
        if i < len - 1 {
            sup[i] /= pivot;
        }
        rhs[i] = (rhs[i] - sub[i - 1] * rhs[i - 1]) / pivot;
    }
    solution[len - 1] = rhs[len - 1];
    for i in (0..len - 1).rev() {
        solution[i] = rhs[i] - sup[i] * solution[i + 1];
    }
    Ok(())
}
