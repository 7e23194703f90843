// Test intent: verifies envelope splines interpolate their nodes and reject bad input.

use kemd::{evaluate_spline, evaluate_spline_into, spline_workspace_len, EmdError};

#[test]
/// The spline passes through every node and covers `0..=x[last]`.
fn interpolates_nodes() {
    let x = [0.0, 3.0, 7.0, 8.0, 12.0, 20.0];
    let y = [1.0, -2.0, 0.5, 4.0, -1.0, 2.0];
    let s = evaluate_spline(&x, &y).unwrap();
    assert_eq!(s.len(), 21);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        assert!((s[xi as usize] - yi).abs() < 1e-10);
    }
}

#[test]
/// A smooth function sampled sparsely is reproduced closely between nodes.
fn approximates_smooth_function() {
    let x: Vec<f64> = (0..=10).map(|i| (i * 10) as f64).collect();
    let y: Vec<f64> = x.iter().map(|&t| (t * 0.03).sin()).collect();
    let s = evaluate_spline(&x, &y).unwrap();
    for (i, v) in s.iter().enumerate() {
        let expected = (i as f64 * 0.03).sin();
        assert!((v - expected).abs() < 1e-3, "{}: {} vs {}", i, v, expected);
    }
}

#[test]
/// Reusing one scratch buffer for two different node sets is safe.
fn scratch_reuse() {
    let mut scratch = vec![0.0; spline_workspace_len(8)];
    let mut out = vec![0.0; 40];
    let xa = [0.0, 5.0, 9.0, 14.0, 20.0, 27.0, 33.0, 39.0];
    let ya = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
    evaluate_spline_into(&xa, &ya, &mut out, &mut scratch).unwrap();
    let xb = [0.0, 10.0, 20.0, 30.0];
    let yb = [2.0, 2.0, 2.0, 2.0];
    evaluate_spline_into(&xb, &yb, &mut out, &mut scratch).unwrap();
    assert!(out[..31].iter().all(|v| (v - 2.0).abs() < 1e-12));
}

#[test]
/// Invalid node sets are reported with distinct errors.
fn error_kinds() {
    assert_eq!(
        evaluate_spline(&[0.0], &[1.0]),
        Err(EmdError::NotEnoughPointsForSpline)
    );
    assert_eq!(
        evaluate_spline(&[0.0, 2.0, 1.0, 4.0], &[0.0; 4]),
        Err(EmdError::InvalidSplinePoints)
    );
    assert_eq!(
        evaluate_spline(&[0.0, 1.0], &[0.0; 3]),
        Err(EmdError::MismatchedLengths)
    );
    let mut out = vec![0.0; 3];
    let mut scratch = vec![0.0; 16];
    assert_eq!(
        evaluate_spline_into(&[0.0, 1.0, 2.0, 5.0], &[0.0; 4], &mut out, &mut scratch),
        Err(EmdError::MismatchedLengths)
    );
}
