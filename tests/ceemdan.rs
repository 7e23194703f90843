// Test intent: verifies CEEMDAN reconstruction, degenerate sizes and reproducibility.
#![cfg(feature = "std")]

use kemd::sift::MAX_SIFTINGS;
use kemd::{ceemdan, ceemdan_vec, num_imfs, EmdError, EnsembleParams};

fn signal(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let burst = if (80..140).contains(&i) { 0.7 * (t * 1.3).sin() } else { 0.0 };
            (t * 0.2).sin() + burst + 0.01 * t
        })
        .collect()
}

fn params(threads: i32) -> EnsembleParams {
    EnsembleParams {
        ensemble_size: 10,
        noise_strength: 0.15,
        num_siftings: 25,
        rng_seed: 2024,
        threads,
        ..EnsembleParams::default()
    }
}

#[test]
/// The rows sum to the input exactly up to rounding.
fn exact_reconstruction() {
    let x = signal(256);
    let imfs = ceemdan_vec(&x, 0, &params(0)).unwrap();
    assert_eq!(imfs.num_imfs(), num_imfs(256));
    for (a, b) in imfs.reconstruct().iter().zip(&x) {
        assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }
}

#[test]
/// With a single row the input is returned unchanged.
fn single_row() {
    let x = signal(64);
    let mut out = vec![0.0; 64];
    ceemdan(&x, &mut out, 1, &params(2)).unwrap();
    assert_eq!(out, x);
}

#[test]
/// Repeating a single-worker call reproduces the output exactly.
fn sequential_runs_are_identical() {
    let x = signal(180);
    let a = ceemdan_vec(&x, 4, &params(1)).unwrap();
    let b = ceemdan_vec(&x, 4, &params(1)).unwrap();
    assert_eq!(a, b);
}

#[test]
/// Different worker counts only change rounding.
fn worker_count_parity() {
    let x = signal(180);
    let seq = ceemdan_vec(&x, 4, &params(1)).unwrap();
    let par = ceemdan_vec(&x, 4, &params(3)).unwrap();
    for (a, b) in seq.as_slice().iter().zip(par.as_slice()) {
        assert!((a - b).abs() < 1e-8, "{} vs {}", a, b);
    }
}

#[test]
/// A badly sized output buffer is rejected.
fn wrong_output_length() {
    let x = signal(50);
    let mut out = vec![0.0; 49];
    assert_eq!(
        ceemdan(&x, &mut out, 1, &params(1)),
        Err(EmdError::MismatchedLengths)
    );
}

#[test]
/// A member that never converges fails the stage and the whole call.
fn sifting_failure_propagates() {
    let x = signal(64);
    let mut out = vec![0.0; 2 * 64];
    let p = EnsembleParams {
        ensemble_size: 4,
        s_number: MAX_SIFTINGS + 1,
        num_siftings: 0,
        ..params(2)
    };
    assert_eq!(ceemdan(&x, &mut out, 2, &p), Err(EmdError::NoConvergenceInSifting));
}
