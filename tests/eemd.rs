// Test intent: verifies EEMD against plain EMD, its seeding and worker-count parity.
#![cfg(feature = "std")]

use kemd::sift::MAX_SIFTINGS;
use kemd::{eemd, eemd_vec, emd_vec, EmdError, EnsembleParams, StoppingCriteria};

fn signal(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            (t * 0.6).sin() + 1.5 * (t * 0.04).cos() + 0.001 * t * t / n as f64
        })
        .collect()
}

fn params(threads: i32) -> EnsembleParams {
    EnsembleParams {
        ensemble_size: 12,
        noise_strength: 0.2,
        num_siftings: 20,
        rng_seed: 99,
        threads,
        ..EnsembleParams::default()
    }
}

#[test]
/// One noiseless member is plain EMD.
fn unit_ensemble_equals_emd() {
    let x = signal(256);
    let p = EnsembleParams {
        s_number: 3,
        num_siftings: 30,
        ..EnsembleParams::emd()
    };
    let a = eemd_vec(&x, 0, &p).unwrap();
    let b = emd_vec(&x, 0, StoppingCriteria::new(3, 30)).unwrap();
    for (u, v) in a.as_slice().iter().zip(b.as_slice()) {
        assert!((u - v).abs() < 1e-12);
    }
}

#[test]
/// Repeating a single-worker call reproduces the output exactly.
fn sequential_runs_are_identical() {
    let x = signal(200);
    let a = eemd_vec(&x, 4, &params(1)).unwrap();
    let b = eemd_vec(&x, 4, &params(1)).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}

#[test]
/// Different worker counts only change rounding.
fn worker_count_parity() {
    let x = signal(200);
    let seq = eemd_vec(&x, 4, &params(1)).unwrap();
    let par = eemd_vec(&x, 4, &params(4)).unwrap();
    for (a, b) in seq.as_slice().iter().zip(par.as_slice()) {
        assert!((a - b).abs() < 1e-10, "{} vs {}", a, b);
    }
}

#[test]
/// The average of the rows stays close to the input once the noise averages out.
fn rows_approximately_reconstruct() {
    let x = signal(200);
    let p = EnsembleParams {
        ensemble_size: 64,
        ..params(0)
    };
    let imfs = eemd_vec(&x, 0, &p).unwrap();
    let sd = 0.2 * kemd::stats::std_dev(&x);
    let max_err = imfs
        .reconstruct()
        .iter()
        .zip(&x)
        .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
    // Residual noise is the mean of 64 draws: sd / 8 per sample.
    assert!(max_err < 5.0 * sd / 8.0, "max error {}", max_err);
}

#[test]
/// An empty signal succeeds without touching anything.
fn empty_signal() {
    let mut out: Vec<f64> = Vec::new();
    assert_eq!(eemd(&[], &mut out, 0, &EnsembleParams::default()), Ok(()));
}

#[test]
/// A member that never converges fails the whole call with its error.
fn sifting_failure_propagates() {
    let x = signal(64);
    let mut out = vec![0.0; 2 * 64];
    let p = EnsembleParams {
        ensemble_size: 4,
        s_number: MAX_SIFTINGS + 1,
        num_siftings: 0,
        ..params(2)
    };
    assert_eq!(eemd(&x, &mut out, 2, &p), Err(EmdError::NoConvergenceInSifting));
}
