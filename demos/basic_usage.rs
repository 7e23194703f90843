//! Basic usage example for kemd
//!
//! Decomposes a two-tone test signal with EMD, EEMD and CEEMDAN and prints a
//! short summary of every IMF.

use kemd::{ceemdan_vec, eemd_vec, emd_vec, EnsembleParams, ImfMatrix, StoppingCriteria};

fn summarize(name: &str, imfs: &ImfMatrix, input: &[f64]) {
    println!("{}: {} rows of {} samples", name, imfs.num_imfs(), imfs.len());
    for (i, row) in imfs.rows().enumerate() {
        let energy: f64 = row.iter().map(|v| v * v).sum::<f64>() / row.len() as f64;
        let crossings = row.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
        println!("   row {:2}: mean power {:8.4}, zero crossings {:4}", i, energy, crossings);
    }
    let max_err = imfs
        .reconstruct()
        .iter()
        .zip(input)
        .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
    println!("   max reconstruction error: {:.3e}", max_err);
    println!();
}

fn main() {
    println!("=== kemd Basic Usage Example ===\n");

    let n = 1024;
    let signal: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (2.0 * std::f64::consts::PI * 60.0 * t).sin()
                + 0.5 * (2.0 * std::f64::consts::PI * 6.0 * t).sin()
                + t
        })
        .collect();

    // 1. Plain EMD
    let imfs = emd_vec(&signal, 0, StoppingCriteria::default()).unwrap();
    summarize("EMD", &imfs, &signal);

    // 2. EEMD with a small ensemble
    let params = EnsembleParams {
        ensemble_size: 50,
        rng_seed: 1,
        ..EnsembleParams::default()
    };
    let imfs = eemd_vec(&signal, 0, &params).unwrap();
    summarize("EEMD", &imfs, &signal);

    // 3. CEEMDAN, which reconstructs the input exactly
    let imfs = ceemdan_vec(&signal, 0, &params).unwrap();
    summarize("CEEMDAN", &imfs, &signal);
}
