//! Demonstrates enabling verbose logging for kemd.
use kemd::{ceemdan_vec, EnsembleParams};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let signal: Vec<f64> = (0..256).map(|i| (i as f64 * 0.3).sin() + 0.01 * i as f64).collect();
    let params = EnsembleParams {
        ensemble_size: 8,
        threads: 2,
        ..EnsembleParams::default()
    };

    ceemdan_vec(&signal, 4, &params).unwrap();
}
