// Test intent: verifies parameter validation shared by the ensemble routines.
#![cfg(feature = "std")]

use kemd::error::validate_ensemble;
use kemd::{ceemdan, eemd, EmdError, EnsembleParams, StoppingCriteria};

#[test]
/// Each invalid parameter combination maps to its own error.
fn error_per_rule() {
    let stop = StoppingCriteria::default();
    assert_eq!(validate_ensemble(0, 0.2, stop), Err(EmdError::InvalidEnsembleSize));
    assert_eq!(validate_ensemble(5, -1.0, stop), Err(EmdError::InvalidNoiseStrength));
    assert_eq!(validate_ensemble(1, 0.2, stop), Err(EmdError::NoiseAddedToEmd));
    assert_eq!(validate_ensemble(5, 0.0, stop), Err(EmdError::NoNoiseAddedToEnsemble));
    assert_eq!(
        validate_ensemble(5, 0.2, StoppingCriteria::new(0, 0)),
        Err(EmdError::NoConvergencePossible)
    );
}

#[test]
/// Validation runs before the empty-input shortcut.
fn empty_input_still_validated() {
    let mut out: Vec<f64> = Vec::new();
    let bad = EnsembleParams::new(1, 0.5);
    assert_eq!(eemd(&[], &mut out, 0, &bad), Err(EmdError::NoiseAddedToEmd));
    assert_eq!(ceemdan(&[], &mut out, 0, &bad), Err(EmdError::NoiseAddedToEmd));
}

#[test]
/// Non-finite samples are rejected and the output stays untouched.
fn non_finite_input() {
    let x = [0.0, 1.0, f64::INFINITY, 2.0];
    let mut out = vec![5.0; 4];
    let p = EnsembleParams::new(4, 0.1);
    assert_eq!(eemd(&x, &mut out, 1, &p), Err(EmdError::InvalidValue));
    assert_eq!(ceemdan(&x, &mut out, 1, &p), Err(EmdError::InvalidValue));
    assert!(out.iter().all(|&v| v == 5.0));
}

#[test]
/// Errors print a readable message.
fn display() {
    let msg = EmdError::NoNoiseAddedToEnsemble.to_string();
    assert!(msg.contains("noise"));
}
