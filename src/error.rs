use core::fmt;

use crate::sift::StoppingCriteria;

/// Errors that can occur during decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmdError {
    /// The ensemble size was zero.
    InvalidEnsembleSize,
    /// The noise strength was negative or not finite.
    InvalidNoiseStrength,
    /// Noise was requested for an ensemble of one (plain EMD).
    NoiseAddedToEmd,
    /// An ensemble of more than one member was requested without noise.
    NoNoiseAddedToEnsemble,
    /// Neither the S-number nor the sifting count criterion was set.
    NoConvergencePossible,
    /// Spline evaluation needs at least two nodes.
    NotEnoughPointsForSpline,
    /// Spline abscissas must start at zero, increase strictly and end on an integer.
    InvalidSplinePoints,
    /// The tridiagonal spline system could not be solved.
    SolverFailure,
    /// Sifting did not converge within the safety ceiling.
    NoConvergenceInSifting,
    /// An output or scratch buffer has the wrong length.
    MismatchedLengths,
    /// The input signal contains NaN or infinite samples.
    InvalidValue,
    /// The worker pool for an ensemble call could not be started.
    WorkerPool,
}

impl fmt::Display for EmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmdError::InvalidEnsembleSize => write!(f, "ensemble size must be at least 1"),
            EmdError::InvalidNoiseStrength => {
                write!(f, "noise strength must be finite and non-negative")
            }
            EmdError::NoiseAddedToEmd => {
                write!(f, "positive noise strength but ensemble size is one (plain EMD)")
            }
            EmdError::NoNoiseAddedToEnsemble => {
                write!(f, "ensemble size is more than one but noise strength is zero")
            }
            EmdError::NoConvergencePossible => {
                write!(f, "stopping criteria invalid: sifting would never converge")
            }
            EmdError::NotEnoughPointsForSpline => {
                write!(f, "spline evaluation needs at least two points")
            }
            EmdError::InvalidSplinePoints => write!(f, "spline evaluation points are invalid"),
            EmdError::SolverFailure => write!(f, "tridiagonal spline system is singular"),
            EmdError::NoConvergenceInSifting => {
                write!(f, "sifting did not converge within the iteration ceiling")
            }
            EmdError::MismatchedLengths => write!(f, "buffer lengths do not match"),
            EmdError::InvalidValue => write!(f, "input contains NaN or infinite samples"),
            EmdError::WorkerPool => write!(f, "failed to start the ensemble worker pool"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EmdError {}

/// Validate the parameters shared by every ensemble routine.
///
/// Runs before any computation so that a rejected call leaves the output
/// untouched.
pub fn validate_ensemble(
    ensemble_size: usize,
    noise_strength: f64,
    stopping: StoppingCriteria,
) -> Result<(), EmdError> {
    if ensemble_size < 1 {
        return Err(EmdError::InvalidEnsembleSize);
    }
    if !noise_strength.is_finite() || noise_strength < 0.0 {
        return Err(EmdError::InvalidNoiseStrength);
    }
    if ensemble_size == 1 && noise_strength > 0.0 {
        return Err(EmdError::NoiseAddedToEmd);
    }
    if ensemble_size > 1 && noise_strength == 0.0 {
        return Err(EmdError::NoNoiseAddedToEnsemble);
    }
    stopping.validate()
}

/// Reject signals with NaN or infinite samples.
pub(crate) fn ensure_finite(input: &[f64]) -> Result<(), EmdError> {
    if input.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(EmdError::InvalidValue)
    }
}
