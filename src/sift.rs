//! Sifting: reduce a signal to one Intrinsic Mode Function.
//!
//! Each iteration finds the extrema of the working buffer, fits spline
//! envelopes through the maxima and the minima and subtracts their mean in
//! place. Two stopping criteria are available and either one ends the loop:
//!
//! - **S-number**: the extrema and zero-crossing counts stayed within one of
//!   the previous iteration for `s_number` consecutive iterations, every
//!   maximum is positive and every minimum negative, and the number of interior
//!   extrema differs from the number of zero crossings by at most one.
//! - **Sifting count**: a fixed number of iterations was performed.
//!
//! A hard ceiling of [`MAX_SIFTINGS`] iterations turns a non-converging loop
//! into [`EmdError::NoConvergenceInSifting`].

use crate::error::EmdError;
use crate::extrema::Extrema;
use crate::spline::evaluate_spline_into;
use crate::workspace::SiftingWorkspace;

/// Safety ceiling on the number of sifting iterations.
pub const MAX_SIFTINGS: u32 = 10_000;

/// When sifting stops. A zero disables the respective criterion; at least
/// one must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppingCriteria {
    /// Consecutive stable iterations required by the S-number test.
    pub s_number: u32,
    /// Fixed number of siftings.
    pub num_siftings: u32,
}

impl Default for StoppingCriteria {
    fn default() -> Self {
        Self {
            s_number: 4,
            num_siftings: 50,
        }
    }
}

impl StoppingCriteria {
    pub const fn new(s_number: u32, num_siftings: u32) -> Self {
        Self {
            s_number,
            num_siftings,
        }
    }

    /// Sift only until the S-number test passes.
    pub const fn s_number(s_number: u32) -> Self {
        Self::new(s_number, 0)
    }

    /// Sift exactly `num_siftings` times.
    pub const fn fixed(num_siftings: u32) -> Self {
        Self::new(0, num_siftings)
    }

    pub fn validate(&self) -> Result<(), EmdError> {
        if self.s_number == 0 && self.num_siftings == 0 {
            return Err(EmdError::NoConvergencePossible);
        }
        Ok(())
    }
}

/// The criterion that ended a successful sifting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    SNumber,
    MaxSiftings,
}

/// Outcome of a successful [`sift`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiftReport {
    /// Number of envelope-mean subtractions performed.
    pub siftings: u32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiftState {
    Iterate,
    Converged(StopReason),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counts {
    maxima: usize,
    minima: usize,
    zero_crossings: usize,
}

impl Counts {
    fn of(e: &Extrema) -> Self {
        Self {
            maxima: e.num_max(),
            minima: e.num_min(),
            zero_crossings: e.zero_crossings,
        }
    }

    fn distance(&self, other: &Self) -> usize {
        self.maxima.abs_diff(other.maxima)
            + self.minima.abs_diff(other.minima)
            + self.zero_crossings.abs_diff(other.zero_crossings)
    }

    /// Interior extrema (the four boundary points excluded) against zero crossings.
    fn interior_matches_zero_crossings(&self) -> bool {
        let interior = (self.maxima + self.minima) as isize - 4;
        (interior - self.zero_crossings as isize).abs() <= 1
    }
}

struct Sifter<'a> {
    signal: &'a mut [f64],
    ws: &'a mut SiftingWorkspace,
    stopping: StoppingCriteria,
    siftings: u32,
    stable: u32,
    previous: Option<Counts>,
}

impl Sifter<'_> {
    fn step(&mut self) -> Result<SiftState, EmdError> {
        let stopping = self.stopping;
        if stopping.num_siftings != 0 && self.siftings >= stopping.num_siftings {
            return Ok(SiftState::Converged(StopReason::MaxSiftings));
        }
        if self.siftings >= MAX_SIFTINGS {
            return Ok(SiftState::Failed);
        }
        let ws = &mut *self.ws;
        ws.extrema.scan(&*self.signal);
        let counts = Counts::of(&ws.extrema);
        if stopping.s_number != 0 {
            let stable = self
                .previous
                .is_some_and(|prev| prev.distance(&counts) <= 1);
            if stable {
                self.stable += 1;
                if self.stable >= stopping.s_number
                    && ws.extrema.all_extrema_good
                    && counts.interior_matches_zero_crossings()
                {
                    return Ok(SiftState::Converged(StopReason::SNumber));
                }
            } else {
                self.stable = 0;
            }
        }
        self.previous = Some(counts);

        let e = &ws.extrema;
        evaluate_spline_into(&e.max_x, &e.max_y, &mut ws.max_spline, &mut ws.spline_scratch)?;
        evaluate_spline_into(&e.min_x, &e.min_y, &mut ws.min_spline, &mut ws.spline_scratch)?;
        for ((x, hi), lo) in self
            .signal
            .iter_mut()
            .zip(ws.max_spline.iter())
            .zip(ws.min_spline.iter())
        {
            *x -= 0.5 * (hi + lo);
        }
        self.siftings += 1;
        Ok(SiftState::Iterate)
    }
}

/// Sift `signal` in place until it is an IMF according to `stopping`.
///
/// # Errors
///
/// - [`EmdError::NoConvergencePossible`] if no stopping criterion is set
/// - [`EmdError::MismatchedLengths`] if `ws` was sized for another length
/// - any spline error raised while fitting the envelopes
/// - [`EmdError::NoConvergenceInSifting`] once [`MAX_SIFTINGS`] is reached
pub fn sift(
    signal: &mut [f64],
    ws: &mut SiftingWorkspace,
    stopping: StoppingCriteria,
) -> Result<SiftReport, EmdError> {
    stopping.validate()?;
    if ws.len() != signal.len() {
        return Err(EmdError::MismatchedLengths);
    }
    let mut sifter = Sifter {
        signal,
        ws,
        stopping,
        siftings: 0,
        stable: 0,
        previous: None,
    };
    loop {
        match sifter.step()? {
            SiftState::Iterate => continue,
            SiftState::Converged(stop) => {
                return Ok(SiftReport {
                    siftings: sifter.siftings,
                    stop,
                })
            }
            SiftState::Failed => {
                emd_log!(warn, "sifting gave up after {} iterations", sifter.siftings);
                return Err(EmdError::NoConvergenceInSifting);
            }
        }
    }
}
