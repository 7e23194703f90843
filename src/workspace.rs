//! Scratch memory for the decomposition routines.
//!
//! Every buffer is sized from the signal length `N` when the workspace is
//! created and reused for every sifting iteration, so the inner loops never
//! touch the allocator. Each worker owns its workspace exclusively.

use alloc::vec;
use alloc::vec::Vec;

use crate::extrema::Extrema;
use crate::spline::spline_workspace_len;

#[cfg(feature = "std")]
use rand::rngs::StdRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

/// Buffers for reducing one signal to an IMF: the extrema, both envelopes and
/// the spline solver scratch.
#[derive(Debug, Clone)]
pub struct SiftingWorkspace {
    n: usize,
    pub(crate) extrema: Extrema,
    pub(crate) max_spline: Vec<f64>,
    pub(crate) min_spline: Vec<f64>,
    pub(crate) spline_scratch: Vec<f64>,
}

impl SiftingWorkspace {
    /// Allocate for signals of length `n`. The spline scratch covers the worst
    /// case where every sample is an extremum.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            extrema: Extrema::with_capacity(n),
            max_spline: vec![0.0; n],
            min_spline: vec![0.0; n],
            spline_scratch: vec![0.0; spline_workspace_len(n)],
        }
    }

    /// Signal length this workspace was sized for.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Extrema found by the most recent sifting iteration.
    pub fn extrema(&self) -> &Extrema {
        &self.extrema
    }
}

/// Sifting buffers plus the running residual between successive IMFs.
#[derive(Debug, Clone)]
pub struct EmdWorkspace {
    pub(crate) residual: Vec<f64>,
    pub(crate) sift: SiftingWorkspace,
}

impl EmdWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            residual: vec![0.0; n],
            sift: SiftingWorkspace::new(n),
        }
    }

    pub fn len(&self) -> usize {
        self.sift.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sift.is_empty()
    }
}

/// Per-worker state of a CEEMDAN stage: the trial signal of the current member
/// and the buffers to sift it. Noise comes precomputed, so no generator.
#[derive(Debug, Clone)]
pub struct StageWorkspace {
    pub(crate) member: Vec<f64>,
    pub(crate) sift: SiftingWorkspace,
}

impl StageWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            member: vec![0.0; n],
            sift: SiftingWorkspace::new(n),
        }
    }

    pub fn len(&self) -> usize {
        self.member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member.is_empty()
    }
}

/// Per-worker state of an EEMD call: the member signal being decomposed,
/// the EMD buffers and a private random number generator.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct EnsembleWorkspace {
    pub(crate) member: Vec<f64>,
    pub(crate) emd: EmdWorkspace,
    pub(crate) rng: StdRng,
}

#[cfg(feature = "std")]
impl EnsembleWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            member: vec![0.0; n],
            emd: EmdWorkspace::new(n),
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Restart the generator for the member seeded with `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn len(&self) -> usize {
        self.member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member.is_empty()
    }
}
