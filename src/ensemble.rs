//! Noise-assisted ensemble decompositions.
//!
//! [`eemd`] decomposes `ensemble_size` noisy copies of the input independently
//! and averages their IMFs. [`ceemdan`] extracts one IMF stage at a time: every
//! member sifts the shared residual plus its own noise realization, the stage
//! result is the member average, and each member's noise is itself decomposed
//! in lock-step so that stage `k` adds the `k`-th mode of the noise.
//!
//! Members are seeded individually from `rng_seed + member`, which keeps the
//! noise independent of the worker count. The shared output is only ever
//! touched through per-row locks.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::vec;
use std::vec::Vec;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::emd::{emd_into, resolve_num_imfs};
use crate::error::{ensure_finite, validate_ensemble, EmdError};
use crate::matrix::{matrix_len, ImfMatrix, LockedRows, RowSink};
use crate::parallel::{WorkerPool, WorkerScratch};
use crate::sift::{sift, StoppingCriteria};
use crate::stats::std_dev;
use crate::workspace::{EnsembleWorkspace, SiftingWorkspace, StageWorkspace};

/// Base seed used when a call passes `rng_seed = 0`.
pub const DEFAULT_RNG_SEED: u64 = 4357;

/// Parameters of an ensemble decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleParams {
    /// Number of noisy members. `1` together with zero noise is plain EMD.
    pub ensemble_size: usize,
    /// Noise standard deviation relative to the signal's.
    pub noise_strength: f64,
    pub s_number: u32,
    pub num_siftings: u32,
    /// Base seed; `0` selects [`DEFAULT_RNG_SEED`].
    pub rng_seed: u64,
    /// Worker count; `<= 0` uses the process default (see [`crate::parallel`]).
    pub threads: i32,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            ensemble_size: 250,
            noise_strength: 0.2,
            s_number: 4,
            num_siftings: 50,
            rng_seed: 0,
            threads: 0,
        }
    }
}

impl EnsembleParams {
    pub fn new(ensemble_size: usize, noise_strength: f64) -> Self {
        Self {
            ensemble_size,
            noise_strength,
            ..Self::default()
        }
    }

    /// A single noiseless member, equivalent to [`crate::emd()`].
    pub fn emd() -> Self {
        Self::new(1, 0.0)
    }

    pub fn stopping(&self) -> StoppingCriteria {
        StoppingCriteria::new(self.s_number, self.num_siftings)
    }

    pub fn validate(&self) -> Result<(), EmdError> {
        validate_ensemble(self.ensemble_size, self.noise_strength, self.stopping())
    }
}

/// Seed of ensemble member `member` for a call with base seed `base`.
pub fn member_seed(base: u64, member: usize) -> u64 {
    let base = if base == 0 { DEFAULT_RNG_SEED } else { base };
    base.wrapping_add(member as u64)
}

/// Shared checks of both ensemble routines. Returns the resolved row count,
/// or `None` for an empty input.
fn prepare(
    input: &[f64],
    output: &[f64],
    num_imfs: usize,
    params: &EnsembleParams,
) -> Result<Option<usize>, EmdError> {
    params.validate()?;
    let n = input.len();
    if n == 0 {
        return Ok(None);
    }
    ensure_finite(input)?;
    let m = resolve_num_imfs(num_imfs, n);
    if output.len() != matrix_len(m, n)? {
        return Err(EmdError::MismatchedLengths);
    }
    Ok(Some(m))
}

/// Ensemble Empirical Mode Decomposition.
///
/// Member `i` decomposes `input + sigma * w_i`, where `w_i` is white Gaussian
/// noise from the member's own generator and
/// `sigma = noise_strength * std_dev(input)`. The output holds the member
/// average of every row. `num_imfs = 0` selects [`crate::num_imfs`].
///
/// With `ensemble_size = 1` and no noise the result equals [`crate::emd()`].
///
/// # Errors
///
/// - parameter errors from [`EnsembleParams::validate`], before any work
/// - [`EmdError::InvalidValue`] for non-finite input samples
/// - [`EmdError::MismatchedLengths`] if `output` is not `num_imfs * input.len()`
/// - the first sifting error raised by any member; `output` is unspecified
///   afterwards
pub fn eemd(
    input: &[f64],
    output: &mut [f64],
    num_imfs: usize,
    params: &EnsembleParams,
) -> Result<(), EmdError> {
    let Some(m) = prepare(input, output, num_imfs, params)? else {
        return Ok(());
    };
    let n = input.len();
    let size = params.ensemble_size;
    let stopping = params.stopping();
    let sigma = if params.noise_strength > 0.0 {
        params.noise_strength * std_dev(input)
    } else {
        0.0
    };
    let pool = WorkerPool::new(params.threads, size)?;
    emd_log!(
        debug,
        "EEMD: {} members, {} IMFs of {} samples on {} workers",
        size,
        m,
        n,
        pool.workers()
    );

    output.fill(0.0);
    {
        let rows = LockedRows::new(output, n);
        let finished = AtomicUsize::new(0);
        let mut seeds: Vec<u64> = (0..size).map(|i| member_seed(params.rng_seed, i)).collect();
        let scratch = pool.scratch(|| EnsembleWorkspace::new(n));
        pool.for_each_member(
            &scratch,
            &mut seeds,
            |ws: &mut EnsembleWorkspace, _, seed: &mut u64| {
                if sigma == 0.0 {
                    ws.member.copy_from_slice(input);
                } else {
                    ws.reseed(*seed);
                    let EnsembleWorkspace { member, rng, .. } = &mut *ws;
                    for (x, &v) in member.iter_mut().zip(input) {
                        let w: f64 = rng.sample(StandardNormal);
                        *x = v + sigma * w;
                    }
                }
                emd_into(&mut ws.member, &mut ws.emd, &rows, m, stopping)?;
                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                emd_log!(debug, "EEMD: {}/{} members finished", done, size);
                Ok(())
            },
        )?;
    }

    if size != 1 {
        let scale = 1.0 / size as f64;
        for v in output.iter_mut() {
            *v *= scale;
        }
    }
    Ok(())
}

/// Noise realization of one CEEMDAN member and its running EMD residual.
struct NoiseSlot {
    noise: Vec<f64>,
    residual: Vec<f64>,
}

impl NoiseSlot {
    /// Replace `noise` by the next mode of the realization.
    ///
    /// On the first stage the raw noise is sifted; afterwards the running
    /// residual is. Either way the extracted mode is removed from the residual.
    fn advance(
        &mut self,
        first: bool,
        ws: &mut SiftingWorkspace,
        stopping: StoppingCriteria,
    ) -> Result<(), EmdError> {
        if first {
            self.residual.copy_from_slice(&self.noise);
        } else {
            self.noise.copy_from_slice(&self.residual);
        }
        sift(&mut self.noise, ws, stopping)?;
        for (r, v) in self.residual.iter_mut().zip(&self.noise) {
            *r -= v;
        }
        Ok(())
    }
}

/// Unit-variance white noise for every member, partitioned by member index.
struct NoiseBank {
    slots: Vec<NoiseSlot>,
}

impl NoiseBank {
    fn draw(pool: &WorkerPool, size: usize, n: usize, base_seed: u64) -> Result<Self, EmdError> {
        let mut slots: Vec<NoiseSlot> = (0..size)
            .map(|_| NoiseSlot {
                noise: vec![0.0; n],
                residual: vec![0.0; n],
            })
            .collect();
        let scratch = pool.scratch(|| ());
        pool.for_each_member(
            &scratch,
            &mut slots,
            |_, i, slot: &mut NoiseSlot| {
                let mut rng = StdRng::seed_from_u64(member_seed(base_seed, i));
                for w in slot.noise.iter_mut() {
                    *w = rng.sample(StandardNormal);
                }
                Ok(())
            },
        )?;
        Ok(Self { slots })
    }
}

/// Complete Ensemble EMD with Adaptive Noise.
///
/// Runs `M - 1` sequential stages. In stage `k` member `i` sifts
/// `residual + beta_i * E_k(w_i)` once, where `E_k(w_i)` is the current mode of
/// its noise and `beta_i = noise_strength * std_dev(residual) / std_dev(E_k(w_i))`.
/// The member average becomes row `k` and is subtracted from the residual; the
/// last row holds the final residual, so the rows always sum to `input`.
///
/// `num_imfs = 1` copies the input. Errors as for [`eemd`].
pub fn ceemdan(
    input: &[f64],
    output: &mut [f64],
    num_imfs: usize,
    params: &EnsembleParams,
) -> Result<(), EmdError> {
    let Some(m) = prepare(input, output, num_imfs, params)? else {
        return Ok(());
    };
    if m == 1 {
        output.copy_from_slice(input);
        return Ok(());
    }
    let n = input.len();
    let size = params.ensemble_size;
    let stopping = params.stopping();
    let noise_strength = params.noise_strength;
    let pool = WorkerPool::new(params.threads, size)?;
    emd_log!(
        debug,
        "CEEMDAN: {} members, {} IMFs of {} samples on {} workers",
        size,
        m,
        n,
        pool.workers()
    );

    let mut bank = NoiseBank::draw(&pool, size, n, params.rng_seed)?;
    let scratch: WorkerScratch<StageWorkspace> = pool.scratch(|| StageWorkspace::new(n));
    output.fill(0.0);
    let rows = LockedRows::new(output, n);
    let mut residual = input.to_vec();
    let scale = 1.0 / size as f64;

    for imf_i in 0..m - 1 {
        let last_stage = imf_i + 2 == m;
        let res_sd = std_dev(&residual);
        let res = &residual[..];
        pool.for_each_member(
            &scratch,
            &mut bank.slots,
            |ws: &mut StageWorkspace, _, slot: &mut NoiseSlot| {
                let noise_sd = std_dev(&slot.noise);
                let beta = if noise_sd != 0.0 {
                    noise_strength * res_sd / noise_sd
                } else {
                    0.0
                };
                for ((x, r), w) in ws.member.iter_mut().zip(res).zip(&slot.noise) {
                    *x = r + beta * w;
                }
                sift(&mut ws.member, &mut ws.sift, stopping)?;
                rows.accumulate(imf_i, &ws.member);
                if !last_stage {
                    slot.advance(imf_i == 0, &mut ws.sift, stopping)?;
                }
                Ok(())
            },
        )?;
        // Every member of this stage has finished.
        rows.with_row(imf_i, |row| {
            for (v, r) in row.iter_mut().zip(residual.iter_mut()) {
                *v *= scale;
                *r -= *v;
            }
        });
        emd_log!(debug, "CEEMDAN: stage {}/{} done", imf_i + 1, m - 1);
    }
    rows.accumulate(m - 1, &residual);
    Ok(())
}

/// Allocating variant of [`eemd`].
pub fn eemd_vec(
    input: &[f64],
    num_imfs: usize,
    params: &EnsembleParams,
) -> Result<ImfMatrix, EmdError> {
    let m = resolve_num_imfs(num_imfs, input.len());
    let mut out = ImfMatrix::try_zeros(m, input.len())?;
    eemd(input, out.as_mut_slice(), m, params)?;
    Ok(out)
}

/// Allocating variant of [`ceemdan`].
pub fn ceemdan_vec(
    input: &[f64],
    num_imfs: usize,
    params: &EnsembleParams,
) -> Result<ImfMatrix, EmdError> {
    let m = resolve_num_imfs(num_imfs, input.len());
    let mut out = ImfMatrix::try_zeros(m, input.len())?;
    ceemdan(input, out.as_mut_slice(), m, params)?;
    Ok(out)
}
