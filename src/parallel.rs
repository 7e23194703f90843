//! Worker pool for ensemble decompositions.
//!
//! The number of workers for an ensemble call is resolved in this order:
//!
//! 1. an explicit positive `threads` value passed with the call,
//! 2. the process-wide override from [`set_ensemble_threads`],
//! 3. the `KEMD_THREADS` environment variable, read once,
//! 4. the number of logical CPUs.
//!
//! The result is capped at the ensemble size, since workers beyond one per
//! member would sit idle.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::vec::Vec;

use crate::error::EmdError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// `0` means no override.
static ENSEMBLE_THREAD_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
static ENV_THREADS: OnceLock<usize> = OnceLock::new();

/// Override the default number of ensemble workers for calls that pass
/// `threads <= 0`. `0` restores the environment/CPU default.
pub fn set_ensemble_threads(threads: usize) {
    ENSEMBLE_THREAD_OVERRIDE.store(threads, Ordering::Relaxed);
}

fn env_threads() -> usize {
    *ENV_THREADS.get_or_init(|| {
        std::env::var("KEMD_THREADS")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&t| t > 0)
            .unwrap_or_else(|| num_cpus::get().max(1))
    })
}

/// Worker count used when a call does not request one explicitly.
pub fn default_threads() -> usize {
    let override_thr = ENSEMBLE_THREAD_OVERRIDE.load(Ordering::Relaxed);
    if override_thr != 0 {
        return override_thr;
    }
    env_threads()
}

/// Resolve the worker count for an ensemble of `ensemble_size` members.
pub fn resolve_workers(requested: i32, ensemble_size: usize) -> usize {
    let base = if requested > 0 {
        requested as usize
    } else {
        default_threads()
    };
    base.min(ensemble_size).max(1)
}

/// One scratch value per pool worker, built once and kept for a whole
/// decomposition call.
///
/// Slots are indexed by pool thread, so a worker only ever locks its own.
pub(crate) struct WorkerScratch<W> {
    slots: Vec<Mutex<W>>,
}

impl<W> WorkerScratch<W> {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    fn with_slot<R>(&self, slot: usize, f: impl FnOnce(&mut W) -> R) -> R {
        // Poisoning means another member panicked; that panic propagates.
        let mut guard = self.slots[slot % self.slots.len()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Runs per-member work over a fixed set of workers.
///
/// The first error stops the scheduling of further members; members already
/// running finish their current unit before the error is returned.
pub(crate) struct WorkerPool {
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    pub(crate) fn new(requested: i32, ensemble_size: usize) -> Result<Self, EmdError> {
        let workers = resolve_workers(requested, ensemble_size);
        #[cfg(feature = "parallel")]
        {
            let pool = if workers > 1 {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| std::format!("kemd-worker-{}", i))
                    .build()
                    .map_err(|_| EmdError::WorkerPool)?;
                Some(pool)
            } else {
                None
            };
            Ok(Self { workers, pool })
        }
        #[cfg(not(feature = "parallel"))]
        {
            // Without rayon every member runs on the calling thread.
            let _ = workers;
            Ok(Self { workers: 1 })
        }
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    /// Build one scratch value per worker.
    pub(crate) fn scratch<W>(&self, mut init: impl FnMut() -> W) -> WorkerScratch<W> {
        WorkerScratch {
            slots: (0..self.workers).map(|_| Mutex::new(init())).collect(),
        }
    }

    /// Call `op(scratch, member_index, member)` for every element of `members`,
    /// handing each call the scratch slot of the worker running it.
    ///
    /// Returns once every scheduled member has finished, which makes each call
    /// a barrier for the caller.
    pub(crate) fn for_each_member<T, W, F>(
        &self,
        scratch: &WorkerScratch<W>,
        members: &mut [T],
        op: F,
    ) -> Result<(), EmdError>
    where
        T: Send,
        W: Send,
        F: Fn(&mut W, usize, &mut T) -> Result<(), EmdError> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            return pool.install(|| {
                members.par_iter_mut().enumerate().try_for_each(|(i, member)| {
                    let slot = rayon::current_thread_index().unwrap_or(0);
                    scratch.with_slot(slot, |w| op(w, i, member))
                })
            });
        }
        scratch.with_slot(0, |w| {
            for (i, member) in members.iter_mut().enumerate() {
                op(w, i, member)?;
            }
            Ok(())
        })
    }
}
