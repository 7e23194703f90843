//! # kemd - Empirical Mode Decomposition for Rust
//!
//! Decomposes a 1-D signal into a small set of oscillatory Intrinsic Mode
//! Functions (IMFs) plus a final residual trend. The plain EMD driver and all
//! of its building blocks are `no_std + alloc`; the noise-assisted ensemble
//! variants need threads and a random number generator and live behind the
//! `std` feature.
//!
//! ## Features
//!
//! - **Allocation-free sifting**: all scratch memory is sized once per call in a
//!   [`workspace`] and reused across iterations
//! - **Not-a-node cubic splines** for the upper and lower envelopes, with a
//!   polynomial fallback for fewer than four nodes
//! - **EEMD and CEEMDAN** with per-member deterministic seeding
//! - **Parallel ensembles** on a dedicated rayon pool (optional)
//!
//! ## Cargo Features
//!
//! - `std` (default): Enable the ensemble variants
//! - `parallel` (default): Run ensemble members on a rayon worker pool
//! - `verbose-logging`: Emit sifting and ensemble diagnostics through `log`
//!
//! ## Determinism
//!
//! Every ensemble member seeds its own generator from `rng_seed + member`, so
//! the noise realizations do not depend on how work is scheduled. Members add
//! into shared output rows in completion order, so with more than one worker
//! the lowest floating point bits may differ between runs. A single worker is
//! bit-for-bit reproducible.
//!
//! ## Examples
//!
//! Run the demos with:
//! ```bash
//! cargo run --example basic_usage
//! cargo run --example verbose_logging --features verbose-logging
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

/// Error type shared by every decomposition routine
pub mod error;

/// Local extrema detection with boundary extrapolation
pub mod extrema;

/// Envelope interpolation
///
/// Not-a-node cubic splines evaluated at integer abscissas.
pub mod spline;

/// Small statistics helpers
pub mod stats;

/// Preallocated scratch memory for sifting and EMD
pub mod workspace;

/// The sifting procedure
pub mod sift;

/// IMF output matrix and row accumulation
pub mod matrix;

/// Plain Empirical Mode Decomposition
pub mod emd;

/// Worker pool sizing and configuration
#[cfg(feature = "std")]
pub mod parallel;

/// Noise-assisted ensemble variants (EEMD and CEEMDAN)
#[cfg(feature = "std")]
pub mod ensemble;

pub use emd::{emd, emd_vec, num_imfs};
pub use error::EmdError;
pub use extrema::{find_extrema, Extrema};
pub use matrix::ImfMatrix;
pub use sift::{sift, SiftReport, StopReason, StoppingCriteria};
pub use spline::{evaluate_spline, evaluate_spline_into, spline_workspace_len};

#[cfg(feature = "std")]
pub use ensemble::{ceemdan, ceemdan_vec, eemd, eemd_vec, EnsembleParams};
#[cfg(feature = "std")]
pub use parallel::set_ensemble_threads;
