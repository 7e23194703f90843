//! Empirical Mode Decomposition of a single signal.
//!
//! IMFs are extracted one at a time: the current residual is sifted to an IMF,
//! the IMF is subtracted from the residual, and the loop repeats on what is
//! left. After `M - 1` extractions the remaining residual becomes the last row.

use alloc::vec::Vec;

use crate::error::{ensure_finite, EmdError};
use crate::matrix::{matrix_len, ExclusiveRows, ImfMatrix, RowSink};
use crate::sift::{sift, StoppingCriteria};
use crate::workspace::EmdWorkspace;

/// Number of IMFs, the final residual included, extracted from a signal of
/// length `n` when the caller asks for automatic sizing.
///
/// `0` for an empty signal, `1` up to three samples and `floor(log2(n))`
/// otherwise.
pub fn num_imfs(n: usize) -> usize {
    match n {
        0 => 0,
        1..=3 => 1,
        _ => n.ilog2() as usize,
    }
}

pub(crate) fn resolve_num_imfs(requested: usize, n: usize) -> usize {
    if requested == 0 {
        num_imfs(n)
    } else {
        requested
    }
}

/// Decompose `signal` into `m` rows added into `sink`.
///
/// `signal` is used as the sifting buffer and holds the last extracted IMF on
/// return. `m` must be at least one.
pub(crate) fn emd_into<S>(
    signal: &mut [f64],
    ws: &mut EmdWorkspace,
    sink: &S,
    m: usize,
    stopping: StoppingCriteria,
) -> Result<(), EmdError>
where
    S: RowSink + ?Sized,
{
    debug_assert!(m >= 1);
    ws.residual.copy_from_slice(signal);
    for imf_i in 0..m - 1 {
        if imf_i != 0 {
            signal.copy_from_slice(&ws.residual);
        }
        let report = sift(signal, &mut ws.sift, stopping)?;
        for (r, v) in ws.residual.iter_mut().zip(signal.iter()) {
            *r -= v;
        }
        sink.accumulate(imf_i, signal);
        emd_log!(trace, "IMF {} saved after {} siftings", imf_i + 1, report.siftings);
    }
    sink.accumulate(m - 1, &ws.residual);
    Ok(())
}

/// Decompose `input` into `num_imfs` rows written to `output` (row-major,
/// `num_imfs * input.len()` samples). `num_imfs = 0` selects [`num_imfs`].
///
/// Summing the rows reproduces `input` up to rounding.
///
/// # Errors
///
/// - [`EmdError::NoConvergencePossible`] if `stopping` disables both criteria
/// - [`EmdError::InvalidValue`] if `input` contains NaN or infinite samples
/// - [`EmdError::MismatchedLengths`] if `output` has the wrong length
/// - any error raised while sifting
pub fn emd(
    input: &[f64],
    output: &mut [f64],
    num_imfs: usize,
    stopping: StoppingCriteria,
) -> Result<(), EmdError> {
    stopping.validate()?;
    let n = input.len();
    if n == 0 {
        return Ok(());
    }
    ensure_finite(input)?;
    let m = resolve_num_imfs(num_imfs, n);
    if output.len() != matrix_len(m, n)? {
        return Err(EmdError::MismatchedLengths);
    }
    output.fill(0.0);
    let mut ws = EmdWorkspace::new(n);
    let mut signal: Vec<f64> = input.to_vec();
    let rows = ExclusiveRows::new(output, n);
    emd_into(&mut signal, &mut ws, &rows, m, stopping)
}

/// Allocating variant of [`emd`].
pub fn emd_vec(
    input: &[f64],
    num_imfs: usize,
    stopping: StoppingCriteria,
) -> Result<ImfMatrix, EmdError> {
    let m = resolve_num_imfs(num_imfs, input.len());
    let mut out = ImfMatrix::try_zeros(m, input.len())?;
    emd(input, out.as_mut_slice(), m, stopping)?;
    Ok(out)
}
