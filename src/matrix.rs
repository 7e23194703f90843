//! Decomposition output.
//!
//! The output of every routine is a row-major `M x N` matrix: rows are IMFs and
//! the last row is the final residual. Decomposition drivers never write rows
//! directly; they add into them through a [`RowSink`], which lets the same EMD
//! code accumulate into an exclusively owned buffer or into rows shared by
//! several ensemble workers.

use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

#[cfg(feature = "std")]
use std::sync::{Mutex, PoisonError};

use crate::error::EmdError;

/// Destination that EMD adds finished IMFs into.
pub trait RowSink {
    /// Add `values` element-wise into row `row`.
    fn accumulate(&self, row: usize, values: &[f64]);
}

/// Sample count of an `m x n` output, or an error if it overflows `usize`.
pub(crate) fn matrix_len(m: usize, n: usize) -> Result<usize, EmdError> {
    m.checked_mul(n).ok_or(EmdError::MismatchedLengths)
}

fn add_into(dst: &mut [f64], src: &[f64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// Rows of a buffer owned by a single caller.
pub struct ExclusiveRows<'a> {
    data: RefCell<&'a mut [f64]>,
    cols: usize,
}

impl<'a> ExclusiveRows<'a> {
    pub fn new(data: &'a mut [f64], cols: usize) -> Self {
        Self {
            data: RefCell::new(data),
            cols,
        }
    }
}

impl RowSink for ExclusiveRows<'_> {
    fn accumulate(&self, row: usize, values: &[f64]) {
        let mut data = self.data.borrow_mut();
        let start = row * self.cols;
        add_into(&mut data[start..start + self.cols], values);
    }
}

/// Rows shared between workers, one lock per row so that workers adding to
/// different rows never contend.
#[cfg(feature = "std")]
pub struct LockedRows<'a> {
    rows: Vec<Mutex<&'a mut [f64]>>,
}

#[cfg(feature = "std")]
impl<'a> LockedRows<'a> {
    /// Split `data` into rows of `cols` samples. `cols` must be non-zero.
    pub fn new(data: &'a mut [f64], cols: usize) -> Self {
        debug_assert!(cols > 0);
        Self {
            rows: data.chunks_mut(cols).map(Mutex::new).collect(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Run `f` with exclusive access to row `row`.
    pub fn with_row<R>(&self, row: usize, f: impl FnOnce(&mut [f64]) -> R) -> R {
        // A poisoned row means another worker panicked; that panic propagates
        // on its own, so keep going with the data as is.
        let mut guard = self.rows[row].lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[cfg(feature = "std")]
impl RowSink for LockedRows<'_> {
    fn accumulate(&self, row: usize, values: &[f64]) {
        self.with_row(row, |dst| add_into(dst, values));
    }
}

/// Owned decomposition result: `num_imfs` rows of `len` samples each.
#[derive(Debug, Clone, PartialEq)]
pub struct ImfMatrix {
    data: Vec<f64>,
    num_imfs: usize,
    len: usize,
}

impl ImfMatrix {
    /// # Panics
    ///
    /// If `num_imfs * len` overflows `usize`. See [`ImfMatrix::try_zeros`].
    pub fn zeros(num_imfs: usize, len: usize) -> Self {
        let total = num_imfs
            .checked_mul(len)
            .unwrap_or_else(|| panic!("{} x {} matrix overflows usize", num_imfs, len));
        Self {
            data: vec![0.0; total],
            num_imfs,
            len,
        }
    }

    /// Fallible [`ImfMatrix::zeros`]: [`EmdError::MismatchedLengths`] when the
    /// requested size overflows or cannot be allocated.
    pub fn try_zeros(num_imfs: usize, len: usize) -> Result<Self, EmdError> {
        let total = matrix_len(num_imfs, len)?;
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| EmdError::MismatchedLengths)?;
        data.resize(total, 0.0);
        Ok(Self {
            data,
            num_imfs,
            len,
        })
    }

    /// Number of rows, the final residual included.
    pub fn num_imfs(&self) -> usize {
        self.num_imfs
    }

    /// Samples per row.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `i`. Panics if `i >= num_imfs()`.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.num_imfs, "row {} out of range ({} rows)", i, self.num_imfs);
        &self.data[i * self.len..(i + 1) * self.len]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.num_imfs).map(move |i| self.row(i))
    }

    /// The final residual (last row), if any.
    pub fn residual(&self) -> Option<&[f64]> {
        self.num_imfs.checked_sub(1).map(|last| self.row(last))
    }

    /// Sum over all rows; equals the decomposed signal up to rounding for EMD
    /// and CEEMDAN.
    pub fn reconstruct(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.len];
        for row in self.rows() {
            add_into(&mut out, row);
        }
        out
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}
