//! Local extrema detection.
//!
//! Scans a sampled signal for changes in slope sign and reports the maxima and
//! minima as `(x, y)` coordinates. Both ends of the signal are always present in
//! both lists, so every list starts at `x = 0` and ends at `x = N - 1`. When at
//! least two interior extrema exist the boundary values are replaced by a
//! linear extrapolation through the two nearest interior extrema whenever that
//! is more extreme than the raw end sample.

use alloc::vec::Vec;

/// Coordinates of the maxima and minima of a signal together with the
/// statistics the sifting stopping criterion needs.
///
/// The buffers are allocated once with [`Extrema::with_capacity`] and refilled
/// in place by [`Extrema::scan`], which never grows them beyond the signal
/// length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub max_x: Vec<f64>,
    pub max_y: Vec<f64>,
    pub min_x: Vec<f64>,
    pub min_y: Vec<f64>,
    /// `true` when every interior maximum is positive and every interior
    /// minimum is negative.
    pub all_extrema_good: bool,
    /// Sign changes between consecutive non-zero samples.
    pub zero_crossings: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slope {
    Up,
    Down,
    None,
}

/// For a line through `(x0, y0)` and `(x1, y1)`, return `y` at `x`.
#[inline]
fn linear_extrapolate(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    debug_assert!(x1 != x0);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

impl Extrema {
    /// Preallocate room for the extrema of a signal of length `n`.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            max_x: Vec::with_capacity(n),
            max_y: Vec::with_capacity(n),
            min_x: Vec::with_capacity(n),
            min_y: Vec::with_capacity(n),
            all_extrema_good: true,
            zero_crossings: 0,
        }
    }

    pub fn num_max(&self) -> usize {
        self.max_x.len()
    }

    pub fn num_min(&self) -> usize {
        self.min_x.len()
    }

    /// Iterator over the maxima as `(x, y)` pairs.
    pub fn maxima(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.max_x.iter().copied().zip(self.max_y.iter().copied())
    }

    /// Iterator over the minima as `(x, y)` pairs.
    pub fn minima(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.min_x.iter().copied().zip(self.min_y.iter().copied())
    }

    fn clear(&mut self) {
        self.max_x.clear();
        self.max_y.clear();
        self.min_x.clear();
        self.min_y.clear();
        self.all_extrema_good = true;
        self.zero_crossings = 0;
    }

    fn push_max(&mut self, x: f64, y: f64) {
        self.max_x.push(x);
        self.max_y.push(y);
    }

    fn push_min(&mut self, x: f64, y: f64) {
        self.min_x.push(x);
        self.min_y.push(y);
    }

    /// Refill the extrema from `x`, reusing the existing buffers.
    pub fn scan(&mut self, x: &[f64]) {
        self.clear();
        let n = x.len();
        if n == 0 {
            return;
        }
        // Both ends start out as a minimum and a maximum; the values may be
        // replaced by extrapolation below.
        self.push_max(0.0, x[0]);
        self.push_min(0.0, x[0]);
        if n == 1 {
            return;
        }
        // A flat run at an extremum collapses to its midpoint.
        let mut previous = Slope::None;
        let mut flat = 0usize;
        let mut last_sign = 0i8;
        for i in 0..n - 1 {
            let pos = i as f64 - flat as f64 / 2.0;
            if x[i + 1] > x[i] {
                if previous == Slope::Down {
                    self.push_min(pos, x[i]);
                    if x[i] >= 0.0 {
                        self.all_extrema_good = false;
                    }
                }
                previous = Slope::Up;
                flat = 0;
            } else if x[i + 1] < x[i] {
                if previous == Slope::Up {
                    self.push_max(pos, x[i]);
                    if x[i] <= 0.0 {
                        self.all_extrema_good = false;
                    }
                }
                previous = Slope::Down;
                flat = 0;
            } else {
                flat += 1;
            }
            let sign = sample_sign(x[i]);
            if sign != 0 {
                if last_sign != 0 && sign != last_sign {
                    self.zero_crossings += 1;
                }
                last_sign = sign;
            }
        }
        let sign = sample_sign(x[n - 1]);
        if sign != 0 && last_sign != 0 && sign != last_sign {
            self.zero_crossings += 1;
        }
        let end = (n - 1) as f64;
        self.push_max(end, x[n - 1]);
        self.push_min(end, x[n - 1]);
        self.extrapolate_ends(end);
    }

    fn extrapolate_ends(&mut self, end: f64) {
        let nmax = self.num_max();
        if nmax >= 4 {
            let (mx, my) = (&self.max_x, &mut self.max_y);
            let left = linear_extrapolate(mx[1], my[1], mx[2], my[2], 0.0);
            if left > my[0] {
                my[0] = left;
            }
            let right = linear_extrapolate(mx[nmax - 3], my[nmax - 3], mx[nmax - 2], my[nmax - 2], end);
            if right > my[nmax - 1] {
                my[nmax - 1] = right;
            }
        }
        let nmin = self.num_min();
        if nmin >= 4 {
            let (mx, my) = (&self.min_x, &mut self.min_y);
            let left = linear_extrapolate(mx[1], my[1], mx[2], my[2], 0.0);
            if left < my[0] {
                my[0] = left;
            }
            let right = linear_extrapolate(mx[nmin - 3], my[nmin - 3], mx[nmin - 2], my[nmin - 2], end);
            if right < my[nmin - 1] {
                my[nmin - 1] = right;
            }
        }
    }
}

#[inline]
fn sample_sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Find the local maxima and minima of `x`.
///
/// Allocating convenience wrapper around [`Extrema::scan`].
pub fn find_extrema(x: &[f64]) -> Extrema {
    let mut extrema = Extrema::with_capacity(x.len());
    extrema.scan(x);
    extrema
}
