// Test intent: verifies extrema detection, boundary extrapolation and zero crossings.

use kemd::{find_extrema, Extrema};

#[test]
/// A pure sine has alternating extrema with the expected signs.
fn sine_extrema_alternate() {
    let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.2).sin()).collect();
    let e = find_extrema(&x);
    assert!(e.num_max() >= 6);
    assert!(e.num_max().abs_diff(e.num_min()) <= 1);
    for (mx, my) in e.maxima().skip(1).take(e.num_max() - 2) {
        assert!(my > 0.9, "maximum at {} is {}", mx, my);
    }
    for (mx, my) in e.minima().skip(1).take(e.num_min() - 2) {
        assert!(my < -0.9, "minimum at {} is {}", mx, my);
    }
    // 200 * 0.2 / pi sign changes.
    assert_eq!(e.zero_crossings, 12);
}

#[test]
/// Endpoints are always part of both lists.
fn endpoints_present() {
    let x = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let e = find_extrema(&x);
    assert_eq!(e.max_x.first(), Some(&0.0));
    assert_eq!(e.min_x.first(), Some(&0.0));
    assert_eq!(e.max_x.last(), Some(&7.0));
    assert_eq!(e.min_x.last(), Some(&7.0));
}

#[test]
/// Abscissas increase strictly in both lists.
fn abscissas_increase() {
    let x: Vec<f64> = (0..97)
        .map(|i| {
            let t = i as f64;
            (t * 0.37).sin() + 0.4 * (t * 1.9).cos()
        })
        .collect();
    let e = find_extrema(&x);
    assert!(e.max_x.windows(2).all(|w| w[0] < w[1]));
    assert!(e.min_x.windows(2).all(|w| w[0] < w[1]));
}

#[test]
/// Scanning into a reused buffer gives the same result as a fresh call.
fn reused_buffer_matches_fresh() {
    let a: Vec<f64> = (0..64).map(|i| (i as f64 * 0.5).sin()).collect();
    let b: Vec<f64> = (0..64).map(|i| (i as f64 * 0.13).cos()).collect();
    let mut e = Extrema::with_capacity(64);
    e.scan(&a);
    e.scan(&b);
    assert_eq!(e, find_extrema(&b));
}
