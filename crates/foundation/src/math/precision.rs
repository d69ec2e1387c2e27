//! Deterministic float ordering.
//!
//! Picking sorts hit distances every frame; ties and `-0.0`/NaN must not make
//! the winner depend on iteration order.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Absolute-or-relative closeness check used by geometry code.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    let diff = (a - b).abs();
    diff <= eps || diff <= eps * a.abs().max(b.abs())
}
