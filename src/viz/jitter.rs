//! Stable per-method jitter for the landscape plot.
//!
//! Offsets come from a hash of the method id, so a point lands in the same
//! place on every redraw.

use xxhash_rust::xxh64::xxh64;

/// Maximum horizontal offset, in stage units.
pub const JITTER_X: f64 = 0.25;
/// Maximum vertical offset, in rank units.
pub const JITTER_Y: f64 = 0.175;

/// `(dx, dy)` in `[-JITTER_X, JITTER_X] x [-JITTER_Y, JITTER_Y]`.
pub fn jitter(id: &str) -> (f64, f64) {
    let hash = xxh64(id.as_bytes(), 0);
    let low = unit(hash & 0xffff_ffff);
    let high = unit(hash >> 32);
    ((low * 2.0 - 1.0) * JITTER_X, (high * 2.0 - 1.0) * JITTER_Y)
}

fn unit(bits: u64) -> f64 {
    bits as f64 / u32::MAX as f64
}
