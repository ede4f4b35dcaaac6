//! This module provides the closed-form predictor of the synthesized rule-table
//! size. The prediction is diagnostic only: it is printed beside the actual counts
//! and never feeds back into synthesis.

use crate::encoder::width;

/// Predicts the number of distinct rules synthesized for a machine with `states`
/// states, `symbols` symbols, and `halts` halt states at the given target size.
///
/// With `w` the block width, the terms are the read cases, the per-read write-back
/// expansion excluding halts, and the cross-block shift expansion in both
/// directions (`(w - 1) + (w + 1) = 2w` per state).
pub fn estimate(states: usize, symbols: usize, halts: usize, target: usize) -> usize {
    let w = width(symbols, target);
    let read_cases = states * symbols;

    read_cases + read_cases.saturating_sub(halts) * (w - 1) + w * 2 * states
}
