//! Bidirectional coordinate translation between subscript, view, and
//! buffer index spaces.
//!
//! `ind2sub`'s `offset == 0` vs `offset != 0` asymmetry and `bind2vind`'s
//! sign-correction step are both preserved verbatim from the system
//! this crate is grounded on; see DESIGN.md and SPEC_FULL.md §9.

use crate::index_mode::{resolve, IndexMode};
use crate::layout::{element_count, shape_to_strides};
use crate::order::Order;

fn decompose_logical(mut idx: i64, shape: &[i64], order: Order) -> Vec<i64> {
    let n = shape.len();
    let mut sub = vec![0i64; n];
    match order {
        Order::RowMajor => {
            for i in (0..n).rev() {
                let s = shape[i].max(1);
                sub[i] = idx % s;
                idx /= s;
            }
        }
        Order::ColumnMajor => {
            for i in 0..n {
                let s = shape[i].max(1);
                sub[i] = idx % s;
                idx /= s;
            }
        }
    }
    sub
}

/// Flip axes with a negative stride so a "natural" (always-ascending)
/// decomposition lands on the coordinate the reversed axis actually
/// occupies in the buffer.
fn correct_for_sign(natural: &[i64], shape: &[i64], strides: &[i64]) -> Vec<i64> {
    natural
        .iter()
        .zip(shape.iter())
        .zip(strides.iter())
        .map(|((&s, &sh), &st)| if st < 0 { sh - 1 - s } else { s })
        .collect()
}

fn dot(strides: &[i64], sub: &[i64]) -> i64 {
    strides.iter().zip(sub.iter()).map(|(&a, &b)| a * b).sum()
}

/// Subscripts to buffer byte offset.
///
/// `submodes` is recycled by modulo when shorter than `shape`.
pub fn sub2bind(
    sub: &[i64],
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    submodes: &[IndexMode],
) -> Option<i64> {
    if submodes.is_empty() {
        return None;
    }
    let mut bind = offset;
    for (i, (&s, &st)) in sub.iter().zip(strides.iter()).enumerate() {
        let max = shape[i] - 1;
        let mode = submodes[i % submodes.len()];
        let resolved = resolve(s, max, mode)?;
        bind += st * resolved;
    }
    Some(bind)
}

/// View linear index to subscripts.
///
/// When `offset == 0`, `idx` is treated as a logical view index and
/// decomposed directly. Otherwise `idx` is treated as a buffer linear
/// index and the natural decomposition is corrected for any
/// negative-stride (reversed) axis. This asymmetry is intentional, not
/// a bug: see SPEC_FULL.md §9.
pub fn ind2sub(
    idx: i64,
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    order: Order,
    mode: IndexMode,
) -> Option<Vec<i64>> {
    let length = element_count(shape);
    let idx = resolve(idx, length - 1, mode)?;
    let natural = decompose_logical(idx, shape, order);
    if offset == 0 {
        Some(natural)
    } else {
        Some(correct_for_sign(&natural, shape, strides))
    }
}

/// View linear index to buffer byte offset.
///
/// Always decomposes `idx` as if it were a logical view index
/// (`offset` only enters as the additive base of the result), which is
/// the canonical way to iterate a view in its own logical order
/// regardless of how the underlying buffer is laid out.
pub fn vind2bind(
    idx: i64,
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    order: Order,
    mode: IndexMode,
) -> Option<i64> {
    let length = element_count(shape);
    let idx = resolve(idx, length - 1, mode)?;
    let sub = decompose_logical(idx, shape, order);
    Some(offset + dot(strides, &sub))
}

/// Buffer linear index (in elements) to view linear index.
///
/// Inverse of [`vind2bind`] for the whole-buffer-index case: decomposes
/// `idx` naturally by shape, then corrects for any negative-stride axis
/// before re-combining with natural (not actual) strides to produce the
/// view index.
pub fn bind2vind(
    idx: i64,
    shape: &[i64],
    strides: &[i64],
    order: Order,
    mode: IndexMode,
) -> Option<i64> {
    let length = element_count(shape);
    let idx = resolve(idx, length - 1, mode)?;
    let natural = decompose_logical(idx, shape, order);
    let sub = correct_for_sign(&natural, shape, strides);
    let nat_strides = shape_to_strides(shape, order);
    Some(dot(&nat_strides, &sub))
}
