//! Pure layout-analysis functions over (shape, strides, offset, dtype).
//!
//! Everything here is a pure function: no descriptor, no buffer, just
//! the numbers that describe a view's geometry. `descriptor::NdArray`
//! calls these once at construction time to populate its cached flags.

use crate::order::Order;

/// Number of elements described by `shape`, per the standalone `numel`
/// operation: `0` if `shape` is empty (zero-rank) or any axis is
/// negative; otherwise the product, with a `0` axis collapsing the
/// whole product to `0`.
///
/// This is distinct from the element count a descriptor actually
/// addresses — see [`element_count`] for the 1-for-zero-rank
/// convention `descriptor::NdArray::length` and the coordinate
/// translators use instead.
pub fn numel(shape: &[i64]) -> i64 {
    if shape.is_empty() {
        return 0;
    }
    shape.iter().fold(1i64, |acc, &s| {
        if s <= 0 {
            0
        } else {
            acc.saturating_mul(s)
        }
    })
}

/// Total element count addressed by a view of this `shape`: a
/// zero-rank shape has exactly one element, unlike [`numel`] above.
/// Used internally wherever code needs to iterate or bound-check an
/// actual view rather than evaluate the standalone `numel` operation.
pub fn element_count(shape: &[i64]) -> i64 {
    if shape.is_empty() {
        1
    } else {
        numel(shape)
    }
}

/// Classification of a stride vector's iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    /// All strides are non-negative.
    Positive,
    /// All strides are negative.
    Negative,
    /// A mix of positive, negative, and/or zero strides.
    Mixed,
}

/// `+1`/`-1`/`0`-style classification of a stride vector, expressed as
/// an enum rather than a sentinel integer.
pub fn iteration_order(strides: &[i64]) -> Iteration {
    if strides.is_empty() {
        return Iteration::Positive;
    }
    let all_nonneg = strides.iter().all(|&s| s >= 0);
    let all_neg = strides.iter().all(|&s| s < 0);
    if all_nonneg {
        Iteration::Positive
    } else if all_neg {
        Iteration::Negative
    } else {
        Iteration::Mixed
    }
}

/// True iff `|strides|` is weakly non-increasing (row-major stride
/// monotonicity: last axis varies fastest).
pub fn is_row_major(strides: &[i64]) -> bool {
    strides.windows(2).all(|w| w[0].abs() >= w[1].abs())
}

/// True iff `|strides|` is weakly non-decreasing (column-major stride
/// monotonicity: first axis varies fastest).
pub fn is_column_major(strides: &[i64]) -> bool {
    strides.windows(2).all(|w| w[0].abs() <= w[1].abs())
}

/// Classification of which orders a stride vector is compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrideOrder {
    Neither,
    RowMajor,
    ColumnMajor,
    /// Rank <= 1: trivially both.
    Both,
}

pub fn strides_to_order(strides: &[i64]) -> StrideOrder {
    if strides.len() <= 1 {
        return StrideOrder::Both;
    }
    let row = is_row_major(strides);
    let col = is_column_major(strides);
    match (row, col) {
        (true, true) => StrideOrder::Both,
        (true, false) => StrideOrder::RowMajor,
        (false, true) => StrideOrder::ColumnMajor,
        (false, false) => StrideOrder::Neither,
    }
}

/// Natural *element* strides for `shape` under `order` (innermost axis
/// stride is `1`). Callers scale by `dtype.width()` for byte strides.
pub fn shape_to_strides(shape: &[i64], order: Order) -> Vec<i64> {
    let n = shape.len();
    let mut strides = vec![0i64; n];
    match order {
        Order::RowMajor => {
            let mut acc = 1i64;
            for i in (0..n).rev() {
                strides[i] = acc;
                acc *= shape[i].max(0);
            }
        }
        Order::ColumnMajor => {
            let mut acc = 1i64;
            for i in 0..n {
                strides[i] = acc;
                acc *= shape[i].max(0);
            }
        }
    }
    strides
}

/// Byte offset of the first indexed element such that the view spans
/// every element addressable by `strides` without going negative: for
/// each axis with a negative stride, the start is pushed forward by
/// `|stride| * (shape[axis]-1)`.
pub fn strides_to_offset(shape: &[i64], strides: &[i64]) -> i64 {
    shape
        .iter()
        .zip(strides.iter())
        .filter(|(_, &st)| st < 0)
        .map(|(&sh, &st)| -st * (sh - 1).max(0))
        .sum()
}

/// Inclusive `(min, max)` byte offsets reachable by any legal
/// subscript of a view with the given shape/strides/offset.
pub fn minmax_view_buffer_index(
    shape: &[i64],
    strides: &[i64],
    offset: i64,
) -> (i64, i64) {
    if shape.iter().any(|&s| s == 0) {
        return (offset, offset);
    }
    let mut min = offset;
    let mut max = offset;
    for (&sh, &st) in shape.iter().zip(strides.iter()) {
        let reach = st * (sh - 1);
        if reach < 0 {
            min += reach;
        } else {
            max += reach;
        }
    }
    (min, max)
}

/// The upper half of [`minmax_view_buffer_index`], kept as a cheaper
/// standalone query (the original ships both a combined routine and a
/// max-only routine; a caller that only needs an upper buffer-length
/// bound has no reason to pay for the minimum too).
pub fn max_view_buffer_index(shape: &[i64], strides: &[i64], offset: i64) -> i64 {
    if shape.iter().any(|&s| s == 0) {
        return offset;
    }
    offset
        + shape
            .iter()
            .zip(strides.iter())
            .map(|(&sh, &st)| (st * (sh - 1)).max(0))
            .sum::<i64>()
}

/// True iff every indexed element lies within one contiguous byte
/// range of length `element_count(shape) * width`.
pub fn is_single_segment(
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    width: usize,
) -> bool {
    let length = element_count(shape);
    if length <= 0 {
        return false;
    }
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    length * width as i64 == (max - min) + width as i64
}

pub fn is_contiguous(shape: &[i64], strides: &[i64], offset: i64, width: usize) -> bool {
    iteration_order(strides) != Iteration::Mixed
        && is_single_segment(shape, strides, offset, width)
}

pub fn is_row_major_contiguous(
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    width: usize,
) -> bool {
    is_contiguous(shape, strides, offset, width) && is_row_major(strides)
}

pub fn is_column_major_contiguous(
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    width: usize,
) -> bool {
    is_contiguous(shape, strides, offset, width) && is_column_major(strides)
}

/// True iff a buffer of `len` elements can back every byte offset this
/// view can reach.
pub fn buffer_length_compatible(
    shape: &[i64],
    strides: &[i64],
    offset: i64,
    len: i64,
    width: usize,
) -> bool {
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    let w = width as i64;
    if w == 0 {
        return true;
    }
    min >= 0 && max / w < len
}

/// True iff `len` strictly exceeds the element count implied by
/// `shape`.
///
/// Note the strict inequality: a buffer of exactly `numel(shape)`
/// elements is *not* considered compatible by this predicate. This
/// mirrors the original implementation's literal behavior; see
/// DESIGN.md and SPEC_FULL.md §9 for why it is kept rather than
/// "fixed".
pub fn buffer_length_compatible_shape(len: i64, shape: &[i64]) -> bool {
    len > numel(shape)
}

pub fn nonsingleton_dimensions(shape: &[i64]) -> usize {
    shape.iter().filter(|&&s| s != 1).count()
}

pub fn singleton_dimensions(shape: &[i64]) -> usize {
    shape.iter().filter(|&&s| s == 1).count()
}
