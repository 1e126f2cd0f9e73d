//! The ndarray descriptor: dtype, shape/strides/offset, index modes,
//! and cached layout flags.
//!
//! The descriptor deliberately has **no buffer field**. Carrying `&[u8]`
//! or `&mut [u8]` inside a long-lived, shared descriptor would force
//! every accessor call to fight the borrow checker over read vs. write
//! access to the same bytes, and this crate forbids `unsafe_code`, so
//! there is no raw pointer to reach for instead. Every accessor and the
//! kernel dispatcher therefore take the backing buffer as an explicit
//! argument alongside the descriptor. See DESIGN.md.

use std::cell::Cell;

use anyhow::{ensure, Result};

use crate::dtype::{width_checked, Dtype};
use crate::index_mode::IndexMode;
use crate::layout::{
    element_count, is_column_major_contiguous, is_row_major_contiguous,
};
use crate::order::Order;

/// Cached layout bit: view is addressable as one ascending row-major run.
pub const ROW_MAJOR_CONTIGUOUS: u8 = 0x1;
/// Cached layout bit: view is addressable as one ascending column-major run.
pub const COL_MAJOR_CONTIGUOUS: u8 = 0x2;

/// A strided view descriptor over an externally-owned byte buffer.
///
/// `shape`, `strides`, and `submodes` are borrows tied to the caller's
/// own arrays; the descriptor never copies or owns them.
#[derive(Debug)]
pub struct NdArray<'a> {
    dtype: Dtype,
    ndims: usize,
    shape: &'a [i64],
    strides: &'a [i64],
    offset: i64,
    order: Order,
    imode: IndexMode,
    submodes: &'a [IndexMode],
    length: i64,
    byte_length: i64,
    flags: Cell<u8>,
}

impl<'a> NdArray<'a> {
    /// Construct a descriptor, validating shape/strides agree in rank
    /// and computing the cached derived fields once. Rejects
    /// `Dtype::Generic`, which has no representable scalar width to
    /// size a buffer against.
    pub fn new(
        dtype: Dtype,
        shape: &'a [i64],
        strides: &'a [i64],
        offset: i64,
        order: Order,
        imode: IndexMode,
        submodes: &'a [IndexMode],
    ) -> Result<Self> {
        ensure!(
            shape.len() == strides.len(),
            "shape has {} axes but strides has {}",
            shape.len(),
            strides.len()
        );
        ensure!(!submodes.is_empty(), "submodes must not be empty");
        let ndims = shape.len();
        let length = element_count(shape);
        let width = width_checked(dtype)?;
        let byte_length = length * width as i64;

        let mut flags = 0u8;
        if is_row_major_contiguous(shape, strides, offset, width) {
            flags |= ROW_MAJOR_CONTIGUOUS;
        }
        if is_column_major_contiguous(shape, strides, offset, width) {
            flags |= COL_MAJOR_CONTIGUOUS;
        }

        Ok(Self {
            dtype,
            ndims,
            shape,
            strides,
            offset,
            order,
            imode,
            submodes,
            length,
            byte_length,
            flags: Cell::new(flags),
        })
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn ndims(&self) -> usize {
        self.ndims
    }

    pub fn shape(&self) -> &'a [i64] {
        self.shape
    }

    pub fn strides(&self) -> &'a [i64] {
        self.strides
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn imode(&self) -> IndexMode {
        self.imode
    }

    pub fn submodes(&self) -> &'a [IndexMode] {
        self.submodes
    }

    /// Total element count. Never changes after construction.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn byte_length(&self) -> i64 {
        self.byte_length
    }

    pub fn flags(&self) -> u8 {
        self.flags.get()
    }

    pub fn is_row_major_contiguous(&self) -> bool {
        self.flags.get() & ROW_MAJOR_CONTIGUOUS != 0
    }

    pub fn is_column_major_contiguous(&self) -> bool {
        self.flags.get() & COL_MAJOR_CONTIGUOUS != 0
    }

    /// Force a flag bit on, bypassing the derivation that ran at
    /// construction time. The cache is interior-mutable so this does
    /// not require an exclusive borrow of an otherwise-shared,
    /// otherwise read-only descriptor.
    pub fn enable_flag(&self, flag: u8) {
        self.flags.set(self.flags.get() | flag);
    }

    pub fn disable_flag(&self, flag: u8) {
        self.flags.set(self.flags.get() & !flag);
    }
}
