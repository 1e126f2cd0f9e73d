//! The dispatch object and the generic plain kernel driver.

use anyhow::{ensure, Result};

use crate::accessor::{get_scalar_by_view_index, set_scalar_by_view_index, Scalar};
use crate::descriptor::NdArray;

/// Highest rank with a dedicated (non-generic-nd) table slot, matching
/// the original `ndarrayUnaryDispatchObject`'s 0d..10d function table.
pub const K: usize = 10;

/// The per-element operation a kernel applies. Exactly one input
/// operand, one output operand — out of scope for this crate (see
/// SPEC_FULL.md §1); injected by the caller.
pub type ElementOp<'f> = &'f dyn Fn(Scalar) -> Scalar;

/// Signature shared by every table slot.
pub type UnaryFn = fn(&NdArray<'_>, &[u8], &NdArray<'_>, &mut [u8], ElementOp<'_>) -> Result<()>;

/// Groups the plain and cache-blocked kernel tables, mirroring
/// `ndarrayUnaryDispatchObject`: `functions` holds ranks `0..=K` plus a
/// generic n-D fallback at index `K+1` (12 entries); `blocked_functions`
/// holds ranks `2..=K` (9 entries).
pub struct UnaryDispatchObject {
    pub functions: [UnaryFn; K + 2],
    pub blocked_functions: [UnaryFn; K - 1],
}

impl UnaryDispatchObject {
    /// Every slot populated with this crate's own generic drivers
    /// (see `kernel` module docs for why no per-rank specialization is
    /// needed).
    pub fn generic() -> Self {
        Self {
            functions: [crate::kernel::generic_kernel; K + 2],
            blocked_functions: [crate::kernel::generic_blocked_kernel; K - 1],
        }
    }
}

/// Select and invoke the appropriate kernel for `input`/`output`.
///
/// Fails only on rank mismatch; the selected kernel's own `Result`
/// propagates past that.
pub fn dispatch(
    obj: &UnaryDispatchObject,
    input: &NdArray<'_>,
    input_buf: &[u8],
    output: &NdArray<'_>,
    output_buf: &mut [u8],
    fcn: ElementOp<'_>,
) -> Result<()> {
    ensure!(
        input.ndims() == output.ndims(),
        "rank mismatch: input has {} dims, output has {}",
        input.ndims(),
        output.ndims()
    );
    let r = input.ndims();
    let f = if r == 0 {
        obj.functions[0]
    } else if r == 1 {
        obj.functions[1]
    } else if r <= K {
        let contiguous =
            input.is_row_major_contiguous() || input.is_column_major_contiguous();
        if contiguous {
            obj.functions[r]
        } else {
            obj.blocked_functions[r - 2]
        }
    } else {
        obj.functions[K + 1]
    };
    f(input, input_buf, output, output_buf, fcn)
}

/// Iterates `i in [0, length)` and for each `i` translates the view
/// index to a buffer offset for both operands via `vind2bind`
/// (short-circuited to direct arithmetic when contiguous), reading,
/// applying `fcn`, and writing back.
///
/// Visitation order for rank >= 2 is whatever the descriptor's natural
/// order implies; callers must not depend on it (see SPEC_FULL.md §5).
pub fn generic_kernel(
    input: &NdArray<'_>,
    input_buf: &[u8],
    output: &NdArray<'_>,
    output_buf: &mut [u8],
    fcn: ElementOp<'_>,
) -> Result<()> {
    let length = input.length();
    for i in 0..length {
        let value = get_scalar_by_view_index(input, input_buf, i)?;
        let result = fcn(value);
        set_scalar_by_view_index(output, output_buf, i, result)?;
    }
    Ok(())
}
