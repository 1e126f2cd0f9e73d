//! Cache-blocked generic kernel driver.

use anyhow::Result;

use crate::accessor::{get_scalar_by_view_index, set_scalar_by_view_index};
use crate::descriptor::NdArray;

use super::dispatch::ElementOp;

const NDARRAY_UNARY_BLOCK_SIZE_IN_BYTES: usize = 64;
const NDARRAY_UNARY_BLOCK_SIZE_IN_ELEMENTS: usize = 8;

/// `64 / max(dtype width)`, falling back to a fixed element count when
/// every participating dtype is width-0 (generic/binary).
fn block_size(widths: &[usize]) -> i64 {
    let max_width = widths.iter().copied().max().unwrap_or(0);
    if max_width == 0 {
        NDARRAY_UNARY_BLOCK_SIZE_IN_ELEMENTS as i64
    } else {
        (NDARRAY_UNARY_BLOCK_SIZE_IN_BYTES / max_width).max(1) as i64
    }
}

/// Same element-by-element traversal as [`super::generic_kernel`], but
/// visits the view index range in tiles sized to keep a working tile
/// resident in a small cache, intended for non-contiguous rank-2+
/// views where the plain driver's straight-line scan would thrash.
pub fn generic_blocked_kernel(
    input: &NdArray<'_>,
    input_buf: &[u8],
    output: &NdArray<'_>,
    output_buf: &mut [u8],
    fcn: ElementOp<'_>,
) -> Result<()> {
    let length = input.length();
    let b = block_size(&[input.dtype().width(), output.dtype().width()]);
    let mut tile_start = 0i64;
    while tile_start < length {
        let tile_end = (tile_start + b).min(length);
        for i in tile_start..tile_end {
            let value = get_scalar_by_view_index(input, input_buf, i)?;
            let result = fcn(value);
            set_scalar_by_view_index(output, output_buf, i, result)?;
        }
        tile_start = tile_end;
    }
    Ok(())
}
