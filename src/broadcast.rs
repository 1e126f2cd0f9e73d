//! NumPy-style shape broadcasting.

use anyhow::{ensure, Result};

/// Reconcile `shapes` into a single broadcast output shape.
///
/// Shapes are right-aligned; for each output axis (right to left), two
/// extents are compatible iff equal or one of them is `1`. Zero inputs
/// produce an empty shape; one input produces itself.
pub fn broadcast_shapes(shapes: &[&[i64]]) -> Result<Vec<i64>> {
    let rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1i64; rank];
    for axis in 0..rank {
        for shape in shapes {
            let len = shape.len();
            if axis >= len {
                continue;
            }
            let extent = shape[len - 1 - axis];
            let slot = &mut out[rank - 1 - axis];
            if *slot == 1 {
                *slot = extent;
            } else {
                ensure!(
                    extent == 1 || extent == *slot,
                    "incompatible shapes for broadcasting: axis extent {} is not compatible with {}",
                    extent,
                    *slot
                );
            }
        }
    }
    Ok(out)
}
