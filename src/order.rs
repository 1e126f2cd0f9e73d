//! Traversal order for whole-view operations.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Element traversal order. Only affects which axis varies fastest;
/// random access is order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Order {
    RowMajor = 1,
    ColumnMajor = 2,
}
