//! Index normalization modes shared by every coordinate translator.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// How an out-of-range integer index is resolved against an inclusive
/// upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum IndexMode {
    Error = 1,
    Clamp = 2,
    Wrap = 3,
}

/// Saturate `idx` into `[0, max]`.
pub fn clamp(idx: i64, max: i64) -> i64 {
    if idx < 0 {
        0
    } else if idx > max {
        max
    } else {
        idx
    }
}

/// Euclidean-style wrap of `idx` into `[0, max]`.
///
/// Uses truncation-toward-zero division plus an explicit correction
/// step rather than relying on the sign convention of a native modulo
/// operator, mirroring the original implementation's structure.
pub fn wrap(idx: i64, max: i64) -> i64 {
    let m = max + 1;
    let mut r = idx % m;
    if r < 0 {
        r += m;
    }
    r
}

/// Resolve `idx` against `[0, max]` under `mode`.
///
/// Returns `None` in place of the original's `-1` sentinel when `mode`
/// is `Error` and `idx` is out of range.
pub fn resolve(idx: i64, max: i64, mode: IndexMode) -> Option<i64> {
    match mode {
        IndexMode::Error => {
            if idx < 0 || idx > max {
                None
            } else {
                Some(idx)
            }
        }
        IndexMode::Clamp => Some(clamp(idx, max)),
        IndexMode::Wrap => Some(wrap(idx, max)),
    }
}
