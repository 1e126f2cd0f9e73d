//! Element data types, widths, and cast admissibility tables.

use anyhow::{anyhow, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Enumeration of underlying ndarray element data types.
///
/// Discriminant order mirrors the original C enumeration (boolean, then
/// integers narrow to wide, then floats, then complex, then the two
/// untyped kinds), extended with the wider integer/float widths this
/// port carries that the original ecosystem's generated cast table
/// never had to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Dtype {
    Bool = 0,
    Int8,
    Uint8,
    Uint8c,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    Int256,
    Uint256,
    Float16,
    Bfloat16,
    Float32,
    Float64,
    Float128,
    Complex64,
    Complex128,
    Binary,
    Generic,
}

/// An equivalence class of dtypes used by the same-kind-cast rule.
///
/// `ClampedUnsignedInt` (`uint8c`) is its own kind, distinct from
/// `UnsignedInt` — `uint8 <-> uint8c` is mutually safe via the
/// width-ordered unsigned *family* `safe_cast` checks, not because the
/// two share a `Kind` (see §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    SignedInt,
    UnsignedInt,
    ClampedUnsignedInt,
    Float,
    Complex,
    Binary,
    Generic,
}

impl Dtype {
    /// Byte width of one element. `0` for `Generic`, which has no
    /// representable scalar.
    pub fn width(self) -> usize {
        use Dtype::*;
        match self {
            Bool | Int8 | Uint8 | Uint8c | Binary => 1,
            Int16 | Uint16 | Float16 | Bfloat16 => 2,
            Int32 | Uint32 | Float32 => 4,
            Int64 | Uint64 | Float64 | Complex64 => 8,
            Int128 | Uint128 | Float128 | Complex128 => 16,
            Int256 | Uint256 => 32,
            Generic => 0,
        }
    }

    /// Single-character dtype code used in kernel signatures.
    pub fn char_code(self) -> u8 {
        use Dtype::*;
        match self {
            Bool => b'x',
            Int8 => b's',
            Uint8 => b'b',
            Uint8c => b'a',
            Int16 => b'k',
            Uint16 => b't',
            Int32 => b'i',
            Uint32 => b'u',
            Int64 => b'l',
            Uint64 => b'v',
            Int128 => b'm',
            Uint128 => b'w',
            Int256 => b'n',
            Uint256 => b'y',
            Float16 => b'h',
            Bfloat16 => b'e',
            Float32 => b'f',
            Float64 => b'd',
            Float128 => b'g',
            Complex64 => b'c',
            Complex128 => b'z',
            Binary => b'r',
            Generic => b'o',
        }
    }

    pub fn kind(self) -> Kind {
        use Dtype::*;
        match self {
            Bool => Kind::Bool,
            Int8 | Int16 | Int32 | Int64 | Int128 | Int256 => Kind::SignedInt,
            Uint8 | Uint16 | Uint32 | Uint64 | Uint128 | Uint256 => Kind::UnsignedInt,
            Uint8c => Kind::ClampedUnsignedInt,
            Float16 | Bfloat16 | Float32 | Float64 | Float128 => Kind::Float,
            Complex64 | Complex128 => Kind::Complex,
            Binary => Kind::Binary,
            Generic => Kind::Generic,
        }
    }

    /// Bit width of the underlying storage (width * 8).
    fn bits(self) -> usize {
        self.width() * 8
    }

    /// Mantissa bits (including the implicit leading bit) of a float or
    /// complex dtype's real component. `None` for non-float kinds.
    fn mantissa_bits(self) -> Option<usize> {
        use Dtype::*;
        match self {
            Float16 => Some(11),
            Bfloat16 => Some(8),
            Float32 | Complex64 => Some(24),
            Float64 | Complex128 => Some(53),
            Float128 => Some(113),
            _ => None,
        }
    }
}

/// Every representable value of `from` is representable in `to` without
/// loss of information.
///
/// Generated by rule rather than listed literally (see DESIGN.md):
/// reflexivity is checked first, then boolean/binary/generic are closed
/// kinds, then integer/float/complex pairs are compared by width or
/// mantissa precision. `UnsignedInt` and `ClampedUnsignedInt` are
/// compared as one width-ordered family here even though they are
/// distinct `Kind`s (see §3.1 and [`Kind`]).
pub fn safe_cast(from: Dtype, to: Dtype) -> bool {
    if from == to {
        return true;
    }
    use Kind::*;
    let (fk, tk) = (from.kind(), to.kind());
    match (fk, tk) {
        (Bool, _) | (_, Bool) | (Binary, _) | (_, Binary) | (Generic, _)
        | (_, Generic) => false,
        (SignedInt, SignedInt) => to.bits() >= from.bits(),
        (UnsignedInt, UnsignedInt)
        | (UnsignedInt, ClampedUnsignedInt)
        | (ClampedUnsignedInt, UnsignedInt)
        | (ClampedUnsignedInt, ClampedUnsignedInt) => to.bits() >= from.bits(),
        (UnsignedInt, SignedInt) | (ClampedUnsignedInt, SignedInt) => {
            to.bits() > from.bits()
        }
        (SignedInt, UnsignedInt) | (SignedInt, ClampedUnsignedInt) => false,
        (SignedInt, Float)
        | (SignedInt, Complex)
        | (UnsignedInt, Float)
        | (UnsignedInt, Complex)
        | (ClampedUnsignedInt, Float)
        | (ClampedUnsignedInt, Complex) => {
            to.mantissa_bits().is_some_and(|m| m >= from.bits())
        }
        (Float, Float) | (Float, Complex) => to
            .mantissa_bits()
            .zip(from.mantissa_bits())
            .is_some_and(|(t, f)| t >= f),
        (Complex, Complex) => to.bits() >= from.bits(),
        (Float, SignedInt)
        | (Float, UnsignedInt)
        | (Float, ClampedUnsignedInt)
        | (Complex, SignedInt)
        | (Complex, UnsignedInt)
        | (Complex, ClampedUnsignedInt)
        | (Complex, Float) => false,
    }
}

/// Safe, or both dtypes belong to the same `Kind` — `Uint8c`'s own
/// `ClampedUnsignedInt` kind only coincides with another
/// `ClampedUnsignedInt` dtype here, not with `UnsignedInt`; the
/// `uint8 <-> uint8c` cast is covered by `safe_cast`'s family rule
/// above, not by this kind-equality fallback.
pub fn same_kind_cast(from: Dtype, to: Dtype) -> bool {
    if safe_cast(from, to) {
        return true;
    }
    from.kind() == to.kind()
}

/// Casting mode gating which `(from, to)` pairs a caller may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CastingMode {
    No = 0,
    Equiv = 1,
    Safe = 2,
    SameKind = 3,
    Unsafe = 4,
}

/// Whether casting `from` into `to` is permitted under `mode`.
pub fn allowed_cast(from: Dtype, to: Dtype, mode: CastingMode) -> bool {
    match mode {
        CastingMode::Unsafe => true,
        CastingMode::No | CastingMode::Equiv => from == to,
        CastingMode::Safe => safe_cast(from, to),
        CastingMode::SameKind => same_kind_cast(from, to),
    }
}

/// Width of a dtype, failing for dtypes with no representable scalar.
/// Called at descriptor construction (`descriptor::NdArray::new`) so a
/// `Generic`-dtype view is rejected up front rather than silently
/// sized as zero-width.
pub fn width_checked(dtype: Dtype) -> Result<usize> {
    match dtype {
        Dtype::Generic => {
            Err(anyhow!("dtype {:?} has no representable scalar width", dtype))
        }
        other => Ok(other.width()),
    }
}
