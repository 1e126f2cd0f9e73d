//! Typed element access over an explicit byte buffer.
//!
//! Every accessor here takes the backing buffer as an explicit
//! parameter — see `descriptor` for why the `NdArray` type itself
//! carries none. Reinterpreting a byte range as a scalar goes through
//! the [`Element`] trait and fixed-size byte copies, never `unsafe`
//! transmutation, to satisfy this crate's blanket
//! `#![forbid(unsafe_code)]`.

use anyhow::{anyhow, ensure, Result};

use crate::descriptor::NdArray;
use crate::dtype::Dtype;
use crate::layout::Iteration;
use crate::translate::{sub2bind, vind2bind};

/// A fixed-width value that can be read from / written to a raw byte
/// range. Implemented per concrete scalar type rather than dispatched
/// through one fan-out function per (dtype, addressing-mode) pair.
pub trait Element: Sized + Copy {
    const WIDTH: usize;
    fn from_bytes(bytes: &[u8]) -> Self;
    fn write_bytes(&self, bytes: &mut [u8]);
}

macro_rules! impl_element_native {
    ($ty:ty, $width:expr) => {
        impl Element for $ty {
            const WIDTH: usize = $width;
            fn from_bytes(bytes: &[u8]) -> Self {
                <$ty>::from_ne_bytes(bytes[..$width].try_into().unwrap())
            }
            fn write_bytes(&self, bytes: &mut [u8]) {
                bytes[..$width].copy_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_element_native!(i8, 1);
impl_element_native!(u8, 1);
impl_element_native!(i16, 2);
impl_element_native!(u16, 2);
impl_element_native!(i32, 4);
impl_element_native!(u32, 4);
impl_element_native!(i64, 8);
impl_element_native!(u64, 8);
impl_element_native!(i128, 16);
impl_element_native!(u128, 16);
impl_element_native!(f32, 4);
impl_element_native!(f64, 8);

impl Element for bool {
    const WIDTH: usize = 1;
    fn from_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
    fn write_bytes(&self, bytes: &mut [u8]) {
        bytes[0] = u8::from(*self);
    }
}

/// `uint8c`: storage-identical to `u8`; only its *casting* behavior
/// (clamped rather than wrapping, handled entirely upstream in
/// `dtype::same_kind_cast`) distinguishes it. No arithmetic is
/// implemented here — out of scope, see SPEC_FULL.md §1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint8Clamped(pub u8);

impl Element for Uint8Clamped {
    const WIDTH: usize = 1;
    fn from_bytes(bytes: &[u8]) -> Self {
        Uint8Clamped(bytes[0])
    }
    fn write_bytes(&self, bytes: &mut [u8]) {
        bytes[0] = self.0;
    }
}

/// Opaque fixed-size storage for dtypes with no native Rust scalar
/// (`float16`, `bfloat16`, `float128`, `int256`, `uint256`). The
/// runtime can copy these but performs no arithmetic on them, same
/// contract as the complex types below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> Element for RawBytes<N> {
    const WIDTH: usize = N;
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&bytes[..N]);
        RawBytes(buf)
    }
    fn write_bytes(&self, bytes: &mut [u8]) {
        bytes[..N].copy_from_slice(&self.0);
    }
}

/// A complex value stored as two consecutive real components, real
/// first. No arithmetic is implemented; complex values are an opaque
/// payload as far as this crate is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexF32 {
    pub re: f32,
    pub im: f32,
}

impl Element for ComplexF32 {
    const WIDTH: usize = 8;
    fn from_bytes(bytes: &[u8]) -> Self {
        ComplexF32 {
            re: f32::from_bytes(&bytes[0..4]),
            im: f32::from_bytes(&bytes[4..8]),
        }
    }
    fn write_bytes(&self, bytes: &mut [u8]) {
        self.re.write_bytes(&mut bytes[0..4]);
        self.im.write_bytes(&mut bytes[4..8]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexF64 {
    pub re: f64,
    pub im: f64,
}

impl Element for ComplexF64 {
    const WIDTH: usize = 16;
    fn from_bytes(bytes: &[u8]) -> Self {
        ComplexF64 {
            re: f64::from_bytes(&bytes[0..8]),
            im: f64::from_bytes(&bytes[8..16]),
        }
    }
    fn write_bytes(&self, bytes: &mut [u8]) {
        self.re.write_bytes(&mut bytes[0..8]);
        self.im.write_bytes(&mut bytes[8..16]);
    }
}

/// A dtype-tagged runtime value, for callers that only know the dtype
/// at runtime and must route through a single entry point instead of
/// calling a typed accessor directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int8(i8),
    Uint8(u8),
    Uint8c(Uint8Clamped),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Int128(i128),
    Uint128(u128),
    Int256(RawBytes<32>),
    Uint256(RawBytes<32>),
    Float16(RawBytes<2>),
    Bfloat16(RawBytes<2>),
    Float32(f32),
    Float64(f64),
    Float128(RawBytes<16>),
    Complex64(ComplexF32),
    Complex128(ComplexF64),
    Binary(u8),
}

fn bounds_check(buf: &[u8], byte_offset: i64, width: usize) -> Result<usize> {
    ensure!(byte_offset >= 0, "negative byte offset {byte_offset}");
    let start = byte_offset as usize;
    ensure!(
        start + width <= buf.len(),
        "byte range [{start}, {}) out of bounds for buffer of length {}",
        start + width,
        buf.len()
    );
    Ok(start)
}

/// Read a `T` directly at `byte_offset`. Performs no dtype check
/// against `T` — the descriptor's dtype is authoritative; calling this
/// for the wrong dtype is a caller logic error, not a detected one. See
/// SPEC_FULL.md §4.6.
pub fn get_raw<T: Element>(buf: &[u8], byte_offset: i64) -> Result<T> {
    let start = bounds_check(buf, byte_offset, T::WIDTH)?;
    Ok(T::from_bytes(&buf[start..start + T::WIDTH]))
}

pub fn set_raw<T: Element>(buf: &mut [u8], byte_offset: i64, value: T) -> Result<()> {
    let start = bounds_check(buf, byte_offset, T::WIDTH)?;
    value.write_bytes(&mut buf[start..start + T::WIDTH]);
    Ok(())
}

/// Read a `T` addressed by subscript vector.
pub fn get_by_subscript<T: Element>(
    arr: &NdArray<'_>,
    buf: &[u8],
    sub: &[i64],
) -> Result<T> {
    let bind = sub2bind(sub, arr.shape(), arr.strides(), arr.offset(), arr.submodes())
        .ok_or_else(|| anyhow!("subscript {:?} out of range", sub))?;
    get_raw(buf, bind)
}

pub fn set_by_subscript<T: Element>(
    arr: &NdArray<'_>,
    buf: &mut [u8],
    sub: &[i64],
    value: T,
) -> Result<()> {
    let bind = sub2bind(sub, arr.shape(), arr.strides(), arr.offset(), arr.submodes())
        .ok_or_else(|| anyhow!("subscript {:?} out of range", sub))?;
    set_raw(buf, bind, value)
}

/// View-linear-index to byte offset, taking the contiguous fast path
/// when the descriptor's cached flags and iteration order allow it
/// (see SPEC_FULL.md §4.4.3).
fn view_index_to_bind(arr: &NdArray<'_>, idx: i64, width: usize) -> Option<i64> {
    let contiguous = arr.is_row_major_contiguous() || arr.is_column_major_contiguous();
    if contiguous {
        match crate::layout::iteration_order(arr.strides()) {
            Iteration::Positive => {
                return Some(arr.offset() + idx * width as i64)
            }
            Iteration::Negative => {
                return Some(arr.offset() - idx * width as i64)
            }
            Iteration::Mixed => {}
        }
    }
    vind2bind(idx, arr.shape(), arr.strides(), arr.offset(), arr.order(), arr.imode())
}

pub fn get_by_view_index<T: Element>(arr: &NdArray<'_>, buf: &[u8], idx: i64) -> Result<T> {
    let bind = view_index_to_bind(arr, idx, T::WIDTH)
        .ok_or_else(|| anyhow!("view index {idx} out of range"))?;
    get_raw(buf, bind)
}

pub fn set_by_view_index<T: Element>(
    arr: &NdArray<'_>,
    buf: &mut [u8],
    idx: i64,
    value: T,
) -> Result<()> {
    let bind = view_index_to_bind(arr, idx, T::WIDTH)
        .ok_or_else(|| anyhow!("view index {idx} out of range"))?;
    set_raw(buf, bind, value)
}

/// Dtype-dispatching read: routes to the typed accessor matching
/// `arr.dtype()`.
pub fn get_scalar_by_subscript(arr: &NdArray<'_>, buf: &[u8], sub: &[i64]) -> Result<Scalar> {
    macro_rules! read {
        ($variant:ident, $ty:ty) => {
            Scalar::$variant(get_by_subscript::<$ty>(arr, buf, sub)?)
        };
    }
    Ok(match arr.dtype() {
        Dtype::Bool => read!(Bool, bool),
        Dtype::Int8 => read!(Int8, i8),
        Dtype::Uint8 => read!(Uint8, u8),
        Dtype::Uint8c => read!(Uint8c, Uint8Clamped),
        Dtype::Int16 => read!(Int16, i16),
        Dtype::Uint16 => read!(Uint16, u16),
        Dtype::Int32 => read!(Int32, i32),
        Dtype::Uint32 => read!(Uint32, u32),
        Dtype::Int64 => read!(Int64, i64),
        Dtype::Uint64 => read!(Uint64, u64),
        Dtype::Int128 => read!(Int128, i128),
        Dtype::Uint128 => read!(Uint128, u128),
        Dtype::Int256 => read!(Int256, RawBytes<32>),
        Dtype::Uint256 => read!(Uint256, RawBytes<32>),
        Dtype::Float16 => read!(Float16, RawBytes<2>),
        Dtype::Bfloat16 => read!(Bfloat16, RawBytes<2>),
        Dtype::Float32 => read!(Float32, f32),
        Dtype::Float64 => read!(Float64, f64),
        Dtype::Float128 => read!(Float128, RawBytes<16>),
        Dtype::Complex64 => read!(Complex64, ComplexF32),
        Dtype::Complex128 => read!(Complex128, ComplexF64),
        Dtype::Binary => read!(Binary, u8),
        Dtype::Generic => {
            return Err(anyhow!("generic dtype has no representable scalar"))
        }
    })
}

/// Dtype-dispatching read addressed by view linear index.
pub fn get_scalar_by_view_index(arr: &NdArray<'_>, buf: &[u8], idx: i64) -> Result<Scalar> {
    macro_rules! read {
        ($variant:ident, $ty:ty) => {
            Scalar::$variant(get_by_view_index::<$ty>(arr, buf, idx)?)
        };
    }
    Ok(match arr.dtype() {
        Dtype::Bool => read!(Bool, bool),
        Dtype::Int8 => read!(Int8, i8),
        Dtype::Uint8 => read!(Uint8, u8),
        Dtype::Uint8c => read!(Uint8c, Uint8Clamped),
        Dtype::Int16 => read!(Int16, i16),
        Dtype::Uint16 => read!(Uint16, u16),
        Dtype::Int32 => read!(Int32, i32),
        Dtype::Uint32 => read!(Uint32, u32),
        Dtype::Int64 => read!(Int64, i64),
        Dtype::Uint64 => read!(Uint64, u64),
        Dtype::Int128 => read!(Int128, i128),
        Dtype::Uint128 => read!(Uint128, u128),
        Dtype::Int256 => read!(Int256, RawBytes<32>),
        Dtype::Uint256 => read!(Uint256, RawBytes<32>),
        Dtype::Float16 => read!(Float16, RawBytes<2>),
        Dtype::Bfloat16 => read!(Bfloat16, RawBytes<2>),
        Dtype::Float32 => read!(Float32, f32),
        Dtype::Float64 => read!(Float64, f64),
        Dtype::Float128 => read!(Float128, RawBytes<16>),
        Dtype::Complex64 => read!(Complex64, ComplexF32),
        Dtype::Complex128 => read!(Complex128, ComplexF64),
        Dtype::Binary => read!(Binary, u8),
        Dtype::Generic => {
            return Err(anyhow!("generic dtype has no representable scalar"))
        }
    })
}

pub fn set_scalar_by_view_index(
    arr: &NdArray<'_>,
    buf: &mut [u8],
    idx: i64,
    value: Scalar,
) -> Result<()> {
    macro_rules! write {
        ($variant:ident, $val:expr) => {
            match $val {
                Scalar::$variant(v) => set_by_view_index(arr, buf, idx, v),
                _ => Err(anyhow!(
                    "scalar variant does not match descriptor dtype {:?}",
                    arr.dtype()
                )),
            }
        };
    }
    match arr.dtype() {
        Dtype::Bool => write!(Bool, value),
        Dtype::Int8 => write!(Int8, value),
        Dtype::Uint8 => write!(Uint8, value),
        Dtype::Uint8c => write!(Uint8c, value),
        Dtype::Int16 => write!(Int16, value),
        Dtype::Uint16 => write!(Uint16, value),
        Dtype::Int32 => write!(Int32, value),
        Dtype::Uint32 => write!(Uint32, value),
        Dtype::Int64 => write!(Int64, value),
        Dtype::Uint64 => write!(Uint64, value),
        Dtype::Int128 => write!(Int128, value),
        Dtype::Uint128 => write!(Uint128, value),
        Dtype::Int256 => write!(Int256, value),
        Dtype::Uint256 => write!(Uint256, value),
        Dtype::Float16 => write!(Float16, value),
        Dtype::Bfloat16 => write!(Bfloat16, value),
        Dtype::Float32 => write!(Float32, value),
        Dtype::Float64 => write!(Float64, value),
        Dtype::Float128 => write!(Float128, value),
        Dtype::Complex64 => write!(Complex64, value),
        Dtype::Complex128 => write!(Complex128, value),
        Dtype::Binary => write!(Binary, value),
        Dtype::Generic => Err(anyhow!("generic dtype has no representable scalar")),
    }
}

pub fn set_scalar_by_subscript(
    arr: &NdArray<'_>,
    buf: &mut [u8],
    sub: &[i64],
    value: Scalar,
) -> Result<()> {
    macro_rules! write {
        ($variant:ident, $val:expr) => {
            match $val {
                Scalar::$variant(v) => set_by_subscript(arr, buf, sub, v),
                _ => Err(anyhow!(
                    "scalar variant does not match descriptor dtype {:?}",
                    arr.dtype()
                )),
            }
        };
    }
    match arr.dtype() {
        Dtype::Bool => write!(Bool, value),
        Dtype::Int8 => write!(Int8, value),
        Dtype::Uint8 => write!(Uint8, value),
        Dtype::Uint8c => write!(Uint8c, value),
        Dtype::Int16 => write!(Int16, value),
        Dtype::Uint16 => write!(Uint16, value),
        Dtype::Int32 => write!(Int32, value),
        Dtype::Uint32 => write!(Uint32, value),
        Dtype::Int64 => write!(Int64, value),
        Dtype::Uint64 => write!(Uint64, value),
        Dtype::Int128 => write!(Int128, value),
        Dtype::Uint128 => write!(Uint128, value),
        Dtype::Int256 => write!(Int256, value),
        Dtype::Uint256 => write!(Uint256, value),
        Dtype::Float16 => write!(Float16, value),
        Dtype::Bfloat16 => write!(Bfloat16, value),
        Dtype::Float32 => write!(Float32, value),
        Dtype::Float64 => write!(Float64, value),
        Dtype::Float128 => write!(Float128, value),
        Dtype::Complex64 => write!(Complex64, value),
        Dtype::Complex128 => write!(Complex128, value),
        Dtype::Binary => write!(Binary, value),
        Dtype::Generic => Err(anyhow!("generic dtype has no representable scalar")),
    }
}
