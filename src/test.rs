use rstest::rstest;

use crate::accessor::{get_by_subscript, set_by_subscript};
use crate::broadcast::broadcast_shapes;
use crate::descriptor::NdArray;
use crate::dtype::{allowed_cast, same_kind_cast, CastingMode, Dtype};
use crate::index_mode::{clamp, wrap, IndexMode};
use crate::layout::{
    buffer_length_compatible, buffer_length_compatible_shape, element_count,
    is_column_major_contiguous, is_row_major_contiguous, is_single_segment, numel,
};
use crate::order::Order;
use crate::translate::{bind2vind, ind2sub, sub2bind, vind2bind};

// S1 / S2 — broadcaster.

#[test]
fn broadcast_reconciles_singleton_axes() {
    let a: &[i64] = &[8, 1, 6, 1];
    let b: &[i64] = &[7, 1, 5];
    let out = broadcast_shapes(&[a, b]).unwrap();
    assert_eq!(out, vec![8, 7, 6, 5]);
}

#[test]
fn broadcast_rejects_incompatible_axes() {
    let a: &[i64] = &[3, 4];
    let b: &[i64] = &[4, 3];
    assert!(broadcast_shapes(&[a, b]).is_err());
}

#[rstest]
#[case(vec![vec![8, 1, 6, 1], vec![7, 1, 5]])]
#[case(vec![vec![7, 1, 5], vec![8, 1, 6, 1]])]
fn broadcast_is_order_independent(#[case] shapes: Vec<Vec<i64>>) {
    let refs: Vec<&[i64]> = shapes.iter().map(|s| s.as_slice()).collect();
    let out = broadcast_shapes(&refs).unwrap();
    assert_eq!(out, vec![8, 7, 6, 5]);
}

#[test]
fn broadcast_single_input_is_identity() {
    let a: &[i64] = &[3, 4, 5];
    assert_eq!(broadcast_shapes(&[a]).unwrap(), vec![3, 4, 5]);
}

#[test]
fn broadcast_empty_input_is_empty() {
    let shapes: &[&[i64]] = &[];
    assert_eq!(broadcast_shapes(shapes).unwrap(), Vec::<i64>::new());
}

// S3 / S4 / S5 — coordinate translators over a reversed first axis.

#[test]
fn bind2vind_reversed_axis() {
    let shape = [3, 3];
    let strides = [-3, 1];
    let got = bind2vind(7, &shape, &strides, Order::RowMajor, IndexMode::Error);
    assert_eq!(got, Some(1));
}

#[test]
fn vind2bind_reversed_axis() {
    let shape = [3, 3];
    let strides = [-3, 1];
    let offset = 6;
    let got = vind2bind(1, &shape, &strides, offset, Order::RowMajor, IndexMode::Error);
    assert_eq!(got, Some(7));
}

#[test]
fn ind2sub_nonzero_offset_reads_as_buffer_index() {
    let shape = [3, 3];
    let strides = [-3, 1];
    let offset = 6;
    let got = ind2sub(7, &shape, &strides, offset, Order::RowMajor, IndexMode::Error);
    assert_eq!(got, Some(vec![0, 1]));
}

#[test]
fn ind2sub_zero_offset_reads_as_view_index() {
    let shape = [3, 3];
    let strides = [3, 1];
    let got = ind2sub(7, &shape, &strides, 0, Order::RowMajor, IndexMode::Error);
    assert_eq!(got, Some(vec![2, 1]));
}

#[test]
fn sub2bind_round_trips_with_vind2bind() {
    let shape = [2, 3];
    let strides = [3, 1];
    let submodes = [IndexMode::Error];
    for r in 0..2 {
        for c in 0..3 {
            let bind =
                sub2bind(&[r, c], &shape, &strides, 0, &submodes).unwrap();
            let vind = bind2vind(bind, &shape, &strides, Order::RowMajor, IndexMode::Error)
                .unwrap();
            let back = vind2bind(vind, &shape, &strides, 0, Order::RowMajor, IndexMode::Error)
                .unwrap();
            assert_eq!(back, bind);
        }
    }
}

// S6 — contiguity classification.

#[test]
fn contiguity_classification_row_major() {
    let shape = [10, 10];
    let strides = [10, 1];
    assert!(is_row_major_contiguous(&shape, &strides, 0, 1));
    assert!(!is_column_major_contiguous(&shape, &strides, 0, 1));

    let arr = NdArray::new(
        Dtype::Uint8,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    assert_eq!(arr.flags(), 0x1);
}

// S7 — cast gate.

#[rstest]
#[case(Dtype::Int8, Dtype::Int32, CastingMode::Safe, true)]
#[case(Dtype::Float64, Dtype::Int32, CastingMode::Safe, false)]
#[case(Dtype::Float64, Dtype::Int32, CastingMode::SameKind, false)]
#[case(Dtype::Float64, Dtype::Int32, CastingMode::Unsafe, true)]
fn cast_gate_matches_contract(
    #[case] from: Dtype,
    #[case] to: Dtype,
    #[case] mode: CastingMode,
    #[case] expected: bool,
) {
    assert_eq!(allowed_cast(from, to, mode), expected);
}

#[rstest]
#[case(Dtype::Bool)]
#[case(Dtype::Int32)]
#[case(Dtype::Float64)]
#[case(Dtype::Complex128)]
fn casts_are_reflexive(#[case] dtype: Dtype) {
    for mode in [
        CastingMode::No,
        CastingMode::Equiv,
        CastingMode::Safe,
        CastingMode::SameKind,
        CastingMode::Unsafe,
    ] {
        assert!(allowed_cast(dtype, dtype, mode));
    }
}

// S8 — buffer-length compatibility.

#[test]
fn buffer_length_compatible_matches_contract() {
    let shape = [10, 10];
    let strides = [10, 1];
    assert!(buffer_length_compatible(&shape, &strides, 0, 1000, 1));
    assert!(!buffer_length_compatible(&shape, &strides, 0, 10, 1));
}

#[test]
fn buffer_length_compatible_shape_is_strict() {
    let shape = [4, 4];
    assert_eq!(numel(&shape), 16);
    assert!(!buffer_length_compatible_shape(16, &shape));
    assert!(buffer_length_compatible_shape(17, &shape));
}

// `numel` (the standalone, zero-for-zero-rank operation) vs.
// `element_count` (the descriptor's 1-for-zero-rank element count).

#[test]
fn numel_is_zero_for_zero_rank_but_element_count_is_one() {
    let shape: [i64; 0] = [];
    assert_eq!(numel(&shape), 0);
    assert_eq!(element_count(&shape), 1);
    assert!(buffer_length_compatible_shape(1, &shape));
    assert!(!buffer_length_compatible_shape(0, &shape));
}

#[test]
fn scalar_descriptor_has_length_one() {
    let shape: [i64; 0] = [];
    let strides: [i64; 0] = [];
    let arr = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    assert_eq!(arr.length(), 1);
    assert_eq!(arr.byte_length(), 4);
}

// S9 — index mode corner cases.

#[rstest]
#[case(13, 10, 2)]
#[case(-1, 10, 10)]
#[case(-12, 10, 10)]
fn wrap_matches_contract(#[case] idx: i64, #[case] max: i64, #[case] expected: i64) {
    assert_eq!(wrap(idx, max), expected);
}

#[rstest]
#[case(13, 10, 10)]
#[case(-1, 10, 0)]
fn clamp_matches_contract(#[case] idx: i64, #[case] max: i64, #[case] expected: i64) {
    assert_eq!(clamp(idx, max), expected);
}

#[rstest]
#[case(0, 10)]
#[case(5, 10)]
#[case(10, 10)]
fn index_modes_agree_in_range(#[case] idx: i64, #[case] max: i64) {
    assert_eq!(clamp(idx, max), idx);
    assert_eq!(wrap(idx, max), idx);
}

// Single-segment consistency.

#[test]
fn single_segment_consistency() {
    let shape = [4, 4];
    let strides = [4, 1];
    assert!(is_single_segment(&shape, &strides, 0, 1));

    let strides_gapped = [8, 1];
    assert!(!is_single_segment(&shape, &strides_gapped, 0, 1));
}

// Typed accessor round-trip through an owned buffer.

#[test]
fn typed_accessor_round_trip() {
    let shape = [2, 2];
    // byte strides for a contiguous row-major i32 array (width 4)
    let strides = [8, 4];
    let arr = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf = vec![0u8; arr.byte_length() as usize];
    set_by_subscript::<i32>(&arr, &mut buf, &[1, 0], 42).unwrap();
    let got: i32 = get_by_subscript(&arr, &buf, &[1, 0]).unwrap();
    assert_eq!(got, 42);
}

// Kernel dispatch: a trivial doubling operation over a 2-D contiguous view.

#[test]
fn dispatch_runs_generic_kernel_over_2d_view() {
    use crate::accessor::Scalar;
    use crate::kernel::{dispatch, UnaryDispatchObject};

    let shape = [2, 3];
    // byte strides for a contiguous row-major i32 array (width 4)
    let strides = [12, 4];
    let input = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let output = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();

    let mut input_buf = vec![0u8; input.byte_length() as usize];
    for i in 0..6i32 {
        set_by_subscript::<i32>(&input, &mut input_buf, &[(i / 3) as i64, (i % 3) as i64], i)
            .unwrap();
    }
    let mut output_buf = vec![0u8; output.byte_length() as usize];

    let obj = UnaryDispatchObject::generic();
    let double = |s: Scalar| match s {
        Scalar::Int32(v) => Scalar::Int32(v * 10),
        other => other,
    };
    dispatch(&obj, &input, &input_buf, &output, &mut output_buf, &double).unwrap();

    for i in 0..6i32 {
        let got: i32 =
            get_by_subscript(&output, &output_buf, &[(i / 3) as i64, (i % 3) as i64])
                .unwrap();
        assert_eq!(got, i * 10);
    }
}

#[test]
fn dispatch_rejects_rank_mismatch() {
    use crate::accessor::Scalar;
    use crate::kernel::{dispatch, UnaryDispatchObject};

    let shape_a = [2, 3];
    let strides_a = [12, 4];
    let shape_b = [6];
    let strides_b = [4];
    let input = NdArray::new(
        Dtype::Int32,
        &shape_a,
        &strides_a,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let output = NdArray::new(
        Dtype::Int32,
        &shape_b,
        &strides_b,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let input_buf = vec![0u8; input.byte_length() as usize];
    let mut output_buf = vec![0u8; output.byte_length() as usize];
    let obj = UnaryDispatchObject::generic();
    let identity = |s: Scalar| s;
    assert!(
        dispatch(&obj, &input, &input_buf, &output, &mut output_buf, &identity)
            .is_err()
    );
}

// Dispatch must pick the cache-blocked path for a non-contiguous
// rank-2 view (one column of a 4-wide backing row left unaddressed,
// so the view is not a single segment).

#[test]
fn dispatch_runs_blocked_kernel_over_noncontiguous_2d_view() {
    use crate::accessor::Scalar;
    use crate::kernel::{dispatch, UnaryDispatchObject};

    let shape = [2, 3];
    let strides = [16, 4];
    let input = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let output = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    assert!(!input.is_row_major_contiguous());
    assert!(!input.is_column_major_contiguous());

    let mut input_buf = vec![0u8; 32];
    for r in 0..2i64 {
        for c in 0..3i64 {
            set_by_subscript::<i32>(&input, &mut input_buf, &[r, c], (r * 3 + c) as i32)
                .unwrap();
        }
    }
    let mut output_buf = vec![0u8; 32];

    let obj = UnaryDispatchObject::generic();
    let double = |s: Scalar| match s {
        Scalar::Int32(v) => Scalar::Int32(v * 10),
        other => other,
    };
    dispatch(&obj, &input, &input_buf, &output, &mut output_buf, &double).unwrap();

    for r in 0..2i64 {
        for c in 0..3i64 {
            let got: i32 = get_by_subscript(&output, &output_buf, &[r, c]).unwrap();
            assert_eq!(got, (r * 3 + c) as i32 * 10);
        }
    }
}

// Dispatch must fall through to the generic n-D slot for rank > K.

#[test]
fn dispatch_uses_nd_fallback_above_k() {
    use crate::accessor::Scalar;
    use crate::kernel::{dispatch, UnaryDispatchObject, K};
    use crate::layout::shape_to_strides;

    let mut shape = vec![1i64; K + 1];
    let last = shape.len() - 1;
    shape[last] = 2;
    let strides: Vec<i64> = shape_to_strides(&shape, Order::RowMajor)
        .iter()
        .map(|s| s * 4)
        .collect();

    let input = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let output = NdArray::new(
        Dtype::Int32,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    assert_eq!(input.ndims(), K + 1);

    let mut input_buf = vec![0u8; input.byte_length() as usize];
    let mut subs = vec![0i64; shape.len()];
    set_by_subscript::<i32>(&input, &mut input_buf, &subs, 7).unwrap();
    subs[last] = 1;
    set_by_subscript::<i32>(&input, &mut input_buf, &subs, 9).unwrap();

    let mut output_buf = vec![0u8; output.byte_length() as usize];
    let obj = UnaryDispatchObject::generic();
    let double = |s: Scalar| match s {
        Scalar::Int32(v) => Scalar::Int32(v * 10),
        other => other,
    };
    dispatch(&obj, &input, &input_buf, &output, &mut output_buf, &double).unwrap();

    subs[last] = 0;
    let got0: i32 = get_by_subscript(&output, &output_buf, &subs).unwrap();
    assert_eq!(got0, 70);
    subs[last] = 1;
    let got1: i32 = get_by_subscript(&output, &output_buf, &subs).unwrap();
    assert_eq!(got1, 90);
}

// `Uint8c`, complex, and opaque-width accessors.

#[test]
fn uint8_clamped_round_trip() {
    use crate::accessor::Uint8Clamped;

    let shape = [3];
    let strides = [1];
    let arr = NdArray::new(
        Dtype::Uint8c,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf = vec![0u8; arr.byte_length() as usize];
    set_by_subscript(&arr, &mut buf, &[1], Uint8Clamped(200)).unwrap();
    let got: Uint8Clamped = get_by_subscript(&arr, &buf, &[1]).unwrap();
    assert_eq!(got, Uint8Clamped(200));
}

#[test]
fn scalar_dispatch_handles_uint8c() {
    use crate::accessor::{get_scalar_by_view_index, set_scalar_by_view_index, Scalar, Uint8Clamped};

    let shape = [4];
    let strides = [1];
    let arr = NdArray::new(
        Dtype::Uint8c,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf = vec![0u8; arr.byte_length() as usize];
    set_scalar_by_view_index(&arr, &mut buf, 2, Scalar::Uint8c(Uint8Clamped(77))).unwrap();
    let got = get_scalar_by_view_index(&arr, &buf, 2).unwrap();
    assert_eq!(got, Scalar::Uint8c(Uint8Clamped(77)));
}

#[test]
fn complex_accessors_round_trip() {
    use crate::accessor::{ComplexF32, ComplexF64};

    let shape = [2];
    let strides64 = [8];
    let arr64 = NdArray::new(
        Dtype::Complex64,
        &shape,
        &strides64,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf64 = vec![0u8; arr64.byte_length() as usize];
    set_by_subscript(&arr64, &mut buf64, &[0], ComplexF32 { re: 1.5, im: -2.5 }).unwrap();
    let got64: ComplexF32 = get_by_subscript(&arr64, &buf64, &[0]).unwrap();
    assert_eq!(got64, ComplexF32 { re: 1.5, im: -2.5 });

    let strides128 = [16];
    let arr128 = NdArray::new(
        Dtype::Complex128,
        &shape,
        &strides128,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf128 = vec![0u8; arr128.byte_length() as usize];
    set_by_subscript(&arr128, &mut buf128, &[1], ComplexF64 { re: 3.0, im: 4.0 }).unwrap();
    let got128: ComplexF64 = get_by_subscript(&arr128, &buf128, &[1]).unwrap();
    assert_eq!(got128, ComplexF64 { re: 3.0, im: 4.0 });
}

#[test]
fn raw_bytes_round_trip_for_unsupported_native_widths() {
    use crate::accessor::RawBytes;

    let shape = [2];
    let strides = [2];
    let arr = NdArray::new(
        Dtype::Float16,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    let mut buf = vec![0u8; arr.byte_length() as usize];
    let payload = RawBytes([0xABu8, 0xCD]);
    set_by_subscript(&arr, &mut buf, &[1], payload).unwrap();
    let got: RawBytes<2> = get_by_subscript(&arr, &buf, &[1]).unwrap();
    assert_eq!(got, payload);
}

// Cached-flag overrides are interior-mutable.

#[test]
fn flag_overrides_are_interior_mutable() {
    use crate::descriptor::{COL_MAJOR_CONTIGUOUS, ROW_MAJOR_CONTIGUOUS};

    let shape = [10, 10];
    let strides = [10, 1];
    let arr = NdArray::new(
        Dtype::Uint8,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .unwrap();
    assert_eq!(arr.flags(), ROW_MAJOR_CONTIGUOUS);
    arr.enable_flag(COL_MAJOR_CONTIGUOUS);
    assert!(arr.is_column_major_contiguous());
    arr.disable_flag(ROW_MAJOR_CONTIGUOUS);
    assert!(!arr.is_row_major_contiguous());
}

// `Kind::ClampedUnsignedInt` must not collapse into `Kind::UnsignedInt`.

#[rstest]
#[case(Dtype::Uint32, Dtype::Uint8c, false)]
#[case(Dtype::Uint8, Dtype::Uint8c, true)]
#[case(Dtype::Uint8c, Dtype::Uint8c, true)]
#[case(Dtype::Int32, Dtype::Uint8c, false)]
fn same_kind_cast_respects_clamped_unsigned_kind(
    #[case] from: Dtype,
    #[case] to: Dtype,
    #[case] expected: bool,
) {
    assert_eq!(same_kind_cast(from, to), expected);
}

// A `Generic`-dtype descriptor has no representable scalar width.

#[test]
fn descriptor_rejects_generic_dtype() {
    let shape = [4];
    let strides = [1];
    assert!(NdArray::new(
        Dtype::Generic,
        &shape,
        &strides,
        0,
        Order::RowMajor,
        IndexMode::Error,
        &[IndexMode::Error],
    )
    .is_err());
}
