//! Unary element-wise kernel dispatch.
//!
//! Rank-specialized kernel fan-out (1..10-D hand-written loops in the
//! system this is grounded on) is replaced here by one generic plain
//! driver and one generic cache-blocked driver, each parameterized by
//! rank at runtime rather than monomorphized per rank — the redesign
//! strategy SPEC_FULL.md §9 calls out directly for this pattern. Every
//! table slot in [`UnaryDispatchObject`] points at one of these two
//! drivers; a caller may still substitute a hand-tuned function for any
//! slot, since the dispatcher only requires the slot be callable.

pub mod blocked;
pub mod dispatch;

pub use blocked::generic_blocked_kernel;
pub use dispatch::{dispatch, generic_kernel, ElementOp, UnaryDispatchObject, UnaryFn, K};
