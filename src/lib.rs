#![forbid(unsafe_code)]
//! A low-level strided multidimensional array runtime.
//!
//! This crate provides the view + indexing + kernel-dispatch engine that
//! sits underneath higher-level numeric code: a typed descriptor over a
//! flat byte buffer, bidirectional translation between subscript, view,
//! and buffer coordinate spaces, shape broadcasting, dtype cast
//! admissibility tables, and a unary element-wise kernel dispatcher.
//!
//! The descriptor itself never owns or borrows the element buffer; every
//! accessor and the kernel dispatcher take the backing bytes as an
//! explicit argument. See [`descriptor`] for why.

pub mod accessor;
pub mod broadcast;
pub mod descriptor;
pub mod dtype;
pub mod index_mode;
pub mod kernel;
pub mod layout;
pub mod order;
pub mod translate;

#[cfg(test)]
mod test;

pub use descriptor::NdArray;
pub use dtype::{CastingMode, Dtype, Kind};
pub use index_mode::IndexMode;
pub use order::Order;
