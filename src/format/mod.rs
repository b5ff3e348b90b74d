//! Turning values into UTF-8 bytes.
//!
//! - [`Scalar`] - numbers, booleans, chars and (feature `chrono`) dates and
//!   times formatted straight into chunk storage
//! - [`AsFragment`] / [`Fragment`] - everything the builder accepts

mod fragment;
mod scalar;
#[cfg(feature = "chrono")]
mod temporal;

pub use fragment::{AsFragment, Fragment};
pub use scalar::{SCRATCH_LEN, Scalar, format_into};

pub(crate) use scalar::{append_scalar, encode_scalar};
