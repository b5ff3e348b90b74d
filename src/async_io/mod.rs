//! Async I/O support for the builder.
//!
//! This module connects the builder to `futures-io`, making it
//! runtime-agnostic and compatible with tokio (through `tokio-util`'s compat
//! layer), async-std, smol, and other async runtimes.
//!
//! - `AsyncWrite` for [`Utf8Builder`](crate::Utf8Builder) and `&Utf8Builder`
//! - [`AppendReader`] - reads an `AsyncRead` to the end, straight into chunk storage
//!
//! This module requires the `async-io` feature to be enabled.

mod reader;
mod writer;

pub use reader::AppendReader;
