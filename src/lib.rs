//! chunkstr
//!
//! Chunked UTF-8 string building for Rust.
//!
//! `chunkstr` grows text as a chain of fixed-capacity byte chunks instead of
//! one contiguous buffer, so appending never re-copies what was already
//! written. It is designed as a small, composable primitive for:
//!
//! - assembling large responses and reports piece by piece
//! - code and markup generation
//! - log and record formatting shared between threads
//!
//! The crate intentionally:
//! - does NOT validate or decode UTF-8 on the way in
//! - does NOT persist or serialize its contents
//! - does NOT tune growth beyond a single chunk capacity
//!
//! It only does one thing: **Values in → one contiguous UTF-8 buffer out**
//!
//! # Sync
//!
//! ```
//! use chunkstr::{BuilderConfig, BuilderError, Utf8Builder};
//!
//! fn main() -> Result<(), BuilderError> {
//!     let builder = Utf8Builder::new(BuilderConfig::new(32)?);
//!
//!     builder.append("total: ");
//!     builder.append(1234u32);
//!     builder.append_line(None::<&str>);
//!     builder.append_join(", ", ["a", "b", "c"]);
//!     builder.insert(0, "> ")?;
//!     builder.remove(2, 7)?;
//!
//!     let frozen = builder.to_bytes();
//!     assert!(frozen.starts_with(b"> 1234"));
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use chunkstr::Utf8Builder;
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> std::io::Result<()> {
//!     let builder = Utf8Builder::default();
//!     let n = builder.append_reader(reader).await?;
//!     println!("appended {n} bytes");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod format;

mod chunk; // internal chunk chain

pub mod encode;

#[cfg(feature = "async-io")]
mod async_io;

//
// Public surface (intentionally tiny)
//

pub use builder::Utf8Builder;
pub use config::{BuilderConfig, DEFAULT_CHUNK_CAPACITY, LineTerminator};
pub use error::BuilderError;
pub use format::{AsFragment, Fragment, SCRATCH_LEN, Scalar, format_into};

#[cfg(feature = "async-io")]
pub use async_io::AppendReader;
