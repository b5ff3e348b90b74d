//! The builder: a lock around a chunk chain.
//!
//! - [`Utf8Builder`] - append, insert, remove, freeze
//! - `fmt::Write` / `io::Write` impls for writing through formatting and I/O APIs

mod engine;
mod writer;

pub use engine::Utf8Builder;
