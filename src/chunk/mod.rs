//! Chunk storage.
//!
//! - `Chunk` - one fixed-capacity byte block with a backward link
//! - `Chain` - the linked blocks plus the algorithms that splice them

mod chain;
mod data;

pub(crate) use chain::Chain;
pub(crate) use data::Chunk;
