//! Persistent immutable collections sharing structure between versions.
//!
//! [`Vector`] is an indexed sequence backed by a 32-way bit-partitioned trie.
//! [`Map`] and [`Set`] are hashed collections backed by hash array mapped
//! tries. Every operation leaves the original collection intact and returns
//! a new one sharing all unchanged subtrees with it.

mod bitmap;
mod bucket;
mod hamt;
mod key_value;
mod map;
#[cfg(test)]
mod proptests;
mod set;
mod trie;
mod vector;

pub use hamt::{ClonedHamtIterator, HamtIterator};
pub use map::{KeyIterator, Map, ValueIterator};
pub use set::{ClonedSetIterator, Set, SetIterator};
pub use vector::{ClonedVectorIterator, Vector, VectorIterator};
