#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;

pub mod hash_code;

pub mod key_hasher;

pub mod hash_table;

/// A key-value map on top of the separate-chaining [`HashTable`].
///
/// Keys are hashed by a [`KeyHasher`](key_hasher::KeyHasher) strategy that
/// defaults to the deterministic [`HashCode`] of the key.
pub mod hash_map;

/// A hash set on top of the separate-chaining [`HashTable`].
///
/// Sets implement [`HashCode`] order-insensitively, so they can be elements
/// of other sets.
pub mod hash_set;

pub mod text;

pub mod dawg;

pub mod trie;

pub mod lexicon;

pub use dawg::Dawg;
pub use error::Error;
pub use error::Result;
pub use hash_code::HashCode;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use lexicon::Lexicon;
pub use trie::Trie;
