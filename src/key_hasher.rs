//! Hash strategies that turn a key into the 64-bit hash stored by the table.
//!
//! The containers never hash keys themselves; they ask their strategy. The
//! default, [`HashCodeKeys`], uses [`HashCode`], so a key type without a hash
//! function is rejected at compile time instead of silently falling back to
//! something like address hashing:
//!
//! ```compile_fail
//! use chainlex::HashSet;
//!
//! #[derive(PartialEq, Eq)]
//! struct NoHash(u32);
//!
//! let mut set = HashSet::new();
//! set.insert(NoHash(1));
//! ```
//!
//! Types that implement `core::hash::Hash` can use any std-style
//! `BuildHasher` through [`BuildHasherKeys`], and any closure
//! `Fn(&K) -> u64` is a strategy of its own.

use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash_code::HashCode;

/// Computes the table hash of a key.
///
/// Strategies must be deterministic for the lifetime of a container, and
/// keys that compare equal must hash equal.
pub trait KeyHasher<K: ?Sized> {
    /// Returns the hash of `key`.
    fn hash_key(&self, key: &K) -> u64;
}

/// The default strategy: the key's own [`HashCode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashCodeKeys;

impl<K: HashCode + ?Sized> KeyHasher<K> for HashCodeKeys {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        u64::from(key.hash_code())
    }
}

/// Adapts a [`BuildHasher`] for keys implementing [`Hash`].
///
/// # Examples
///
/// ```rust
/// use std::collections::hash_map::RandomState;
///
/// use chainlex::HashMap;
/// use chainlex::key_hasher::BuildHasherKeys;
///
/// let mut map = HashMap::with_hasher(BuildHasherKeys(RandomState::new()));
/// map.insert("apple", 3);
/// assert_eq!(map.get("apple"), Some(&3));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHasherKeys<S>(pub S);

impl<K, S> KeyHasher<K> for BuildHasherKeys<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// Fixed-seed foldhash, for `Hash` keys that have no [`HashCode`].
#[cfg(feature = "foldhash")]
pub type FoldHashKeys = BuildHasherKeys<foldhash::fast::FixedState>;

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}
