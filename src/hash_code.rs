//! Deterministic 31-bit hash codes and the algorithms that combine them.
//!
//! Every value that can be a key in the default-configured [`HashMap`] or
//! [`HashSet`] implements [`HashCode`]. Containers derive their own code from
//! their elements with [`hash_code_iterable`] or [`hash_code_map`], choosing
//! whether iteration order takes part in the result:
//!
//! - [`HashOrder::Sensitive`] folds `code = code * 33 + element`, so `[1, 2]`
//!   and `[2, 1]` hash differently. Sequences and sorted containers use it.
//! - [`HashOrder::Insensitive`] folds `code = code + element`, so any
//!   permutation of the same elements produces the same code. Hash-based
//!   containers must use it, because two equal hash sets may iterate in
//!   different physical orders depending on their capacity and history.
//!
//! [`HashMap`]: crate::HashMap
//! [`HashSet`]: crate::HashSet

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::collections::BTreeSet;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

/// Starting value of every fold (djb2).
pub const HASH_SEED: u32 = 5381;

/// Per-step multiplier for order-sensitive folds (djb2).
pub const HASH_MULTIPLIER: u32 = 33;

/// Clears the sign bit so every code is a non-negative 31-bit value.
pub const HASH_MASK: u32 = 0x7FFF_FFFF;

/// A deterministic hash code.
///
/// Implementations must be coherent with `Eq`: if `a == b` then
/// `a.hash_code() == b.hash_code()`. Codes are stable across runs and
/// platforms; they are not keyed and offer no protection against
/// adversarial inputs.
///
/// # Examples
///
/// ```rust
/// use chainlex::hash_code::HashCode;
///
/// #[derive(PartialEq, Eq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl HashCode for Point {
///     fn hash_code(&self) -> u32 {
///         (self.x, self.y).hash_code()
///     }
/// }
///
/// let mut set = chainlex::HashSet::new();
/// set.insert(Point { x: 1, y: 2 });
/// assert!(set.contains(&Point { x: 1, y: 2 }));
/// ```
pub trait HashCode {
    /// Returns this value's hash code, always `<= HASH_MASK`.
    fn hash_code(&self) -> u32;
}

/// Whether iteration order contributes to a composite hash code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashOrder {
    /// `code = code * HASH_MULTIPLIER + element`
    Sensitive,
    /// `code = code + element`
    Insensitive,
}

impl HashOrder {
    #[inline]
    fn step(self, code: u32, element: u32) -> u32 {
        match self {
            HashOrder::Sensitive => code.wrapping_mul(HASH_MULTIPLIER).wrapping_add(element),
            HashOrder::Insensitive => code.wrapping_add(element),
        }
    }
}

/// Combines the codes of every item yielded by `iter`.
///
/// # Examples
///
/// ```rust
/// use chainlex::hash_code::HashOrder;
/// use chainlex::hash_code::hash_code_iterable;
///
/// let forward = hash_code_iterable([1, 2, 3], HashOrder::Sensitive);
/// let backward = hash_code_iterable([3, 2, 1], HashOrder::Sensitive);
/// assert_ne!(forward, backward);
///
/// let forward = hash_code_iterable([1, 2, 3], HashOrder::Insensitive);
/// let backward = hash_code_iterable([3, 2, 1], HashOrder::Insensitive);
/// assert_eq!(forward, backward);
/// ```
pub fn hash_code_iterable<I>(iter: I, order: HashOrder) -> u32
where
    I: IntoIterator,
    I::Item: HashCode,
{
    let mut code = HASH_SEED;
    for item in iter {
        code = order.step(code, item.hash_code());
    }
    code & HASH_MASK
}

/// Combines the codes of every element of `collection`, in the order its
/// borrowing iterator yields them.
pub fn hash_code_collection<'a, C>(collection: &'a C, order: HashOrder) -> u32
where
    C: ?Sized,
    &'a C: IntoIterator,
    <&'a C as IntoIterator>::Item: HashCode,
{
    hash_code_iterable(collection, order)
}

/// Combines key and value codes of a map's entries.
///
/// Each entry contributes its key and then its value, both folded with the
/// same `order`.
pub fn hash_code_map<I, K, V>(entries: I, order: HashOrder) -> u32
where
    I: IntoIterator<Item = (K, V)>,
    K: HashCode,
    V: HashCode,
{
    let mut code = HASH_SEED;
    for (key, value) in entries {
        code = order.step(code, key.hash_code());
        code = order.step(code, value.hash_code());
    }
    code & HASH_MASK
}

/// djb2 over a byte string.
#[inline]
pub(crate) fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut code = HASH_SEED;
    for &b in bytes {
        code = code.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u32::from(b));
    }
    code & HASH_MASK
}

macro_rules! narrow_int_hash_code {
    ($($t:ty),*) => {
        $(
            impl HashCode for $t {
                #[inline]
                fn hash_code(&self) -> u32 {
                    (*self as i32 as u32) & HASH_MASK
                }
            }
        )*
    };
}

macro_rules! wide_int_hash_code {
    ($($t:ty),*) => {
        $(
            impl HashCode for $t {
                #[inline]
                fn hash_code(&self) -> u32 {
                    fold_u64(*self as u64)
                }
            }
        )*
    };
}

#[inline]
fn fold_u64(value: u64) -> u32 {
    ((value as u32) ^ ((value >> 32) as u32)) & HASH_MASK
}

narrow_int_hash_code!(i8, i16, i32, u8, u16, u32);
wide_int_hash_code!(i64, u64, isize, usize);

impl HashCode for u128 {
    #[inline]
    fn hash_code(&self) -> u32 {
        fold_u64((*self as u64) ^ ((*self >> 64) as u64))
    }
}

impl HashCode for i128 {
    #[inline]
    fn hash_code(&self) -> u32 {
        (*self as u128).hash_code()
    }
}

impl HashCode for bool {
    #[inline]
    fn hash_code(&self) -> u32 {
        u32::from(*self)
    }
}

impl HashCode for char {
    #[inline]
    fn hash_code(&self) -> u32 {
        *self as u32
    }
}

impl HashCode for f64 {
    fn hash_code(&self) -> u32 {
        // -0.0 == 0.0, so both must hash alike.
        let value = if *self == 0.0 { 0.0f64 } else { *self };
        hash_bytes(&value.to_bits().to_le_bytes())
    }
}

impl HashCode for f32 {
    fn hash_code(&self) -> u32 {
        f64::from(*self).hash_code()
    }
}

impl HashCode for str {
    #[inline]
    fn hash_code(&self) -> u32 {
        hash_bytes(self.as_bytes())
    }
}

impl HashCode for String {
    #[inline]
    fn hash_code(&self) -> u32 {
        self.as_str().hash_code()
    }
}

impl HashCode for () {
    fn hash_code(&self) -> u32 {
        HASH_SEED
    }
}

impl<T: HashCode + ?Sized> HashCode for &T {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
}

impl<T: HashCode + ?Sized> HashCode for &mut T {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
}

impl<T: HashCode + ?Sized> HashCode for Box<T> {
    #[inline]
    fn hash_code(&self) -> u32 {
        (**self).hash_code()
    }
}

impl<T: HashCode> HashCode for Option<T> {
    fn hash_code(&self) -> u32 {
        match self {
            None => 0,
            Some(value) => HashOrder::Sensitive.step(HASH_SEED, value.hash_code()) & HASH_MASK,
        }
    }
}

macro_rules! tuple_hash_code {
    ($($name:ident),+) => {
        impl<$($name: HashCode),+> HashCode for ($($name,)+) {
            #[allow(non_snake_case)]
            fn hash_code(&self) -> u32 {
                let ($($name,)+) = self;
                let mut code = HASH_SEED;
                $(
                    code = HashOrder::Sensitive.step(code, $name.hash_code());
                )+
                code & HASH_MASK
            }
        }
    };
}

tuple_hash_code!(A);
tuple_hash_code!(A, B);
tuple_hash_code!(A, B, C);
tuple_hash_code!(A, B, C, D);

impl<T: HashCode> HashCode for [T] {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self, HashOrder::Sensitive)
    }
}

impl<T: HashCode, const N: usize> HashCode for [T; N] {
    fn hash_code(&self) -> u32 {
        self.as_slice().hash_code()
    }
}

impl<T: HashCode> HashCode for Vec<T> {
    fn hash_code(&self) -> u32 {
        self.as_slice().hash_code()
    }
}

impl<T: HashCode> HashCode for VecDeque<T> {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self, HashOrder::Sensitive)
    }
}

// Sorted containers iterate in a canonical order, so order may take part.
impl<T: HashCode> HashCode for BTreeSet<T> {
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self, HashOrder::Sensitive)
    }
}

impl<K: HashCode, V: HashCode> HashCode for BTreeMap<K, V> {
    fn hash_code(&self) -> u32 {
        hash_code_map(self, HashOrder::Sensitive)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn string_codes_follow_djb2() {
        assert_eq!("".hash_code(), HASH_SEED);
        assert_eq!("a".hash_code(), 5381 * 33 + 97);
        assert_eq!(String::from("ab").hash_code(), "ab".hash_code());
    }

    #[test]
    fn codes_are_never_negative() {
        let values = [i32::MIN, -1, 0, 1, i32::MAX];
        for v in values {
            assert!(v.hash_code() <= HASH_MASK);
        }
        assert!(u64::MAX.hash_code() <= HASH_MASK);
        assert!("a much longer string that overflows".hash_code() <= HASH_MASK);
        assert!(f64::MAX.hash_code() <= HASH_MASK);
    }

    #[test]
    fn wide_ints_fold_high_bits() {
        assert_ne!(1u64.hash_code(), (1u64 | (1 << 40)).hash_code());
        assert_eq!(7i64.hash_code(), 7i32.hash_code());
    }

    #[test]
    fn signed_zero_hashes_alike() {
        assert_eq!(0.0f64.hash_code(), (-0.0f64).hash_code());
    }

    #[test]
    fn sequence_order_matters() {
        assert_ne!(vec![1, 2, 3].hash_code(), vec![3, 2, 1].hash_code());
        assert_ne!((1, 2).hash_code(), (2, 1).hash_code());
        assert_eq!([1, 2, 3].hash_code(), vec![1, 2, 3].hash_code());
    }

    #[test]
    fn insensitive_fold_ignores_permutation() {
        let a = hash_code_iterable([40, 20, 10, 30], HashOrder::Insensitive);
        let b = hash_code_iterable([10, 20, 30, 40], HashOrder::Insensitive);
        assert_eq!(a, b);
    }

    #[test]
    fn map_fold_pairs_keys_with_values() {
        let entries = [("a", 1), ("b", 2)];
        let swapped = [("b", 2), ("a", 1)];
        assert_eq!(
            hash_code_map(entries, HashOrder::Insensitive),
            hash_code_map(swapped, HashOrder::Insensitive)
        );
        assert_ne!(
            hash_code_map(entries, HashOrder::Sensitive),
            hash_code_map(swapped, HashOrder::Sensitive)
        );
    }

    #[test]
    fn empty_collections_hash_to_seed() {
        let empty: Vec<i32> = Vec::new();
        assert_eq!(empty.hash_code(), HASH_SEED);
        assert_eq!(
            hash_code_collection(&BTreeSet::<i32>::new(), HashOrder::Insensitive),
            HASH_SEED
        );
    }

    #[test]
    fn option_distinguishes_none() {
        assert_ne!(None::<i32>.hash_code(), Some(0).hash_code());
    }
}
