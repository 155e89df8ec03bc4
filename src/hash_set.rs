use core::borrow::Borrow;
use core::fmt::Debug;
use core::fmt::Display;
use core::str::FromStr;

use crate::error::Error;
use crate::error::Result;
use crate::hash_code::HashCode;
use crate::hash_code::HashOrder;
use crate::hash_code::hash_code_iterable;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::key_hasher::HashCodeKeys;
use crate::key_hasher::KeyHasher;
use crate::text;
use crate::text::ParseValue;
use crate::text::Scanner;

/// A hash set built on the separate-chaining [`HashTable`].
///
/// Only the elements are stored; there is no per-entry value. Elements are
/// compared with `Eq` and hashed by the strategy `S`, which defaults to
/// [`HashCodeKeys`].
///
/// Sets are themselves [`HashCode`] (order-insensitively), so a set of sets
/// works out of the box:
///
/// ```rust
/// use chainlex::HashSet;
///
/// let a: HashSet<i32> = [69, 42].into_iter().collect();
/// let b = a.clone();
///
/// let mut outer = HashSet::new();
/// outer.insert(a);
/// outer.insert(b);
/// outer.insert(HashSet::new());
/// outer.insert(HashSet::new());
/// assert_eq!(outer.len(), 2);
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = HashCodeKeys> {
    table: HashTable<T>,
    hasher: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
}

/// Order-insensitive: equal sets hash equal whatever their layout.
impl<T, S> HashCode for HashSet<T, S>
where
    T: HashCode,
{
    fn hash_code(&self) -> u32 {
        hash_code_iterable(self.iter(), HashOrder::Insensitive)
    }
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Writes the set as `{a, b, ...}`, each element in its `Debug` form.
impl<T, S> Display for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        text::write_set(f, self.iter())
    }
}

impl<T> HashSet<T, HashCodeKeys> {
    /// Creates an empty set using the default [`HashCodeKeys`] strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(HashCodeKeys)
    }

    /// Creates an empty set that can hold `capacity` elements without
    /// rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, HashCodeKeys)
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set with the given hash strategy.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashTable::new(),
            hasher,
        }
    }

    /// Creates an empty set with the given capacity and hash strategy.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hasher,
        }
    }

    /// Returns the hash strategy.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns how many elements the set can hold before it rehashes.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Returns an iterator over the elements, in unspecified order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let set: HashSet<i32> = [40, 20, 10, 30].into_iter().collect();
    ///
    /// let mut values: Vec<_> = set.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, [10, 20, 30, 40]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns some element of the set, or `None` if it is empty.
    ///
    /// Which element is unspecified; it is the first one [`iter`](Self::iter)
    /// would yield.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Removes and yields every element.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Keeps only the elements for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let mut set: HashSet<i32> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v| f(v));
    }

    /// Returns a version-checked [`Cursor`] over the elements.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            inner: self.table.cursor(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. An equal value already
    /// present is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let mut set = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hasher.hash_key(&value);
        match self.table.entry(hash, |v| v == &value) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Adds every value of `values` and returns the set for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let mut set = HashSet::new();
    /// set.add_all([1, 2]).add_all([2, 3]);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, values: I) -> &mut Self {
        self.extend(values);
        self
    }

    /// Adds a value, replacing and returning an equal value already present.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hasher.hash_key(&value);
        match self.table.entry(hash, |v| v == &value) {
            TableEntry::Occupied(mut entry) => Some(core::mem::replace(entry.get_mut(), value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let set: HashSet<String> = ["to".to_string()].into_iter().collect();
    /// assert!(set.contains("to"));
    /// assert!(!set.contains("be"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(value);
        self.table.find(hash, |v| v.borrow() == value)
    }

    /// Removes a value, returning whether it was present.
    ///
    /// Removing an absent value is not an error.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(value);
        self.table.remove(hash, |v| v.borrow() == value)
    }

    /// Returns `true` if the set has no elements in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// ```
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }

    /// Returns an iterator over the elements in `self` or `other`, each
    /// once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3].into_iter().collect();
    ///
    /// let mut union: Vec<_> = a.union(&b).copied().collect();
    /// union.sort();
    /// assert_eq!(union, [1, 2, 3]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a HashSet<T, S>) -> Union<'a, T, S> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            first: self,
        }
    }

    /// Returns an iterator over the elements in both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3].into_iter().collect();
    ///
    /// let both: Vec<_> = a.intersection(&b).copied().collect();
    /// assert_eq!(both, [2]);
    /// ```
    pub fn intersection<'a>(&'a self, other: &'a HashSet<T, S>) -> Intersection<'a, T, S> {
        if self.len() <= other.len() {
            Intersection {
                iter: self.iter(),
                other,
            }
        } else {
            Intersection {
                iter: other.iter(),
                other: self,
            }
        }
    }

    /// Returns an iterator over the elements in `self` but not in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashSet;
    /// #
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3].into_iter().collect();
    ///
    /// let only_a: Vec<_> = a.difference(&b).copied().collect();
    /// assert_eq!(only_a, [1]);
    /// ```
    pub fn difference<'a>(&'a self, other: &'a HashSet<T, S>) -> Difference<'a, T, S> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Returns an iterator over the elements in exactly one of the sets.
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a HashSet<T, S>,
    ) -> SymmetricDifference<'a, T, S> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Eq,
    S: KeyHasher<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> ParseValue for HashSet<T, S>
where
    T: Eq + ParseValue,
    S: KeyHasher<T> + Default,
{
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        let mut set = Self::default();
        scanner.parse_delimited('{', '}', |s| {
            set.insert(T::parse_value(s)?);
            Ok(())
        })?;
        Ok(set)
    }
}

/// Parses `{a, b, ...}`.
///
/// ```rust
/// # use chainlex::HashSet;
/// #
/// let set: HashSet<String> = r#"{"x", y}"#.parse().unwrap();
/// assert!(set.contains("x") && set.contains("y"));
/// ```
impl<T, S> FromStr for HashSet<T, S>
where
    T: Eq + ParseValue,
    S: KeyHasher<T> + Default,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        text::parse_str(s)
    }
}

/// A borrow-free, version-checked position in a [`HashSet`].
///
/// See [`HashTable::cursor`](crate::hash_table::HashTable::cursor).
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    inner: crate::hash_table::Cursor,
}

impl Cursor {
    /// Advances to the next element, failing with
    /// [`Error::ConcurrentModification`] if `set` was structurally modified
    /// since the cursor was created.
    pub fn next<'a, T, S>(&mut self, set: &'a HashSet<T, S>) -> Result<Option<&'a T>> {
        self.inner.next(&set.table)
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, T, S> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    first: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Union<'a, T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.first.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Intersection<'a, T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Difference<'a, T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if !self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the symmetric difference of two sets.
pub struct SymmetricDifference<'a, T, S> {
    iter: core::iter::Chain<Difference<'a, T, S>, Difference<'a, T, S>>,
}

impl<'a, T, S> Iterator for SymmetricDifference<'a, T, S>
where
    T: Eq,
    S: KeyHasher<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
