//! The separate-chaining engine behind [`HashMap`] and [`HashSet`].
//!
//! [`HashMap`]: crate::HashMap
//! [`HashSet`]: crate::HashSet

use alloc::vec::Vec;
use core::fmt::Debug;
use core::sync::atomic::AtomicUsize;
use core::sync::atomic::Ordering;

use cfg_if::cfg_if;

use crate::error::Error;
use crate::error::Result;

cfg_if! {
    if #[cfg(feature = "load-factor-fifty")] {
        /// Maximum load, in percent of the bucket count, before a rehash.
        pub const MAX_LOAD_PERCENT: usize = 50;
    } else if #[cfg(feature = "load-factor-ninety")] {
        /// Maximum load, in percent of the bucket count, before a rehash.
        pub const MAX_LOAD_PERCENT: usize = 90;
    } else {
        /// Maximum load, in percent of the bucket count, before a rehash.
        pub const MAX_LOAD_PERCENT: usize = 70;
    }
}

/// Number of buckets of a freshly created table.
pub const INITIAL_BUCKET_COUNT: usize = 101;

#[inline(always)]
fn max_population(bucket_count: usize) -> usize {
    ((bucket_count as u128 * MAX_LOAD_PERCENT as u128) / 100) as usize
}

/// Smallest bucket count reachable from `count` by repeated growth that holds
/// `entries` without exceeding the load factor.
///
/// # Panics
///
/// Panics if the bucket count would overflow `usize`.
fn buckets_for(mut count: usize, entries: usize) -> usize {
    while max_population(count) < entries {
        count = grow(count);
    }
    count
}

/// # Panics
///
/// Panics if the bucket count would overflow `usize`.
#[inline(always)]
fn grow(bucket_count: usize) -> usize {
    match bucket_count.checked_mul(2).and_then(|n| n.checked_add(1)) {
        Some(count) => count,
        None => capacity_overflow(),
    }
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

static NEXT_TABLE_ID: AtomicUsize = AtomicUsize::new(0);

fn new_buckets<V>(count: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, Vec::new);
    buckets
}

#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

/// Entries whose hashes reduce to the same bucket index.
type Bucket<V> = Vec<Slot<V>>;

/// Debug statistics for hash table analysis.
///
/// Test-only: compiled only with `cfg(test)`.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets allocated
    pub bucket_count: usize,
    /// Maximum population before the next rehash
    pub capacity: usize,
    /// Buckets holding no entries
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / bucket_count)
    pub load_factor: f64,
}

/// A hash table using separate chaining.
///
/// `HashTable<V>` stores values of type `V`. Like the maps built on it, it
/// does not know how to hash or compare values: every operation takes the
/// hash of the value being looked for and an equality predicate. Each entry
/// keeps its full 64-bit hash, so a rehash never calls back into user code.
///
/// The table starts with [`INITIAL_BUCKET_COUNT`] buckets and, whenever an
/// insertion would push `len / bucket_count` past [`MAX_LOAD_PERCENT`],
/// grows to `2 * bucket_count + 1` buckets and redistributes every entry.
/// It never shrinks.
///
/// ## Example
///
/// ```rust
/// use chainlex::hash_code::HashCode;
/// use chainlex::hash_table::Entry;
/// use chainlex::hash_table::HashTable;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u32,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = u64::from(123u32.hash_code());
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
    max_pop: usize,
    version: u64,
    id: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("buckets", &self.buckets.len())
            .field("capacity", &self.max_pop)
            .field("longest_chain", &longest)
            .field("version", &self.version)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`INITIAL_BUCKET_COUNT`] buckets.
    pub fn new() -> Self {
        Self::with_bucket_count(INITIAL_BUCKET_COUNT)
    }

    /// Creates a table that can hold at least `capacity` values without
    /// rehashing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(1000);
    /// assert!(table.capacity() >= 1000);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the required bucket count overflows `usize`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_bucket_count(buckets_for(INITIAL_BUCKET_COUNT, capacity))
    }

    fn with_bucket_count(count: usize) -> Self {
        Self {
            buckets: new_buckets(count),
            populated: 0,
            max_pop: max_population(count),
            version: 0,
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    #[inline(always)]
    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values come out bucket by bucket. The order is fixed for a given table
    /// state but is otherwise unspecified, and changes after a rehash.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_code::HashCode;
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for word in ["key1", "key2"] {
    ///     let hash = u64::from(word.hash_code());
    ///     table.entry(hash, |s: &String| s == word).or_insert(word.to_string());
    /// }
    ///
    /// let mut seen: Vec<_> = table.iter().cloned().collect();
    /// seen.sort();
    /// assert_eq!(seen, ["key1", "key2"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: [].iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator yielding mutable references to all values.
    ///
    /// Callers must not change the part of a value that its hash was computed
    /// from.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            current: [].iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The bucket array is kept. Values not consumed before the iterator is
    /// dropped are dropped with it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_code::HashCode;
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(u64::from(7u32.hash_code()), |&v: &u32| v == 7).or_insert(7);
    ///
    /// let values: Vec<u32> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values, [7]);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let remaining = core::mem::take(&mut self.populated);
        if remaining > 0 {
            self.version = self.version.wrapping_add(1);
        }
        Drain {
            buckets: self.buckets.iter_mut(),
            current: None,
            remaining,
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns how many elements the table can hold before it rehashes.
    pub fn capacity(&self) -> usize {
        self.max_pop
    }

    /// Returns the structural version of the table.
    ///
    /// The version changes whenever an entry is added or removed, and on
    /// every rehash. Replacing a value in place does not change it.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Removes all elements from the table, keeping its buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    /// let buckets = table.bucket_count();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.bucket_count(), buckets);
    /// ```
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
        self.version = self.version.wrapping_add(1);
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// Does nothing if the current capacity already suffices.
    ///
    /// # Panics
    ///
    /// Panics if the required bucket count overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        let Some(required) = self.populated.checked_add(additional) else {
            capacity_overflow();
        };
        if required > self.max_pop {
            self.rehash(buckets_for(self.buckets.len(), required));
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// The value is identified by its hash and an equality predicate. A
    /// missing value is not an error: `None` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        let bucket = self.bucket_index(hash);
        let slot = Self::position(&self.buckets[bucket], hash, &eq)?;
        Some(self.remove_at(bucket, slot))
    }

    fn remove_at(&mut self, bucket: usize, slot: usize) -> V {
        self.populated -= 1;
        self.version = self.version.wrapping_add(1);
        self.buckets[bucket].swap_remove(slot).value
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the entry turns out to be vacant, inserting into it may rehash the
    /// table first so the load factor is never exceeded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_code::HashCode;
    /// # use chainlex::hash_table::Entry;
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = u64::from("hello".hash_code());
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().push('!');
    ///     }
    /// }
    /// assert_eq!(table.find(hash, |s| s == "hello").map(String::as_str), Some("hello"));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let bucket = self.bucket_index(hash);
        match Self::position(&self.buckets[bucket], hash, &eq) {
            Some(slot) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    #[inline]
    fn position(chain: &[Slot<V>], hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        chain.iter().position(|s| s.hash == hash && eq(&s.value))
    }

    /// Finds a value by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(5, |&n: &u64| n == 5).or_insert(5);
    ///
    /// assert_eq!(table.find(5, |&n| n == 5), Some(&5));
    /// assert_eq!(table.find(6, |&n| n == 6), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.populated == 0 {
            return None;
        }
        let chain = &self.buckets[self.bucket_index(hash)];
        Self::position(chain, hash, eq).map(|slot| &chain[slot].value)
    }

    /// Finds a value by hash and equality predicate, mutably.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.populated == 0 {
            return None;
        }
        let index = self.bucket_index(hash);
        let chain = &mut self.buckets[index];
        Self::position(chain, hash, eq).map(move |slot| &mut chain[slot].value)
    }

    /// Keeps only the values for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool) {
        let before = self.populated;
        let mut kept = 0;
        for bucket in &mut self.buckets {
            bucket.retain_mut(|slot| f(&mut slot.value));
            kept += bucket.len();
        }
        self.populated = kept;
        if kept != before {
            self.version = self.version.wrapping_add(1);
        }
    }

    /// Returns a checked cursor positioned before the first value.
    ///
    /// Unlike [`iter`](Self::iter), a cursor holds no borrow of the table, so
    /// the table can be modified while one is live. The next step after such
    /// a modification fails with [`Error::ConcurrentModification`] instead of
    /// skipping or repeating values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::Error;
    /// # use chainlex::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    ///
    /// let mut cursor = table.cursor();
    /// assert!(cursor.next(&table).unwrap().is_some());
    ///
    /// table.remove(2, |&n| n == 2);
    /// assert!(matches!(cursor.next(&table), Err(Error::ConcurrentModification)));
    /// ```
    pub fn cursor(&self) -> Cursor {
        Cursor {
            bucket: 0,
            slot: 0,
            version: self.version,
            table: self.id,
        }
    }

    fn grow_for_insert(&mut self) {
        if self.populated + 1 > self.max_pop {
            self.rehash(grow(self.buckets.len()));
        }
    }

    fn rehash(&mut self, bucket_count: usize) {
        log::debug!(
            "rehashing {} entries: {} -> {} buckets",
            self.populated,
            self.buckets.len(),
            bucket_count
        );

        let old = core::mem::replace(&mut self.buckets, new_buckets(bucket_count));
        for slot in old.into_iter().flatten() {
            let index = self.bucket_index(slot.hash);
            self.buckets[index].push(slot);
        }
        self.max_pop = max_population(bucket_count);
        self.version = self.version.wrapping_add(1);
    }

    #[cfg(test)]
    pub(crate) fn debug_stats(&self) -> DebugStats {
        DebugStats {
            populated: self.populated,
            bucket_count: self.buckets.len(),
            capacity: self.max_pop,
            empty_buckets: self.buckets.iter().filter(|b| b.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.populated as f64 / self.buckets.len() as f64,
        }
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// # Examples
///
/// ```rust
/// # use chainlex::hash_table::Entry;
/// # use chainlex::hash_table::HashTable;
/// #
/// let mut table = HashTable::new();
///
/// match table.entry(3, |s: &&str| *s == "key") {
///     Entry::Vacant(entry) => {
///         entry.insert("key");
///     }
///     Entry::Occupied(entry) => {
///         println!("Key already exists with value: {}", entry.get());
///     }
/// }
/// ```
pub enum Entry<'a, V> {
    /// A vacant entry - the value is not present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - the value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    ///
    /// The closure is not called for occupied entries.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry; vacant entries are left alone and
    /// `None` is returned.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the table.
///
/// This struct is created by [`HashTable::entry`] when no stored value
/// matches.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    ///
    /// Rehashes first if the insertion would exceed the load factor.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        table.grow_for_insert();

        let index = table.bucket_index(self.hash);
        table.populated += 1;
        table.version = table.version.wrapping_add(1);

        let chain = &mut table.buckets[index];
        chain.push(Slot {
            hash: self.hash,
            value,
        });
        let last = chain.len() - 1;
        &mut chain[last].value
    }
}

/// A view into an occupied entry in the table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket][self.slot].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket][self.slot].value
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket][self.slot].value
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        self.table.remove_at(self.bucket, self.slot)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket<V>>,
    current: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.next() {
                self.remaining -= 1;
                return Some(&slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.current = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the values in a [`HashTable`].
pub struct IterMut<'a, V> {
    buckets: core::slice::IterMut<'a, Bucket<V>>,
    current: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.next() {
                self.remaining -= 1;
                return Some(&mut slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.current = self.buckets.next()?.iter_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by [`HashTable::drain`].
pub struct Drain<'a, V> {
    buckets: core::slice::IterMut<'a, Bucket<V>>,
    current: Option<alloc::vec::Drain<'a, Slot<V>>>,
    remaining: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.current = Some(self.buckets.next()?.drain(..));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        self.current = None;
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    buckets: alloc::vec::IntoIter<Bucket<V>>,
    current: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.current.next() {
                self.remaining -= 1;
                return Some(slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.current = self.buckets.next()?.into_iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            current: Vec::new().into_iter(),
            remaining: self.populated,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A borrow-free, version-checked position in a [`HashTable`].
///
/// Created by [`HashTable::cursor`]. A cursor only advances against the
/// table that created it, or a clone of that table that has seen the same
/// changes. Any other table is reported as
/// [`Error::ConcurrentModification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    bucket: usize,
    slot: usize,
    version: u64,
    table: usize,
}

impl Cursor {
    /// Advances to the next value.
    ///
    /// Returns `Ok(None)` once every value has been visited, and
    /// [`Error::ConcurrentModification`] if `table` was structurally modified
    /// since the cursor was created, or is not the table it was created from.
    pub fn next<'a, V>(&mut self, table: &'a HashTable<V>) -> Result<Option<&'a V>> {
        if self.table != table.id {
            log::warn!("cursor for table {} used on table {}", self.table, table.id);
            return Err(Error::ConcurrentModification);
        }
        if self.version != table.version {
            log::warn!(
                "cursor at bucket {} used after table changed (version {} -> {})",
                self.bucket,
                self.version,
                table.version
            );
            return Err(Error::ConcurrentModification);
        }

        while let Some(chain) = table.buckets.get(self.bucket) {
            if let Some(slot) = chain.get(self.slot) {
                self.slot += 1;
                return Ok(Some(&slot.value));
            }
            self.bucket += 1;
            self.slot = 0;
        }
        Ok(None)
    }

    /// Returns `true` if `table` is the table this cursor was created from
    /// and has not been structurally modified since.
    pub fn is_valid_for<V>(&self, table: &HashTable<V>) -> bool {
        self.table == table.id && self.version == table.version
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    struct HashState {
        k0: u64,
        k1: u64,
    }

    impl HashState {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k0: rng.try_next_u64().unwrap(),
                k1: rng.try_next_u64().unwrap(),
            }
        }

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn hash_key(state: &HashState, key: u64) -> u64 {
        let mut h = state.build_hasher();
        h.write_u64(key);
        h.finish()
    }

    fn hash_string_key(state: &HashState, key: &str) -> u64 {
        let mut h = state.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }

    fn insert_item(table: &mut HashTable<Item>, state: &HashState, key: u64, value: i32) {
        let hash = hash_key(state, key);
        table
            .entry(hash, |v| v.key == key)
            .or_insert(Item { key, value });
    }

    #[test]
    fn insert_and_find() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            match table.entry(hash, |v: &Item| v.key == k) {
                Entry::Vacant(v) => {
                    v.insert(Item {
                        key: k,
                        value: (k as i32) * 2,
                    });
                }
                Entry::Occupied(_) => panic!("unexpected occupied on first insert: {:#?}", table),
            }
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            let hash = hash_key(&state, k);
            assert_eq!(
                table.find(hash, |v| v.key == k),
                Some(&Item {
                    key: k,
                    value: (k as i32) * 2
                }),
                "{:#?}",
                table
            );
        }

        let miss_hash = hash_key(&state, 999);
        assert!(table.find(miss_hash, |v| v.key == 999).is_none());
    }

    #[test]
    fn duplicate_entry_is_occupied() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        let k = 42u64;
        let hash = hash_key(&state, k);

        match table.entry(hash, |v| v.key == k) {
            Entry::Vacant(v) => {
                v.insert(Item { key: k, value: 7 });
            }
            Entry::Occupied(_) => panic!("should be vacant first time"),
        }

        let version = table.version();
        match table.entry(hash, |v| v.key == k) {
            Entry::Occupied(mut occ) => {
                assert_eq!(occ.get().value, 7);
                *occ.get_mut() = Item { key: k, value: 11 };
            }
            Entry::Vacant(_) => panic!("should be occupied second time"),
        }

        assert_eq!(table.len(), 1);
        assert_eq!(table.find(hash, |v| v.key == k).map(|v| v.value), Some(11));
        assert_eq!(table.version(), version, "in-place update is not structural");
    }

    #[test]
    fn find_mut_and_modify() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        insert_item(&mut table, &state, 5, 1);

        let hash = hash_key(&state, 5);
        if let Some(item) = table.find_mut(hash, |v| v.key == 5) {
            item.value += 10;
        }
        assert_eq!(table.find(hash, |v| v.key == 5).map(|v| v.value), Some(11));
        assert!(table.find_mut(hash_key(&state, 6), |v| v.key == 6).is_none());
    }

    #[test]
    fn remove_items() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..10u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        for k in (0..10u64).step_by(2) {
            let removed = table.remove(hash_key(&state, k), |v| v.key == k);
            assert_eq!(removed.map(|v| v.key), Some(k));
        }
        assert_eq!(table.len(), 5);
        for k in 0..10u64 {
            let found = table.find(hash_key(&state, k), |v| v.key == k).is_some();
            assert_eq!(found, k % 2 == 1);
        }

        assert_eq!(table.remove(hash_key(&state, 0), |v| v.key == 0), None);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn insert_many() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..5_000u64 {
            insert_item(&mut table, &state, k, k as i32);
        }
        assert_eq!(table.len(), 5_000);
        for k in 0..5_000u64 {
            assert_eq!(
                table.find(hash_key(&state, k), |v| v.key == k).map(|v| v.value),
                Some(k as i32)
            );
        }
    }

    #[test]
    fn load_factor_never_exceeded() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..2_000u64 {
            insert_item(&mut table, &state, k, 0);
            let stats = table.debug_stats();
            assert!(
                stats.populated * 100 <= stats.bucket_count * MAX_LOAD_PERCENT,
                "{:?}",
                stats
            );
        }
    }

    #[test]
    fn growth_follows_two_n_plus_one() {
        let mut table: HashTable<u64> = HashTable::new();
        assert_eq!(table.bucket_count(), INITIAL_BUCKET_COUNT);

        let first_limit = table.capacity() as u64;
        for k in 0..=first_limit {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        assert_eq!(table.bucket_count(), INITIAL_BUCKET_COUNT * 2 + 1);
    }

    #[test]
    fn never_shrinks() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in 0..1_000u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        let grown = table.bucket_count();
        for k in 0..1_000u64 {
            table.remove(k, |&v| v == k);
        }
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), grown);
        table.clear();
        assert_eq!(table.bucket_count(), grown);
    }

    #[test]
    fn explicit_collision() {
        let mut table: HashTable<Item> = HashTable::new();
        let hash = 0xDEAD_BEEF;
        for k in 0..20u64 {
            table
                .entry(hash, |v| v.key == k)
                .or_insert(Item { key: k, value: k as i32 });
        }
        assert_eq!(table.len(), 20);
        assert_eq!(table.debug_stats().longest_chain, 20);
        for k in 0..20u64 {
            assert_eq!(table.find(hash, |v| v.key == k).map(|v| v.value), Some(k as i32));
        }
        assert_eq!(table.remove(hash, |v| v.key == 7).map(|v| v.key), Some(7));
        assert!(table.find(hash, |v| v.key == 7).is_none());
        assert_eq!(table.len(), 19);
    }

    #[test]
    fn bucket_collisions_with_distinct_hashes() {
        let mut table: HashTable<u64> = HashTable::new();
        let buckets = table.bucket_count() as u64;
        // Same bucket, different full hashes.
        for k in 0..5u64 {
            let hash = 3 + k * buckets;
            table.entry(hash, |&v| v == hash).or_insert(hash);
        }
        assert_eq!(table.debug_stats().longest_chain, 5);
        for k in 0..5u64 {
            let hash = 3 + k * buckets;
            assert_eq!(table.find(hash, |&v| v == hash), Some(&hash));
        }
    }

    #[test]
    fn iter_and_drain() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..50u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        let mut seen: Vec<u64> = table.iter().map(|v| v.key).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!(table.iter().len(), 50);

        for item in table.iter_mut() {
            item.value = -item.value;
        }
        assert!(table.iter().all(|v| v.value == -(v.key as i32)));

        let mut drained: Vec<u64> = table.drain().map(|v| v.key).collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..50).collect::<Vec<_>>());
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn partial_drain_empties_table() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in 0..100u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        {
            let mut drain = table.drain();
            drain.next();
            drain.next();
        }
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
        table.entry(1, |&v| v == 1).or_insert(1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn into_iter_yields_everything() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in 0..300u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        let mut values: Vec<u64> = table.into_iter().collect();
        values.sort_unstable();
        assert_eq!(values, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn insert_and_find_string_keys() {
        let state = HashState::default();
        let mut table: HashTable<String> = HashTable::new();
        let words = ["alpha", "beta", "gamma", "delta"];
        for w in words {
            table
                .entry(hash_string_key(&state, w), |s| s == w)
                .or_insert(w.to_string());
        }
        for w in words {
            assert_eq!(
                table.find(hash_string_key(&state, w), |s| s == w).map(String::as_str),
                Some(w)
            );
        }
        assert!(table.find(hash_string_key(&state, "omega"), |s| s == "omega").is_none());
    }

    #[test]
    fn entry_or_insert_with() {
        let mut table: HashTable<String> = HashTable::new();
        let value = table.entry(1, |s| s == "a").or_insert_with(|| "a".to_string());
        assert_eq!(value, "a");
        let value = table
            .entry(1, |s| s == "a")
            .or_insert_with(|| panic!("should not be called"));
        assert_eq!(value, "a");
    }

    #[test]
    fn entry_and_modify() {
        let mut table: HashTable<u64> = HashTable::new();
        assert_eq!(table.entry(4, |&v| v == 4).and_modify(|v| *v += 1), None);
        table.entry(4, |&v| v == 4).or_insert(4);
        assert_eq!(table.entry(4, |&v| v == 4).and_modify(|v| *v += 1), Some(&mut 5));
    }

    #[test]
    fn entry_into_mut_and_remove() {
        let mut table: HashTable<Vec<i32>> = HashTable::new();
        table.entry(9, |v| v.is_empty()).or_default().push(1);
        match table.entry(9, |v| v == &vec![1]) {
            Entry::Occupied(entry) => entry.into_mut().push(2),
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        match table.entry(9, |v| v == &vec![1, 2]) {
            Entry::Occupied(entry) => assert_eq!(entry.remove(), vec![1, 2]),
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert!(table.is_empty());
    }

    #[test]
    fn retain_removes_and_bumps_version() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in 0..20u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        let version = table.version();
        table.retain(|v| *v % 4 == 0);
        assert_eq!(table.len(), 5);
        assert_ne!(table.version(), version);

        let version = table.version();
        table.retain(|_| true);
        assert_eq!(table.version(), version);
    }

    #[test]
    fn test_clone() {
        let state = HashState::default();
        let mut table: HashTable<Item> = HashTable::new();
        for k in 0..200u64 {
            insert_item(&mut table, &state, k, k as i32);
        }

        let mut copy = table.clone();
        assert_eq!(copy.len(), table.len());
        assert_eq!(copy.bucket_count(), table.bucket_count());
        let original: Vec<&Item> = table.iter().collect();
        let cloned: Vec<&Item> = copy.iter().collect();
        assert_eq!(original, cloned, "clone preserves bucket layout");

        insert_item(&mut copy, &state, 1_000, 0);
        assert_eq!(copy.len(), table.len() + 1);
        assert!(table.find(hash_key(&state, 1_000), |v| v.key == 1_000).is_none());
    }

    #[test]
    fn reserve_avoids_rehash() {
        let mut table: HashTable<u64> = HashTable::new();
        table.reserve(10_000);
        let buckets = table.bucket_count();
        assert!(table.capacity() >= 10_000);
        for k in 0..10_000u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }
        assert_eq!(table.bucket_count(), buckets);
    }

    #[test]
    fn with_capacity_rounds_up() {
        let table: HashTable<u64> = HashTable::with_capacity(0);
        assert_eq!(table.bucket_count(), INITIAL_BUCKET_COUNT);
        let table: HashTable<u64> = HashTable::with_capacity(5_000);
        assert!(table.capacity() >= 5_000);
    }

    #[test]
    fn cursor_visits_every_value_once() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in [40u64, 20, 10, 30] {
            table.entry(k, |&v| v == k).or_insert(k);
        }

        let mut cursor = table.cursor();
        let mut seen = Vec::new();
        while let Some(v) = cursor.next(&table).unwrap() {
            seen.push(*v);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![10, 20, 30, 40]);
        assert!(cursor.next(&table).unwrap().is_none());
    }

    #[test]
    fn cursor_detects_structural_changes() {
        let mut table: HashTable<u64> = HashTable::new();
        for k in 0..10u64 {
            table.entry(k, |&v| v == k).or_insert(k);
        }

        let mut cursor = table.cursor();
        cursor.next(&table).unwrap();
        table.entry(100, |&v| v == 100).or_insert(100);
        assert!(!cursor.is_valid_for(&table));
        assert!(matches!(cursor.next(&table), Err(Error::ConcurrentModification)));

        let mut cursor = table.cursor();
        table.clear();
        assert!(matches!(cursor.next(&table), Err(Error::ConcurrentModification)));
    }

    #[test]
    fn cursor_rejects_other_tables() {
        let small: HashTable<u64> = HashTable::new();
        let mut large: HashTable<u64> = HashTable::with_capacity(1_000);
        assert_eq!(small.version(), large.version());

        let mut cursor = small.cursor();
        assert!(!cursor.is_valid_for(&large));
        assert!(matches!(cursor.next(&large), Err(Error::ConcurrentModification)));

        let twin: HashTable<u64> = HashTable::new();
        let mut cursor = twin.cursor();
        assert!(matches!(cursor.next(&small), Err(Error::ConcurrentModification)));
        assert!(cursor.next(&twin).unwrap().is_none());

        large.entry(7, |&v| v == 7).or_insert(7);
        let copy = large.clone();
        let mut cursor = large.cursor();
        assert_eq!(cursor.next(&copy).unwrap(), Some(&7));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_overflow_panics() {
        let mut table: HashTable<u64> = HashTable::new();
        table.entry(1, |&v| v == 1).or_insert(1);
        table.reserve(usize::MAX);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn with_capacity_overflow_panics() {
        let _table: HashTable<u64> = HashTable::with_capacity(usize::MAX);
    }

    #[test]
    fn cursor_tolerates_value_updates() {
        let mut table: HashTable<Item> = HashTable::new();
        table.entry(1, |v| v.key == 1).or_insert(Item { key: 1, value: 0 });

        let mut cursor = table.cursor();
        if let Some(item) = table.find_mut(1, |v| v.key == 1) {
            item.value = 5;
        }
        assert_eq!(cursor.next(&table).unwrap().map(|v| v.value), Some(5));
    }
}
