use core::borrow::Borrow;
use core::fmt::Debug;
use core::fmt::Display;
use core::str::FromStr;

use crate::error::Error;
use crate::error::Result;
use crate::hash_code::HashCode;
use crate::hash_code::HashOrder;
use crate::hash_code::hash_code_map;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::key_hasher::HashCodeKeys;
use crate::key_hasher::KeyHasher;
use crate::text;
use crate::text::ParseValue;
use crate::text::Scanner;

/// A hash map built on the separate-chaining [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs whose keys are compared with
/// `Eq` and hashed by the strategy `S`. The default strategy,
/// [`HashCodeKeys`], uses the key's [`HashCode`]; see
/// [`key_hasher`](crate::key_hasher) for the alternatives.
///
/// Iteration order is unspecified. Two maps holding the same entries compare
/// equal and have the same [`HashCode`] regardless of the order in which the
/// entries were inserted.
///
/// # Examples
///
/// ```rust
/// use chainlex::HashMap;
///
/// let mut ages = HashMap::new();
/// ages.insert("ada".to_string(), 36);
/// ages.insert("alan".to_string(), 41);
///
/// assert_eq!(ages.get("ada"), Some(&36));
/// assert_eq!(ages.get_or_default("grace"), 0);
/// assert_eq!(ages.len(), 2);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = HashCodeKeys> {
    table: HashTable<(K, V)>,
    hasher: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Writes the map as `{key:value, ...}`, each side in its `Debug` form.
///
/// ```rust
/// # use chainlex::HashMap;
/// #
/// let mut map = HashMap::new();
/// map.insert("one".to_string(), 1);
/// assert_eq!(map.to_string(), r#"{"one":1}"#);
/// ```
impl<K, V, S> Display for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        text::write_map(f, self.iter())
    }
}

impl<K, V> HashMap<K, V, HashCodeKeys> {
    /// Creates an empty map using the default [`HashCodeKeys`] strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(HashCodeKeys)
    }

    /// Creates an empty map that can hold `capacity` entries without
    /// rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, HashCodeKeys)
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with the given hash strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let by_len = |s: &&str| s.len() as u64;
    /// let mut map = HashMap::with_hasher(by_len);
    /// map.insert("four", 4);
    /// assert_eq!(map.get(&"four"), Some(&4));
    /// ```
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashTable::new(),
            hasher,
        }
    }

    /// Creates an empty map with the given capacity and hash strategy.
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

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns how many entries the map can hold before it rehashes.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets in the underlying table.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Removes all entries, keeping the allocated buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Returns an iterator over the entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut entries: Vec<_> = map.iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut keys: Vec<_> = map.keys().copied().collect();
    /// keys.sort();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// for v in map.values_mut() {
    ///     *v *= 10;
    /// }
    /// assert_eq!(map.get(&"a"), Some(&10));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut drained: Vec<_> = map.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [(1, "a"), (2, "b")]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| f(k, v));
    }

    /// Returns a version-checked [`Cursor`] over the entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::Error;
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    ///
    /// let mut cursor = map.cursor();
    /// map.insert(2, "b");
    /// assert!(matches!(cursor.next(&map), Err(Error::ConcurrentModification)));
    /// ```
    pub fn cursor(&self) -> Cursor {
        Cursor {
            inner: self.table.cursor(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq,
    S: KeyHasher<K>,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned. If it
    /// did, the value is updated and the old value is returned; the stored
    /// key is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, as long as
    /// the hash strategy agrees on both forms.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("x".to_string(), 1);
    /// assert_eq!(map.get("x"), Some(&1));
    /// assert_eq!(map.get("y"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns a copy of the value for `key`, or `V::default()` if the key is
    /// absent. The map is not modified.
    ///
    /// Use [`entry`](Self::entry)`(key).or_default()` to insert the default
    /// instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut counts: HashMap<&str, u32> = HashMap::new();
    /// assert_eq!(counts.get_or_default(&"missing"), 0);
    /// assert!(counts.is_empty());
    ///
    /// *counts.entry("seen").or_default() += 1;
    /// assert_eq!(counts.get_or_default(&"seen"), 1);
    /// ```
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        S: KeyHasher<Q>,
    {
        let hash = self.hasher.hash_key(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut words = HashMap::new();
    /// for w in ["a", "b", "a"] {
    ///     *words.entry(w).or_insert(0) += 1;
    /// }
    /// assert_eq!(words.get(&"a"), Some(&2));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hasher.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Adds every entry of `other`, overwriting values of keys already
    /// present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut a: HashMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    /// let b: HashMap<i32, &str> = [(2, "TWO"), (3, "three")].into_iter().collect();
    ///
    /// a.put_all(&b);
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(a.get(&2), Some(&"TWO"));
    /// ```
    pub fn put_all<S2>(&mut self, other: &HashMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        self.reserve(other.len());
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone());
        }
    }

    /// Removes every key of `other` whose value here equals the value in
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut a: HashMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    /// let b: HashMap<i32, &str> = [(1, "one"), (2, "deux")].into_iter().collect();
    ///
    /// a.remove_all(&b);
    /// assert!(!a.contains_key(&1));
    /// assert_eq!(a.get(&2), Some(&"two"));
    /// ```
    pub fn remove_all<S2>(&mut self, other: &HashMap<K, V, S2>)
    where
        V: PartialEq,
    {
        for (k, v) in other.iter() {
            let hash = self.hasher.hash_key(k);
            self.table.remove(hash, |(sk, sv)| sk == k && sv == v);
        }
    }

    /// Keeps only the entries that also appear, with an equal value, in
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chainlex::HashMap;
    /// #
    /// let mut a: HashMap<i32, &str> = [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
    /// let b: HashMap<i32, &str> = [(1, "one"), (2, "deux")].into_iter().collect();
    ///
    /// a.retain_all(&b);
    /// assert_eq!(a.len(), 1);
    /// assert_eq!(a.get(&1), Some(&"one"));
    /// ```
    pub fn retain_all<S2>(&mut self, other: &HashMap<K, V, S2>)
    where
        V: PartialEq,
        S2: KeyHasher<K>,
    {
        self.retain(|k, v| other.get(k) == Some(&*v));
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq,
    V: PartialEq,
    S: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Eq,
    V: Eq,
    S: KeyHasher<K>,
{
}

/// Order-insensitive: equal maps hash equal whatever their layout.
impl<K, V, S> HashCode for HashMap<K, V, S>
where
    K: HashCode,
    V: HashCode,
{
    fn hash_code(&self) -> u32 {
        hash_code_map(self.iter(), HashOrder::Insensitive)
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq,
    S: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Eq,
    S: KeyHasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> ParseValue for HashMap<K, V, S>
where
    K: Eq + ParseValue,
    V: ParseValue,
    S: KeyHasher<K> + Default,
{
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        let mut map = Self::default();
        scanner.parse_delimited('{', '}', |s| {
            let key = K::parse_value(s)?;
            s.expect(':')?;
            let value = V::parse_value(s)?;
            map.insert(key, value);
            Ok(())
        })?;
        Ok(map)
    }
}

/// Parses `{key:value, ...}`.
///
/// ```rust
/// # use chainlex::HashMap;
/// #
/// let map: HashMap<i32, bool> = "{1:true, 2:false}".parse().unwrap();
/// assert_eq!(map.get(&1), Some(&true));
/// ```
impl<K, V, S> FromStr for HashMap<K, V, S>
where
    K: Eq + ParseValue,
    V: ParseValue,
    S: KeyHasher<K> + Default,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        text::parse_str(s)
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in a map, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference. This is the auto-vivifying lookup.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value and returns the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A borrow-free, version-checked position in a [`HashMap`].
///
/// See [`HashTable::cursor`](crate::hash_table::HashTable::cursor).
#[derive(Clone, Copy, Debug)]
pub struct Cursor {
    inner: crate::hash_table::Cursor,
}

impl Cursor {
    /// Advances to the next entry, failing with
    /// [`Error::ConcurrentModification`] if `map` was structurally modified
    /// since the cursor was created.
    pub fn next<'a, K, V, S>(&mut self, map: &'a HashMap<K, V, S>) -> Result<Option<(&'a K, &'a V)>> {
        Ok(self.inner.next(&map.table)?.map(|(k, v)| (k, v)))
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A mutable iterator over the entries of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the entries of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
