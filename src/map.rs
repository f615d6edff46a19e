use crate::error::Result;
use crate::raw::{self, MAX_CAPACITY};

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

/// The number of buckets a map starts with when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 20;

/// The default ratio of entries to buckets beyond which a map grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// A hash map keyed by primitive `i32` keys.
///
/// Keys are compared and bucketed as raw integers, without going through a
/// [`Hasher`](std::hash::Hasher). Collisions are resolved by chaining, and the
/// table grows to `2 * capacity + 1` buckets whenever a new key would exceed
/// `capacity * load_factor` entries. The table never shrinks on removal.
///
/// Iteration order is bucket order, which depends on the capacity and the
/// insertion history and should not be relied upon.
///
/// Mutation requires `&mut self`, so a map can not be modified while it is
/// being iterated. Sharing a map between threads requires external
/// synchronization, such as a [`Mutex`](std::sync::Mutex).
///
/// # Examples
///
/// ```
/// use intkey::IntObjMap;
///
/// let mut map = IntObjMap::new();
/// map.insert(5, "a");
/// map.insert(5, "b");
///
/// assert_eq!(map.get(5), Some(&"b"));
/// assert_eq!(map.len(), 1);
/// ```
pub struct IntObjMap<V> {
    raw: raw::Table<V>,
}

/// A builder for an [`IntObjMap`].
///
/// # Examples
///
/// ```rust
/// use intkey::IntObjMap;
///
/// let map: IntObjMap<String> = IntObjMap::builder()
///     // Set the initial number of buckets.
///     .capacity(64)
///     // Set the ratio of entries to buckets that triggers growth.
///     .load_factor(0.5)
///     // Construct the map.
///     .build()
///     .unwrap();
///
/// assert_eq!(map.capacity(), 64);
/// ```
pub struct IntObjMapBuilder<V> {
    capacity: usize,
    load_factor: f64,
    _values: PhantomData<V>,
}

impl<V> IntObjMapBuilder<V> {
    /// Set the initial number of buckets of the map.
    ///
    /// A capacity of `0` is rounded up to a single bucket.
    pub fn capacity(self, capacity: usize) -> IntObjMapBuilder<V> {
        IntObjMapBuilder { capacity, ..self }
    }

    /// Set the load factor of the map.
    ///
    /// The map grows when inserting a new key while it holds
    /// `capacity * load_factor` entries. Load factors above `1.0` are allowed
    /// and trade longer chains for fewer buckets.
    pub fn load_factor(self, load_factor: f64) -> IntObjMapBuilder<V> {
        IntObjMapBuilder {
            load_factor,
            ..self
        }
    }

    /// Construct an [`IntObjMap`] from the builder, using the configured options.
    ///
    /// Returns an error if the load factor is not a positive finite number or
    /// the capacity exceeds the largest supported table.
    pub fn build(self) -> Result<IntObjMap<V>> {
        Ok(IntObjMap {
            raw: raw::Table::new(self.capacity, self.load_factor)?,
        })
    }
}

impl<V> Default for IntObjMapBuilder<V> {
    fn default() -> Self {
        IntObjMapBuilder {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            _values: PhantomData,
        }
    }
}

impl<V> Clone for IntObjMapBuilder<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for IntObjMapBuilder<V> {}

impl<V> fmt::Debug for IntObjMapBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntObjMapBuilder")
            .field("capacity", &self.capacity)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<V> IntObjMap<V> {
    /// Creates an empty `IntObjMap` with the default capacity and load factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    /// let map: IntObjMap<&str> = IntObjMap::new();
    /// ```
    pub fn new() -> IntObjMap<V> {
        IntObjMap::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty `IntObjMap` with the specified number of buckets and
    /// the default load factor.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the largest supported table.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    /// let map: IntObjMap<&str> = IntObjMap::with_capacity(10);
    /// ```
    pub fn with_capacity(capacity: usize) -> IntObjMap<V> {
        assert!(capacity <= MAX_CAPACITY, "capacity overflow");

        match IntObjMap::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR) {
            Ok(map) => map,
            Err(err) => unreachable!("{err}"),
        }
    }

    /// Creates an empty `IntObjMap` with the specified number of buckets and
    /// load factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::{Error, IntObjMap};
    ///
    /// let map = IntObjMap::<u8>::with_capacity_and_load_factor(16, 0.75);
    /// assert!(map.is_ok());
    ///
    /// let map = IntObjMap::<u8>::with_capacity_and_load_factor(16, 0.0);
    /// assert_eq!(map.unwrap_err(), Error::InvalidLoadFactor(0.0));
    /// ```
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f64) -> Result<IntObjMap<V>> {
        IntObjMap::builder()
            .capacity(capacity)
            .load_factor(load_factor)
            .build()
    }

    /// Returns a builder for an `IntObjMap`.
    pub fn builder() -> IntObjMapBuilder<V> {
        IntObjMapBuilder::default()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map is empty. Otherwise returns `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the load factor the map was configured with.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.raw.load_factor()
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(-1, "a");
    /// assert!(map.contains_key(-1));
    /// assert!(!map.contains_key(1));
    /// ```
    #[inline]
    pub fn contains_key(&self, key: i32) -> bool {
        self.raw.get(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(1), Some(&"a"));
    /// assert_eq!(map.get(2), None);
    /// ```
    #[inline]
    pub fn get(&self, key: i32) -> Option<&V> {
        self.raw.get(key).map(|entry| &entry.value)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[inline]
    pub fn get_key_value(&self, key: i32) -> Option<(i32, &V)> {
        self.raw.get(key).map(|entry| (entry.key, &entry.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(1, vec![1]);
    /// if let Some(list) = map.get_mut(1) {
    ///     list.push(2);
    /// }
    /// assert_eq!(map[1], [1, 2]);
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: i32) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, [`None`] is returned and the
    /// map may grow. If the map did have this key present, the value is
    /// updated in place and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(37), Some(&"b"));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: i32, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Returns a mutable reference to the value corresponding to the key, or
    /// inserts the value computed by `f` if the key is absent.
    ///
    /// `f` is called at most once, and only if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.get_or_insert_with(3, Vec::new).push('a');
    /// map.get_or_insert_with(3, Vec::new).push('b');
    /// assert_eq!(map[3], ['a', 'b']);
    /// ```
    #[inline]
    pub fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.raw.get_or_insert_with(key, f)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// The map keeps its capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(1), Some("a"));
    /// assert_eq!(map.remove(1), None);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: i32) -> Option<V> {
        self.raw.remove(key).map(|entry| entry.value)
    }

    /// Removes a key from the map, returning the stored key and value.
    #[inline]
    pub fn remove_entry(&mut self, key: i32) -> Option<(i32, V)> {
        self.raw.remove(key).map(|entry| (entry.key, entry.value))
    }

    /// Reserves capacity for at least `additional` more entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map: IntObjMap<&str> = IntObjMap::new();
    /// map.reserve(100);
    /// assert!(map.capacity() as f64 * map.load_factor() >= 100.0);
    /// ```
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional)
    }

    /// Clears the map, removing all key-value pairs.
    ///
    /// The map keeps its capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map: IntObjMap<i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|key, _| key % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    #[inline]
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(i32, &mut V) -> bool,
    {
        self.raw.retain(f)
    }

    /// An iterator visiting all key-value pairs in bucket order.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let map = IntObjMap::from([(1, "a"), (2, "b"), (3, "c")]);
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(1, &"a"), (2, &"b"), (3, &"c")]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            raw: self.raw.iter(),
        }
    }

    /// An iterator visiting all key-value pairs in bucket order, with mutable
    /// references to the values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            raw: self.raw.iter_mut(),
        }
    }

    /// An iterator visiting all keys in bucket order.
    ///
    /// Collect it to take a snapshot of the keys:
    ///
    /// ```
    /// use intkey::IntObjMap;
    ///
    /// let mut map = IntObjMap::from([(1, "a"), (2, "b")]);
    /// let keys: Vec<i32> = map.keys().collect();
    /// for key in keys {
    ///     map.remove(key);
    /// }
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            raw: self.raw.iter(),
        }
    }

    /// An iterator visiting all values in bucket order.
    #[inline]
    pub fn values(&self) -> Values<'_, V> {
        Values {
            raw: self.raw.iter(),
        }
    }

    /// An iterator visiting all values mutably in bucket order.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut {
            raw: self.raw.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// If the iterator is dropped before being fully consumed, the remaining
    /// key-value pairs are dropped.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            raw: self.raw.drain(),
        }
    }

    /// Returns the first key in iteration order.
    #[inline]
    pub fn first_key(&self) -> Option<i32> {
        self.keys().next()
    }

    /// Returns `true` if some key maps to the given value.
    ///
    /// This walks every bucket, and is much slower than [`contains_key`].
    ///
    /// [`contains_key`]: IntObjMap::contains_key
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn raw(&self) -> &raw::Table<V> {
        &self.raw
    }
}

impl<V> Default for IntObjMap<V> {
    fn default() -> Self {
        IntObjMap::new()
    }
}

impl<V> Clone for IntObjMap<V>
where
    V: Clone,
{
    fn clone(&self) -> IntObjMap<V> {
        IntObjMap {
            raw: self.raw.clone(),
        }
    }
}

impl<V> PartialEq for IntObjMap<V>
where
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|v| *value == *v))
    }
}

impl<V> Eq for IntObjMap<V> where V: Eq {}

impl<V> fmt::Debug for IntObjMap<V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Index<i32> for IntObjMap<V> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: i32) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<V> Extend<(i32, V)> for IntObjMap<V> {
    fn extend<T: IntoIterator<Item = (i32, V)>>(&mut self, iter: T) {
        // Keys may be already present or show multiple times in the iterator.
        // Reserve the entire hint lower bound if the map is empty.
        // Otherwise reserve half the hint (rounded up), so the map
        // will only resize twice in the worst case.
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };

        self.reserve(reserve);

        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, V> Extend<(i32, &'a V)> for IntObjMap<V>
where
    V: Copy + 'a,
{
    fn extend<T: IntoIterator<Item = (i32, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(key, &value)| (key, value)));
    }
}

impl<V, const N: usize> From<[(i32, V); N]> for IntObjMap<V> {
    fn from(arr: [(i32, V); N]) -> Self {
        IntObjMap::from_iter(arr)
    }
}

impl<V> FromIterator<(i32, V)> for IntObjMap<V> {
    fn from_iter<T: IntoIterator<Item = (i32, V)>>(iter: T) -> Self {
        let mut map = IntObjMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, V> IntoIterator for &'a IntObjMap<V> {
    type Item = (i32, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut IntObjMap<V> {
    type Item = (i32, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<V> IntoIterator for IntObjMap<V> {
    type Item = (i32, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            raw: self.raw.into_iter(),
        }
    }
}

/// An iterator over a map's entries.
///
/// See [`IntObjMap::iter`] for details.
pub struct Iter<'a, V> {
    raw: raw::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i32, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|entry| (entry.key, &entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    #[inline]
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
        }
    }
}

impl<V> fmt::Debug for Iter<'_, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over a map's entries.
///
/// See [`IntObjMap::iter_mut`] for details.
pub struct IterMut<'a, V> {
    raw: raw::IterMut<'a, V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i32, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// An iterator over a map's keys.
///
/// See [`IntObjMap::keys`] for details.
pub struct Keys<'a, V> {
    raw: raw::Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = i32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|entry| entry.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> Clone for Keys<'_, V> {
    #[inline]
    fn clone(&self) -> Self {
        Keys {
            raw: self.raw.clone(),
        }
    }
}

impl<V> fmt::Debug for Keys<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a map's values.
///
/// See [`IntObjMap::values`] for details.
pub struct Values<'a, V> {
    raw: raw::Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|entry| &entry.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> Clone for Values<'_, V> {
    #[inline]
    fn clone(&self) -> Self {
        Values {
            raw: self.raw.clone(),
        }
    }
}

impl<V> fmt::Debug for Values<'_, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over a map's values.
pub struct ValuesMut<'a, V> {
    raw: raw::IterMut<'a, V>,
}

impl<'a, V> Iterator for ValuesMut<'a, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for ValuesMut<'_, V> {}

/// An owning iterator over a map's entries.
pub struct IntoIter<V> {
    raw: raw::IntoIter<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (i32, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|entry| (entry.key, entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

/// A draining iterator over a map's entries.
///
/// See [`IntObjMap::drain`] for details.
pub struct Drain<'a, V> {
    raw: raw::Drain<'a, V>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (i32, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|entry| (entry.key, entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
