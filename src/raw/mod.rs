pub mod probe;

use std::{fmt, iter, mem, slice, vec};

use crate::error::{Error, Result};

pub use probe::MAX_CAPACITY;

// An entry in the hash-table.
#[derive(Clone)]
pub struct Entry<V> {
    /// The key for this entry.
    pub key: i32,

    /// The value for this entry.
    pub value: V,
}

/// A separately chained hash-table keyed by `i32`.
///
/// Each bucket owns a vector of the entries that hash to it. The table
/// grows to `2 * capacity + 1` buckets whenever a new key is inserted while
/// the entry count is at the threshold, and never shrinks.
#[derive(Clone)]
pub struct Table<V> {
    buckets: Box<[Vec<Entry<V>>]>,
    count: usize,
    threshold: usize,
    load_factor: f64,
}

impl<V> Table<V> {
    /// Creates an empty table, validating the configuration.
    pub fn new(capacity: usize, load_factor: f64) -> Result<Table<V>> {
        if !(load_factor > 0.0 && load_factor.is_finite()) {
            return Err(Error::InvalidLoadFactor(load_factor));
        }

        if capacity > MAX_CAPACITY {
            return Err(Error::CapacityOverflow {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }

        let capacity = capacity.max(1);

        Ok(Table {
            buckets: empty_buckets(capacity),
            count: 0,
            threshold: probe::threshold(capacity, load_factor),
            load_factor,
        })
    }

    /// Returns the number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of entries to buckets that triggers growth.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the number of entries the table holds before growing.
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the raw buckets of this table.
    #[inline]
    pub fn buckets(&self) -> &[Vec<Entry<V>>] {
        &self.buckets
    }

    #[inline]
    fn bucket(&self, key: i32) -> &[Entry<V>] {
        &self.buckets[probe::index_of(key, self.buckets.len())]
    }

    // Returns the bucket and position of a key.
    #[inline]
    fn find(&self, key: i32) -> Option<(usize, usize)> {
        let i = probe::index_of(key, self.buckets.len());
        self.buckets[i]
            .iter()
            .position(|entry| entry.key == key)
            .map(|pos| (i, pos))
    }

    /// Returns a reference to the entry corresponding to the key.
    #[inline]
    pub fn get(&self, key: i32) -> Option<&Entry<V>> {
        self.bucket(key).iter().find(|entry| entry.key == key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: i32) -> Option<&mut V> {
        let i = probe::index_of(key, self.buckets.len());
        self.buckets[i]
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    /// Inserts a key-value pair, returning the value it replaced.
    pub fn insert(&mut self, key: i32, value: V) -> Option<V> {
        if let Some(current) = self.get_mut(key) {
            return Some(mem::replace(current, value));
        }

        self.push(key, value);
        None
    }

    /// Returns the value of the key, inserting the value produced by `f` if
    /// the key is absent. `f` is only called on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let (i, pos) = match self.find(key) {
            Some(found) => found,
            None => self.push(key, f()),
        };

        &mut self.buckets[i][pos].value
    }

    // Adds an entry for a key that is known to be absent.
    //
    // The threshold is checked before the entry is counted, so a table
    // never holds more than `threshold` entries before growing.
    fn push(&mut self, key: i32, value: V) -> (usize, usize) {
        if self.count >= self.threshold {
            self.resize(probe::grown(self.capacity()));
        }

        let i = probe::index_of(key, self.buckets.len());
        let bucket = &mut self.buckets[i];
        bucket.push(Entry { key, value });
        self.count += 1;

        (i, bucket.len() - 1)
    }

    /// Removes a key from the table, returning its value.
    pub fn remove(&mut self, key: i32) -> Option<Entry<V>> {
        let (i, pos) = self.find(key)?;
        self.count -= 1;
        Some(self.buckets[i].swap_remove(pos))
    }

    /// Removes every entry, keeping the bucket array.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }

        self.count = 0;
    }

    /// Grows the table until `additional` more entries fit below the
    /// threshold.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.count.saturating_add(additional);

        let mut capacity = self.capacity();
        while probe::threshold(capacity, self.load_factor) < needed && capacity < MAX_CAPACITY {
            capacity = probe::grown(capacity);
        }

        if capacity != self.capacity() {
            self.resize(capacity);
        }
    }

    // Moves every entry into a new bucket array of the given capacity.
    fn resize(&mut self, capacity: usize) {
        if capacity == self.capacity() {
            // Already at the maximum capacity, chains get longer instead.
            self.threshold = usize::MAX;
            return;
        }

        let mut buckets = empty_buckets(capacity);
        let old = mem::take(&mut self.buckets);

        for entry in old.into_vec().into_iter().flatten() {
            buckets[probe::index_of(entry.key, capacity)].push(entry);
        }

        self.buckets = buckets;
        self.threshold = probe::threshold(capacity, self.load_factor);
    }

    /// Retains only the entries for which the predicate returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, &mut V) -> bool,
    {
        let mut count = 0;
        for bucket in self.buckets.iter_mut() {
            bucket.retain_mut(|entry| f(entry.key, &mut entry.value));
            count += bucket.len();
        }

        self.count = count;
    }

    /// Returns an iterator over the entries in bucket order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: [].iter(),
            remaining: self.count,
        }
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            remaining: self.count,
            buckets: self.buckets.iter_mut(),
            current: [].iter_mut(),
        }
    }

    /// Removes every entry, returning them through an iterator.
    ///
    /// Entries that are not consumed are dropped along with the iterator.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            buckets: self.buckets.iter_mut(),
            current: None,
            count: &mut self.count,
        }
    }
}

impl<V> IntoIterator for Table<V> {
    type Item = Entry<V>;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.count,
            buckets: self.buckets.into_vec().into_iter(),
            current: Vec::new().into_iter(),
        }
    }
}

impl<V> fmt::Debug for Table<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("count", &self.count)
            .field("capacity", &self.capacity())
            .field("threshold", &self.threshold)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

fn empty_buckets<V>(capacity: usize) -> Box<[Vec<Entry<V>>]> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

// An iterator over the entries of a table.
pub struct Iter<'a, V> {
    buckets: slice::Iter<'a, Vec<Entry<V>>>,
    current: slice::Iter<'a, Entry<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining -= 1;
                return Some(entry);
            }

            self.current = self.buckets.next()?.iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    #[inline]
    fn clone(&self) -> Self {
        Iter {
            buckets: self.buckets.clone(),
            current: self.current.clone(),
            remaining: self.remaining,
        }
    }
}

// A mutable iterator over the entries of a table.
pub struct IterMut<'a, V> {
    buckets: slice::IterMut<'a, Vec<Entry<V>>>,
    current: slice::IterMut<'a, Entry<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i32, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining -= 1;
                return Some((entry.key, &mut entry.value));
            }

            self.current = self.buckets.next()?.iter_mut();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

// An owned iterator over the entries of a table.
pub struct IntoIter<V> {
    buckets: vec::IntoIter<Vec<Entry<V>>>,
    current: vec::IntoIter<Entry<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = Entry<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                self.remaining -= 1;
                return Some(entry);
            }

            self.current = self.buckets.next()?.into_iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

// A draining iterator over the entries of a table.
//
// Entries are popped out of their bucket one at a time and the table count
// follows every pop, so the table stays consistent even if the iterator is
// leaked.
pub struct Drain<'a, V> {
    buckets: slice::IterMut<'a, Vec<Entry<V>>>,
    current: Option<&'a mut Vec<Entry<V>>>,
    count: &'a mut usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = Entry<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(|bucket| bucket.pop()) {
                *self.count -= 1;
                return Some(entry);
            }

            self.current = Some(self.buckets.next()?);
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.count, Some(*self.count))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        if let Some(bucket) = self.current.take() {
            bucket.clear();
        }

        for bucket in &mut self.buckets {
            bucket.clear();
        }

        *self.count = 0;
    }
}
