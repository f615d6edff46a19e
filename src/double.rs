use crate::error::{Error, Result};
use crate::raw::probe::{self, Probe};
use crate::raw::MAX_CAPACITY;

use std::{fmt, iter, mem, slice};

/// The number of entries an [`IntDoubleMap`] holds without growing when no
/// capacity is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// The default fill factor of an [`IntDoubleMap`].
pub const DEFAULT_FILL_FACTOR: f64 = 0.75;

// A cell of the slot array. The key and value of an entry always move
// together, so there is no reserved key marking a free slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Slot {
    Empty,
    Occupied { key: i32, value: f64 },
}

impl Slot {
    #[inline]
    pub(crate) fn entry(&self) -> Option<(i32, f64)> {
        match *self {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty => None,
        }
    }
}

/// A hash map from `i32` keys to `f64` values.
///
/// Entries are stored inline in a single power-of-two slot array and found by
/// linear probing, so no allocation happens per entry. The slot array doubles
/// when a new key would push the number of entries past
/// `slots * fill_factor`. Removal shifts later entries of the probe run back
/// instead of leaving tombstones.
///
/// Every `i32`, including `0`, is an ordinary key.
///
/// # Examples
///
/// ```
/// use intkey::IntDoubleMap;
///
/// let mut map = IntDoubleMap::new(16, 0.75).unwrap();
/// map.insert(0, 2.5);
/// assert_eq!(map.get(0), Some(2.5));
/// assert_eq!(map.get(1), None);
/// ```
#[derive(Clone)]
pub struct IntDoubleMap {
    slots: Box<[Slot]>,
    len: usize,
    threshold: usize,
    fill_factor: f64,
}

impl IntDoubleMap {
    /// Creates an empty map that holds at least `capacity` entries before
    /// growing.
    ///
    /// `fill_factor` is the largest ratio of entries to slots and must lie
    /// strictly between `0` and `1`: linear probing needs free slots to
    /// terminate.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::{Error, IntDoubleMap};
    ///
    /// assert!(IntDoubleMap::new(16, 0.5).is_ok());
    /// assert_eq!(
    ///     IntDoubleMap::new(16, 1.0).unwrap_err(),
    ///     Error::InvalidLoadFactor(1.0)
    /// );
    /// ```
    pub fn new(capacity: usize, fill_factor: f64) -> Result<IntDoubleMap> {
        if !(fill_factor > 0.0 && fill_factor < 1.0) {
            return Err(Error::InvalidLoadFactor(fill_factor));
        }

        let overflow = Error::CapacityOverflow {
            requested: capacity,
            max: MAX_CAPACITY,
        };

        if capacity > MAX_CAPACITY {
            return Err(overflow);
        }

        match probe::slots_for(capacity, fill_factor) {
            Some(slots) => Ok(IntDoubleMap::with_slots(slots, fill_factor)),
            None => Err(overflow),
        }
    }

    /// Creates an empty map that holds at least `capacity` entries before
    /// growing, with the default fill factor.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the largest supported table.
    pub fn with_capacity(capacity: usize) -> IntDoubleMap {
        match IntDoubleMap::new(capacity, DEFAULT_FILL_FACTOR) {
            Ok(map) => map,
            Err(_) => panic!("capacity overflow"),
        }
    }

    fn with_slots(slots: usize, fill_factor: f64) -> IntDoubleMap {
        IntDoubleMap {
            slots: empty_slots(slots),
            len: 0,
            threshold: probe::threshold(slots, fill_factor),
            fill_factor,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map is empty. Otherwise returns `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the map.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the largest ratio of entries to slots before the map grows.
    #[inline]
    pub fn fill_factor(&self) -> f64 {
        self.fill_factor
    }

    // Returns `Ok` with the slot holding the key, or `Err` with the empty
    // slot that ends its probe run.
    fn find(&self, key: i32) -> std::result::Result<usize, usize> {
        let mut probe = Probe::start(key, self.slots.len());

        loop {
            match self.slots[probe.i] {
                Slot::Empty => return Err(probe.i),
                Slot::Occupied { key: found, .. } if found == key => return Ok(probe.i),
                Slot::Occupied { .. } => probe.next(),
            }
        }
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key(&self, key: i32) -> bool {
        self.find(key).is_ok()
    }

    /// Returns the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntDoubleMap;
    ///
    /// let mut map = IntDoubleMap::default();
    /// map.insert(7, 0.5);
    /// assert_eq!(map.get(7), Some(0.5));
    /// assert_eq!(map.get(8), None);
    /// ```
    #[inline]
    pub fn get(&self, key: i32) -> Option<f64> {
        match self.find(key) {
            Ok(i) => value(&self.slots[i]),
            Err(_) => None,
        }
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, key: i32) -> Option<&mut f64> {
        match self.find(key) {
            Ok(i) => value_mut(&mut self.slots[i]),
            Err(_) => None,
        }
    }

    /// Inserts a key-value pair into the map, returning the previous value of
    /// the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntDoubleMap;
    ///
    /// let mut map = IntDoubleMap::default();
    /// assert_eq!(map.insert(1, 1.0), None);
    /// assert_eq!(map.insert(1, 2.0), Some(1.0));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i32, value: f64) -> Option<f64> {
        match self.find(key) {
            Ok(i) => value_mut(&mut self.slots[i]).map(|current| mem::replace(current, value)),
            Err(i) => {
                self.push(i, key, value);
                None
            }
        }
    }

    /// Returns a mutable reference to the value corresponding to the key, or
    /// inserts the value computed by `f` if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut f64
    where
        F: FnOnce() -> f64,
    {
        let i = match self.find(key) {
            Ok(i) => i,
            Err(i) => self.push(i, key, f()),
        };

        match &mut self.slots[i] {
            Slot::Occupied { value, .. } => value,
            Slot::Empty => unreachable!("slot {i} was just filled"),
        }
    }

    /// Adds `delta` to the value of a key, treating an absent key as `0.0`,
    /// and returns the new value.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntDoubleMap;
    ///
    /// let mut totals = IntDoubleMap::default();
    /// totals.add(3, 1.5);
    /// assert_eq!(totals.add(3, 2.0), 3.5);
    /// ```
    pub fn add(&mut self, key: i32, delta: f64) -> f64 {
        let value = self.get_or_insert_with(key, || 0.0);
        *value += delta;
        *value
    }

    // Fills an empty slot found by `find`, growing first if the map is at
    // its threshold. Returns the slot the entry ended up in.
    fn push(&mut self, empty: usize, key: i32, value: f64) -> usize {
        let mut i = empty;

        if self.len >= self.threshold {
            self.grow();
            i = self.vacant(key);
        }

        self.slots[i] = Slot::Occupied { key, value };
        self.len += 1;
        i
    }

    // Returns the first empty slot on the probe run of a key known to be
    // absent.
    fn vacant(&self, key: i32) -> usize {
        let mut probe = Probe::start(key, self.slots.len());
        while self.slots[probe.i] != Slot::Empty {
            probe.next();
        }
        probe.i
    }

    fn grow(&mut self) {
        let slots = self.slots.len() * 2;

        if slots > MAX_CAPACITY {
            // Keep filling the current table while at least one slot stays free.
            assert!(self.len + 1 < self.slots.len(), "capacity overflow");
            self.threshold = self.slots.len() - 1;
            return;
        }

        self.rehash(slots);
    }

    // Moves every entry into a new slot array of the given length.
    //
    // Entries move as whole key-value pairs, placed by probing the new array
    // directly rather than through `insert`.
    fn rehash(&mut self, slots: usize) {
        let old = mem::replace(&mut self.slots, empty_slots(slots));
        self.threshold = probe::threshold(slots, self.fill_factor);

        for slot in old.iter() {
            if let Slot::Occupied { key, .. } = *slot {
                let i = self.vacant(key);
                self.slots[i] = *slot;
            }
        }
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::IntDoubleMap;
    ///
    /// let mut map = IntDoubleMap::default();
    /// map.insert(0, 1.0);
    /// assert_eq!(map.remove(0), Some(1.0));
    /// assert_eq!(map.remove(0), None);
    /// assert!(!map.contains_key(0));
    /// ```
    pub fn remove(&mut self, key: i32) -> Option<f64> {
        let mut hole = self.find(key).ok()?;
        let removed = mem::replace(&mut self.slots[hole], Slot::Empty);
        self.len -= 1;

        // Shift back entries that probed past the removed slot, until the end
        // of the probe run.
        let len = self.slots.len();
        let mask = len - 1;
        let mut i = hole;

        loop {
            i = (i + 1) & mask;

            let key = match self.slots[i] {
                Slot::Empty => break,
                Slot::Occupied { key, .. } => key,
            };

            // The entry may move into the hole if the hole lies between its
            // home slot and its current slot.
            let home = probe::home(key, len);
            if hole.wrapping_sub(home) & mask < i.wrapping_sub(home) & mask {
                self.slots[hole] = mem::replace(&mut self.slots[i], Slot::Empty);
                hole = i;
            }
        }

        value(&removed)
    }

    /// Clears the map, keeping its slot array.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.len = 0;
    }

    /// Retains only the entries specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, f64) -> bool,
    {
        let len = self.slots.len();
        let old = mem::replace(&mut self.slots, empty_slots(len));
        self.len = 0;

        for slot in old.iter() {
            if let Slot::Occupied { key, value } = *slot {
                if f(key, value) {
                    let i = self.vacant(key);
                    self.slots[i] = *slot;
                    self.len += 1;
                }
            }
        }
    }

    /// Returns `true` if some key maps to the given value.
    ///
    /// Values are compared with `==`, so `NaN` is never found.
    pub fn contains_value(&self, value: f64) -> bool {
        self.values().any(|v| v == value)
    }

    /// An iterator visiting all key-value pairs in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// An iterator visiting all keys in slot order.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in slot order.
    #[inline]
    pub fn values(&self) -> Values<'_> {
        Values { iter: self.iter() }
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

#[inline]
fn value(slot: &Slot) -> Option<f64> {
    slot.entry().map(|(_, value)| value)
}

#[inline]
fn value_mut(slot: &mut Slot) -> Option<&mut f64> {
    match slot {
        Slot::Occupied { value, .. } => Some(value),
        Slot::Empty => None,
    }
}

fn empty_slots(len: usize) -> Box<[Slot]> {
    iter::repeat(Slot::Empty).take(len).collect()
}

impl Default for IntDoubleMap {
    fn default() -> Self {
        IntDoubleMap::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PartialEq for IntDoubleMap {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for IntDoubleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Extend<(i32, f64)> for IntDoubleMap {
    fn extend<T: IntoIterator<Item = (i32, f64)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<const N: usize> From<[(i32, f64); N]> for IntDoubleMap {
    fn from(arr: [(i32, f64); N]) -> Self {
        IntDoubleMap::from_iter(arr)
    }
}

impl FromIterator<(i32, f64)> for IntDoubleMap {
    fn from_iter<T: IntoIterator<Item = (i32, f64)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut map = IntDoubleMap::with_capacity(iter.size_hint().0.max(DEFAULT_CAPACITY));
        map.extend(iter);
        map
    }
}

impl<'a> IntoIterator for &'a IntDoubleMap {
    type Item = (i32, f64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of an [`IntDoubleMap`].
#[derive(Clone)]
pub struct Iter<'a> {
    slots: slice::Iter<'a, Slot>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i32, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of an [`IntDoubleMap`].
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    iter: Iter<'a>,
}

impl Iterator for Keys<'_> {
    type Item = i32;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

/// An iterator over the values of an [`IntDoubleMap`].
#[derive(Clone, Debug)]
pub struct Values<'a> {
    iter: Iter<'a>,
}

impl Iterator for Values<'_> {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
