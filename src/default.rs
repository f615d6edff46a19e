use crate::double::IntDoubleMap;
use crate::map::IntObjMap;

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Produces the value stored for a key that is read before it was written.
///
/// The creator is invoked once per missing key. It may hand out clones of a
/// shared constant, or build a fresh value every time, such as a new empty
/// list per key.
///
/// Every `Fn() -> V` closure is a creator:
///
/// ```
/// use intkey::EntryCreator;
///
/// let creator = || vec![0u8; 4];
/// assert_eq!(creator.new_entry(), [0, 0, 0, 0]);
/// ```
pub trait EntryCreator<V> {
    /// Returns the value for a newly materialized key.
    fn new_entry(&self) -> V;
}

impl<V, F> EntryCreator<V> for F
where
    F: Fn() -> V,
{
    #[inline]
    fn new_entry(&self) -> V {
        self()
    }
}

/// A creator that clones a fixed value for every missing key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultValue<V>(pub V);

impl<V> EntryCreator<V> for DefaultValue<V>
where
    V: Clone,
{
    #[inline]
    fn new_entry(&self) -> V {
        self.0.clone()
    }
}

/// An integer-keyed map that a [`DefaultIntMap`] can populate.
pub trait IntStore {
    /// The type of values stored in the map.
    type Value;

    /// Returns the value of the key, inserting the result of `f` if the key
    /// is absent.
    fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut Self::Value
    where
        F: FnOnce() -> Self::Value;
}

impl<V> IntStore for IntObjMap<V> {
    type Value = V;

    #[inline]
    fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        IntObjMap::get_or_insert_with(self, key, f)
    }
}

impl IntStore for IntDoubleMap {
    type Value = f64;

    #[inline]
    fn get_or_insert_with<F>(&mut self, key: i32, f: F) -> &mut f64
    where
        F: FnOnce() -> f64,
    {
        IntDoubleMap::get_or_insert_with(self, key, f)
    }
}

/// A map that materializes a value for a missing key when it is read.
///
/// `DefaultIntMap` wraps an [`IntObjMap`] or an [`IntDoubleMap`] and adds
/// [`get_value`](DefaultIntMap::get_value), which never reports a key as
/// absent: on a miss it asks the [`EntryCreator`] for a value, stores it and
/// returns it. Reads through `get_value` therefore mutate the map.
///
/// The wrapped map is reachable through `Deref`, and keeps its own contract:
/// `get` still returns `None` for absent keys.
///
/// # Examples
///
/// ```
/// use intkey::DefaultIntMap;
///
/// let mut groups = DefaultIntMap::new(Vec::new);
/// groups.get_value(1).push("a");
/// groups.get_value(1).push("b");
/// groups.get_value(2).push("c");
///
/// assert_eq!(groups[1], ["a", "b"]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.get(3), None);
/// ```
#[derive(Clone)]
pub struct DefaultIntMap<M, C> {
    map: M,
    creator: C,
}

/// A [`DefaultIntMap`] over `f64` values.
pub type DefaultIntDoubleMap<C = DefaultValue<f64>> = DefaultIntMap<IntDoubleMap, C>;

impl<V, C> DefaultIntMap<IntObjMap<V>, C>
where
    C: EntryCreator<V>,
{
    /// Creates an empty map that fills missing keys using `creator`.
    pub fn new(creator: C) -> Self {
        DefaultIntMap::from_map(IntObjMap::new(), creator)
    }

    /// Creates an empty map with the given number of buckets that fills
    /// missing keys using `creator`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the largest supported table.
    pub fn with_capacity(capacity: usize, creator: C) -> Self {
        DefaultIntMap::from_map(IntObjMap::with_capacity(capacity), creator)
    }
}

impl<V> DefaultIntMap<IntObjMap<V>, DefaultValue<V>>
where
    V: Clone,
{
    /// Creates an empty map that fills missing keys with clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::DefaultIntMap;
    ///
    /// let mut counts = DefaultIntMap::with_value(0);
    /// *counts.get_value(7) += 1;
    /// *counts.get_value(7) += 1;
    /// assert_eq!(counts[7], 2);
    /// ```
    pub fn with_value(value: V) -> Self {
        DefaultIntMap::new(DefaultValue(value))
    }
}

impl DefaultIntMap<IntDoubleMap, DefaultValue<f64>> {
    /// Creates an empty `f64` map that fills missing keys with `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use intkey::DefaultIntDoubleMap;
    ///
    /// let mut scores = DefaultIntDoubleMap::doubles(1.0);
    /// *scores.get_value(0) *= 2.5;
    /// assert_eq!(scores.get(0), Some(2.5));
    /// ```
    pub fn doubles(value: f64) -> Self {
        DefaultIntMap::from_map(IntDoubleMap::default(), DefaultValue(value))
    }
}

impl<M, C> DefaultIntMap<M, C>
where
    M: IntStore,
    C: EntryCreator<M::Value>,
{
    /// Wraps an existing map. Keys already present keep their values.
    pub fn from_map(map: M, creator: C) -> Self {
        DefaultIntMap { map, creator }
    }

    /// Returns the value of the key, creating and storing it first if the key
    /// is absent.
    ///
    /// The creator is called exactly once for each missing key, so repeated
    /// calls for the same key return the same stored value.
    #[inline]
    pub fn get_value(&mut self, key: i32) -> &mut M::Value {
        let creator = &self.creator;
        self.map.get_or_insert_with(key, || creator.new_entry())
    }
}

impl<M, C> DefaultIntMap<M, C> {
    /// Returns the creator used for missing keys.
    #[inline]
    pub fn creator(&self) -> &C {
        &self.creator
    }

    /// Returns the wrapped map.
    #[inline]
    pub fn into_inner(self) -> M {
        self.map
    }

    /// Returns the wrapped map and the creator.
    #[inline]
    pub fn into_parts(self) -> (M, C) {
        (self.map, self.creator)
    }
}

impl<V> Default for DefaultIntMap<IntObjMap<V>, DefaultValue<V>>
where
    V: Clone + Default,
{
    fn default() -> Self {
        DefaultIntMap::with_value(V::default())
    }
}

impl<M, C> Deref for DefaultIntMap<M, C> {
    type Target = M;

    #[inline]
    fn deref(&self) -> &M {
        &self.map
    }
}

impl<M, C> DerefMut for DefaultIntMap<M, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut M {
        &mut self.map
    }
}

impl<M, C> fmt::Debug for DefaultIntMap<M, C>
where
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultIntMap")
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}
