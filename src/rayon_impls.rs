//! Rayon parallel iterator implementations for the integer maps.
//!
//! Parallel iteration borrows the map immutably, so it can not overlap with
//! mutation.

use rayon::iter::plumbing::UnindexedConsumer;
use rayon::iter::{FilterMap, FlatMapIter, IntoParallelIterator, ParallelIterator};
use rayon::prelude::*;

use std::{fmt, iter, slice};

use crate::double::Slot;
use crate::raw::Entry;
use crate::{IntDoubleMap, IntObjMap};

type Bucket<V> = Vec<Entry<V>>;
type Pairs<'a, V> = iter::Map<slice::Iter<'a, Entry<V>>, fn(&'a Entry<V>) -> (i32, &'a V)>;

/// Implementation of `IntoParallelIterator` for `&IntObjMap`.
impl<'a, V> IntoParallelIterator for &'a IntObjMap<V>
where
    V: Sync,
{
    type Iter = ParIter<'a, V>;
    type Item = (i32, &'a V);

    fn into_par_iter(self) -> Self::Iter {
        let buckets = self.raw().buckets();
        ParIter {
            inner: buckets
                .par_iter()
                .flat_map_iter(pairs as fn(&'a Bucket<V>) -> Pairs<'a, V>),
        }
    }
}

fn pairs<'a, V>(bucket: &'a Bucket<V>) -> Pairs<'a, V> {
    bucket.iter().map(pair as fn(&'a Entry<V>) -> (i32, &'a V))
}

fn pair<V>(entry: &Entry<V>) -> (i32, &V) {
    (entry.key, &entry.value)
}

/// Parallel iterator over the entries of an [`IntObjMap`].
///
/// This struct is created by calling `par_iter()` on an `&IntObjMap`.
pub struct ParIter<'a, V>
where
    V: Sync,
{
    inner: FlatMapIter<rayon::slice::Iter<'a, Bucket<V>>, fn(&'a Bucket<V>) -> Pairs<'a, V>>,
}

impl<V> fmt::Debug for ParIter<'_, V>
where
    V: Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParIter").finish()
    }
}

impl<'a, V> ParallelIterator for ParIter<'a, V>
where
    V: Sync + 'a,
{
    type Item = (i32, &'a V);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.drive_unindexed(consumer)
    }
}

/// Implementation of `IntoParallelIterator` for `&IntDoubleMap`.
impl<'a> IntoParallelIterator for &'a IntDoubleMap {
    type Iter = DoubleParIter<'a>;
    type Item = (i32, f64);

    fn into_par_iter(self) -> Self::Iter {
        DoubleParIter {
            inner: self
                .slots()
                .par_iter()
                .filter_map(Slot::entry as fn(&'a Slot) -> Option<(i32, f64)>),
        }
    }
}

/// Parallel iterator over the entries of an [`IntDoubleMap`].
///
/// This struct is created by calling `par_iter()` on an `&IntDoubleMap`.
pub struct DoubleParIter<'a> {
    inner: FilterMap<rayon::slice::Iter<'a, Slot>, fn(&'a Slot) -> Option<(i32, f64)>>,
}

impl fmt::Debug for DoubleParIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleParIter").finish()
    }
}

impl ParallelIterator for DoubleParIter<'_> {
    type Item = (i32, f64);

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.drive_unindexed(consumer)
    }
}
