use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::{IntDoubleMap, IntObjMap};

struct MapVisitor<V> {
    _marker: PhantomData<IntObjMap<V>>,
}

impl<V> Serialize for IntObjMap<V>
where
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, V> Deserialize<'de> for IntObjMap<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

impl<V> MapVisitor<V> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<'de, V> Visitor<'de> for MapVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = IntObjMap<V>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map with integer keys")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut values = IntObjMap::new();
        values.reserve(cautious(access.size_hint()));

        while let Some((key, value)) = access.next_entry::<i32, V>()? {
            values.insert(key, value);
        }

        Ok(values)
    }
}

// Caps a size hint from the input so a malicious length can not force a huge
// allocation up front.
fn cautious(hint: Option<usize>) -> usize {
    hint.unwrap_or(0).min(4096)
}

struct DoubleVisitor;

impl Serialize for IntDoubleMap {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de> Deserialize<'de> for IntDoubleMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DoubleVisitor)
    }
}

impl<'de> Visitor<'de> for DoubleVisitor {
    type Value = IntDoubleMap;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map from integers to floats")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut values = IntDoubleMap::with_capacity(cautious(access.size_hint()));

        while let Some((key, value)) = access.next_entry::<i32, f64>()? {
            values.insert(key, value);
        }

        Ok(values)
    }
}
