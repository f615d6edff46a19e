#![doc = include_str!("../README.md")]

mod default;
mod double;
mod error;
mod map;
mod raw;

#[cfg(feature = "rayon")]
mod rayon_impls;
#[cfg(feature = "serde")]
mod serde_impls;

pub use default::{DefaultIntDoubleMap, DefaultIntMap, DefaultValue, EntryCreator, IntStore};
pub use double::IntDoubleMap;
pub use error::{Error, Result};
pub use map::{IntObjMap, IntObjMapBuilder};
pub use raw::MAX_CAPACITY;

/// Iterator types of [`IntObjMap`].
pub mod obj_map {
    pub use crate::map::{
        Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut, DEFAULT_CAPACITY,
        DEFAULT_LOAD_FACTOR,
    };
}

/// Iterator types of [`IntDoubleMap`].
pub mod double_map {
    pub use crate::double::{Iter, Keys, Values, DEFAULT_CAPACITY, DEFAULT_FILL_FACTOR};
}

#[cfg(feature = "rayon")]
pub use rayon_impls::{DoubleParIter, ParIter};
