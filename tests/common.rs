#![allow(dead_code)]

use intkey::{IntDoubleMap, IntObjMap};

// Run the test on different configurations of an `IntObjMap`.
pub fn with_map<V>(mut test: impl FnMut(&dyn Fn() -> IntObjMap<V>)) {
    // The default configuration.
    test(&(|| IntObjMap::new()));

    // A single bucket that must grow on the first insert.
    test(&(|| IntObjMap::with_capacity_and_load_factor(0, 0.75).unwrap()));

    // A load factor above one, to stress long chains.
    test(&(|| IntObjMap::with_capacity_and_load_factor(4, 8.0).unwrap()));

    // A sparse table that grows early.
    test(&(|| IntObjMap::with_capacity_and_load_factor(16, 0.25).unwrap()));
}

// Run the test on different configurations of an `IntDoubleMap`.
pub fn with_double_map(mut test: impl FnMut(&dyn Fn() -> IntDoubleMap)) {
    // The default configuration.
    test(&(|| IntDoubleMap::default()));

    // The smallest table, which grows on almost every insert.
    test(&(|| IntDoubleMap::new(0, 0.5).unwrap()));

    // A crowded table, to stress long probe runs.
    test(&(|| IntDoubleMap::new(4, 0.95).unwrap()));
}

// Prints a log message if `RUST_LOG=debug` is set.
#[macro_export]
macro_rules! debug {
    ($($x:tt)*) => {
        if std::env::var("RUST_LOG").as_deref() == Ok("debug") {
            println!($($x)*);
        }
    };
}

// Returns the number of operations to run in randomized tests.
pub fn operations() -> usize {
    if cfg!(miri) {
        500
    } else if cfg!(intkey_stress) {
        1_000_000
    } else {
        50_000
    }
}
