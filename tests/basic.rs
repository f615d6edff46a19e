use intkey::{Error, IntObjMap, MAX_CAPACITY};

use std::mem;
use std::sync::{Arc, Mutex};

mod common;
use common::with_map;

#[test]
fn new() {
    with_map::<usize>(|map| drop(map()));
}

#[test]
fn invalid_config() {
    assert_eq!(
        IntObjMap::<u8>::with_capacity_and_load_factor(8, -0.5).unwrap_err(),
        Error::InvalidLoadFactor(-0.5)
    );
    assert!(IntObjMap::<u8>::builder()
        .load_factor(f64::NAN)
        .build()
        .is_err());
    assert_eq!(
        IntObjMap::<u8>::builder()
            .capacity(MAX_CAPACITY + 1)
            .build()
            .unwrap_err(),
        Error::CapacityOverflow {
            requested: MAX_CAPACITY + 1,
            max: MAX_CAPACITY
        }
    );
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn with_capacity_overflow() {
    let _ = IntObjMap::<u8>::with_capacity(MAX_CAPACITY + 1);
}

#[test]
fn clear() {
    with_map::<usize>(|map| {
        let mut map = map();
        for key in 0..5 {
            map.insert(key, 1);
        }
        let capacity = map.capacity();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), capacity);
        assert!(map.get(3).is_none());
    });
}

#[test]
fn insert() {
    with_map::<usize>(|map| {
        let mut map = map();
        let old = map.insert(42, 0);
        assert!(old.is_none());
    });
}

#[test]
fn get_empty() {
    with_map::<usize>(|map| {
        let map = map();
        assert!(map.get(42).is_none());
        assert!(!map.contains_key(42));
    });
}

#[test]
fn get_key_value_empty() {
    with_map::<usize>(|map| {
        let map = map();
        assert!(map.get_key_value(42).is_none());
    });
}

#[test]
fn remove_empty() {
    with_map::<usize>(|map| {
        let mut map = map();
        assert!(map.remove(42).is_none());
        assert_eq!(map.len(), 0);
    });
}

#[test]
fn insert_and_remove() {
    with_map::<usize>(|map| {
        let mut map = map();
        map.insert(42, 0);
        let old = map.remove(42).unwrap();
        assert_eq!(old, 0);
        assert!(map.get(42).is_none());
        assert!(!map.contains_key(42));
        assert_eq!(map.len(), 0);
    });
}

#[test]
fn insert_and_get() {
    with_map::<usize>(|map| {
        let mut map = map();
        map.insert(42, 0);
        assert_eq!(map.get(42), Some(&0));
    });
}

#[test]
fn insert_and_get_key_value() {
    with_map::<usize>(|map| {
        let mut map = map();
        map.insert(42, 0);
        assert_eq!(map.get_key_value(42), Some((42, &0)));
    });
}

#[test]
fn reinsert() {
    with_map::<&str>(|map| {
        let mut map = map();
        map.insert(5, "a");
        let len = map.len();

        let old = map.insert(5, "b");
        assert_eq!(old, Some("a"));
        assert_eq!(map.get(5), Some(&"b"));
        assert_eq!(map.len(), len);
        assert_eq!(map.len(), 1);
    });
}

#[test]
fn remove_decrements_len() {
    with_map::<usize>(|map| {
        let mut map = map();
        for key in 0..10 {
            map.insert(key, key as usize);
        }

        assert_eq!(map.remove(4), Some(4));
        assert_eq!(map.len(), 9);
        assert!(!map.contains_key(4));

        assert_eq!(map.remove(4), None);
        assert_eq!(map.len(), 9);
    });
}

#[test]
fn remove_does_not_shrink() {
    with_map::<usize>(|map| {
        let mut map = map();
        for key in 0..200 {
            map.insert(key, 0);
        }
        let capacity = map.capacity();

        for key in 0..200 {
            map.remove(key);
        }
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
    });
}

#[test]
fn negative_keys() {
    with_map::<i64>(|map| {
        let mut map = map();
        let keys = [i32::MIN, i32::MIN + 1, -1_000_000, -2, -1, 0, 1, i32::MAX];

        for key in keys {
            map.insert(key, key as i64 * 2);
        }
        assert_eq!(map.len(), keys.len());

        for key in keys {
            assert_eq!(map.get(key), Some(&(key as i64 * 2)));
        }

        // `i32::MAX` and `-1` share a bucket once the sign bit is masked off.
        assert_eq!(map.remove(-1), Some(-2));
        assert_eq!(map.get(i32::MAX), Some(&(i32::MAX as i64 * 2)));
    });
}

#[test]
fn grows_past_threshold() {
    let mut map = IntObjMap::with_capacity_and_load_factor(16, 0.75).unwrap();
    for key in 0..=1000 {
        map.insert(key, key.to_string());
    }

    assert_eq!(map.len(), 1001);
    assert!(map.capacity() > 16);
    assert!(map.len() as f64 <= map.capacity() as f64 * map.load_factor());

    for key in 0..=1000 {
        assert_eq!(map.get(key), Some(&key.to_string()));
    }
}

#[test]
fn growth_sequence() {
    let mut map = IntObjMap::with_capacity_and_load_factor(16, 0.75).unwrap();
    let mut capacities = vec![map.capacity()];

    for key in 0..100 {
        map.insert(key, ());
        if *capacities.last().unwrap() != map.capacity() {
            capacities.push(map.capacity());
        }
    }

    assert_eq!(capacities, [16, 33, 67, 135]);
}

#[test]
fn get_mut() {
    with_map::<Vec<u8>>(|map| {
        let mut map = map();
        map.insert(1, vec![1]);

        map.get_mut(1).unwrap().push(2);
        assert_eq!(map[1], [1, 2]);
        assert!(map.get_mut(2).is_none());
    });
}

#[test]
fn get_or_insert_with() {
    with_map::<usize>(|map| {
        let mut map = map();
        let mut calls = 0;

        for _ in 0..3 {
            *map.get_or_insert_with(7, || {
                calls += 1;
                10
            }) += 1;
        }

        assert_eq!(calls, 1);
        assert_eq!(map.get(7), Some(&13));
    });
}

#[test]
fn contains_value() {
    with_map::<&str>(|map| {
        let mut map = map();
        map.insert(1, "a");
        map.insert(2, "b");

        assert!(map.contains_value(&"b"));
        assert!(!map.contains_value(&"c"));

        map.remove(2);
        assert!(!map.contains_value(&"b"));
    });
}

#[test]
fn first_key() {
    with_map::<()>(|map| {
        let mut map = map();
        assert_eq!(map.first_key(), None);

        map.insert(9, ());
        assert_eq!(map.first_key(), Some(9));

        map.insert(3, ());
        let first = map.first_key().unwrap();
        assert_eq!(Some(first), map.keys().next());
    });
}

#[test]
fn iter() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in -50..50 {
            map.insert(i, (i + 50) as usize);
        }

        assert_eq!(map.iter().len(), 100);

        let mut entries: Vec<_> = map.iter().map(|(k, &v)| (k, v)).collect();
        entries.sort();
        let expected: Vec<_> = (-50..50).map(|i| (i, (i + 50) as usize)).collect();
        assert_eq!(entries, expected);
    });
}

#[test]
fn keys_and_values_snapshot() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in 0..20 {
            map.insert(i, i as usize * 3);
        }

        let mut keys: Vec<i32> = map.keys().collect();
        let mut values: Vec<usize> = map.values().copied().collect();

        // The snapshots are owned, so the map can change under them.
        map.clear();
        assert_eq!(keys.len(), 20);

        keys.sort();
        values.sort();
        assert_eq!(keys, (0..20).collect::<Vec<_>>());
        assert_eq!(values, (0..20).map(|i| i * 3).collect::<Vec<_>>());
    });
}

#[test]
fn iter_mut_and_values_mut() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in 0..10 {
            map.insert(i, 1);
        }

        for (key, value) in map.iter_mut() {
            *value += key as usize;
        }
        for value in map.values_mut() {
            *value *= 2;
        }

        for i in 0..10 {
            assert_eq!(map[i], (1 + i as usize) * 2);
        }
    });
}

#[test]
fn retain() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in 0..100 {
            map.insert(i, i as usize);
        }

        map.retain(|key, value| {
            *value += 1;
            key % 3 == 0
        });

        assert_eq!(map.len(), 34);
        for i in 0..100 {
            if i % 3 == 0 {
                assert_eq!(map.get(i), Some(&(i as usize + 1)));
            } else {
                assert!(!map.contains_key(i));
            }
        }
    });
}

#[test]
fn drain() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in 0..30 {
            map.insert(i, i as usize);
        }

        let mut drained: Vec<_> = map.drain().collect();
        drained.sort();
        assert_eq!(drained, (0..30).map(|i| (i, i as usize)).collect::<Vec<_>>());
        assert!(map.is_empty());

        map.insert(1, 1);
        assert_eq!(map.len(), 1);
    });
}

#[test]
fn leaked_drain_keeps_len_consistent() {
    with_map::<usize>(|map| {
        let mut map = map();
        for i in 0..10 {
            map.insert(i, i as usize);
        }

        mem::forget(map.drain());
        assert_eq!(map.len(), 10);
        assert_eq!(map.iter().count(), map.len());
        assert!(map.contains_key(3));

        let mut drain = map.drain();
        let (key, _) = drain.next().unwrap();
        assert_eq!(drain.len(), 9);
        mem::forget(drain);

        assert_eq!(map.len(), 9);
        assert!(!map.contains_key(key));
        assert_eq!(map.iter().count(), map.len());
        assert_eq!((0..10).filter(|&k| map.contains_key(k)).count(), map.len());

        map.drain();
        assert!(map.is_empty());
        assert!(!map.contains_key(3));
    });
}

#[test]
fn into_iter() {
    with_map::<String>(|map| {
        let mut map = map();
        for i in 0..10 {
            map.insert(i, i.to_string());
        }

        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[3], (3, "3".to_owned()));
    });
}

#[test]
fn extend_and_collect() {
    let mut map: IntObjMap<usize> = (0..10).map(|i| (i, i as usize)).collect();
    assert_eq!(map.len(), 10);

    map.extend((5..15).map(|i| (i, 100)));
    assert_eq!(map.len(), 15);
    assert_eq!(map[4], 4);
    assert_eq!(map[5], 100);

    let other = [1usize, 2];
    map.extend([(20, &other[0]), (21, &other[1])]);
    assert_eq!(map[21], 2);
}

#[test]
fn from_array() {
    let map = IntObjMap::from([(1, "a"), (2, "b"), (1, "c")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map[1], "c");
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing() {
    let map = IntObjMap::<u8>::new();
    let _ = map[3];
}

#[test]
fn clone_and_eq() {
    with_map::<String>(|map| {
        let mut map = map();
        for i in 0..50 {
            map.insert(i, format!("v{i}"));
        }

        let mut cloned = map.clone();
        assert_eq!(map, cloned);

        cloned.insert(0, "changed".to_owned());
        assert_ne!(map, cloned);
        assert_eq!(map[0], "v0");
    });
}

#[test]
fn eq_ignores_capacity() {
    let mut small = IntObjMap::with_capacity_and_load_factor(1, 4.0).unwrap();
    let mut large = IntObjMap::with_capacity(512);

    for i in 0..20 {
        small.insert(i, i);
        large.insert(19 - i, 19 - i);
    }

    assert_eq!(small, large);
    large.remove(0);
    assert_ne!(small, large);
}

#[test]
fn debug() {
    let mut map = IntObjMap::new();
    map.insert(1, "a");
    assert_eq!(format!("{map:?}"), r#"{1: "a"}"#);
}

#[test]
fn shared_behind_mutex() {
    let map = Arc::new(Mutex::new(IntObjMap::new()));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let map = map.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    map.lock().unwrap().insert(t * 100 + i, t);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let map = map.lock().unwrap();
    assert_eq!(map.len(), 400);
    for t in 0..4 {
        assert_eq!(map.get(t * 100 + 99), Some(&t));
    }
}

#[test]
fn drop_values() {
    #[allow(dead_code)]
    struct Counted(Arc<()>);

    let counter = Arc::new(());
    with_map::<Counted>(|map| {
        let mut map = map();
        for i in 0..64 {
            map.insert(i, Counted(counter.clone()));
        }

        // Overwrites and removals release the old values.
        map.insert(0, Counted(counter.clone()));
        map.remove(1);
        assert_eq!(Arc::strong_count(&counter), 1 + 63);

        map.clear();
        assert_eq!(Arc::strong_count(&counter), 1);

        for i in 0..64 {
            map.insert(i, Counted(counter.clone()));
        }
        let mut drain = map.drain();
        drain.next();
        drop(drain);
        assert_eq!(Arc::strong_count(&counter), 1);
    });
    assert_eq!(Arc::strong_count(&counter), 1);
}
