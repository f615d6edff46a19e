#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use intkey::{IntDoubleMap, IntObjMap};
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Insert(K, V),
    Remove(K),
    Get(K),
    Contains(K),
    Clear,
    Len,
    IsEmpty,
    Update(K, V),
    GetOrInsert(K, V),
    Retain(V),
    Reserve(u8),
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    capacity: u8,
    load_factor: u8,
    operations: Vec<Operation<i32, u32>>,
}

fn fuzz_obj_map(input: &FuzzInput) {
    let mut std_map = StdHashMap::new();
    let load_factor = f64::from(input.load_factor.max(1)) / 16.0;
    let Ok(mut map) =
        IntObjMap::with_capacity_and_load_factor(usize::from(input.capacity), load_factor)
    else {
        unreachable!("load factor {load_factor} is valid");
    };

    for op in &input.operations {
        match *op {
            Operation::Insert(k, v) => {
                assert_eq!(std_map.insert(k, v), map.insert(k, v));
            }
            Operation::Remove(k) => {
                assert_eq!(std_map.remove(&k), map.remove(k));
            }
            Operation::Get(k) => {
                assert_eq!(std_map.get(&k), map.get(k));
            }
            Operation::Contains(k) => {
                assert_eq!(std_map.contains_key(&k), map.contains_key(k));
            }
            Operation::Clear => {
                std_map.clear();
                map.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), map.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), map.is_empty());
            }
            Operation::Update(k, v) => {
                let std_result = std_map.get_mut(&k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                let result = map.get_mut(k).map(|e| {
                    *e = e.wrapping_add(v);
                    *e
                });
                assert_eq!(std_result, result);
            }
            Operation::GetOrInsert(k, v) => {
                let std_result = *std_map.entry(k).or_insert(v);
                let result = *map.get_or_insert_with(k, || v);
                assert_eq!(std_result, result);
            }
            Operation::Retain(v) => {
                std_map.retain(|_, e| *e > v);
                map.retain(|_, e| *e > v);
            }
            Operation::Reserve(n) => map.reserve(usize::from(n)),
        }
    }

    // Final consistency checks
    for (k, v) in std_map.iter() {
        assert_eq!(Some(v), map.get(*k));
    }
    assert_eq!(std_map.len(), map.len());
    assert_eq!(std_map.len(), map.iter().count());
}

fn fuzz_double_map(input: &FuzzInput) {
    let mut std_map = StdHashMap::new();
    let fill_factor = f64::from(input.load_factor % 15 + 1) / 16.0;
    let Ok(mut map) = IntDoubleMap::new(usize::from(input.capacity), fill_factor) else {
        unreachable!("fill factor {fill_factor} is valid");
    };

    for op in &input.operations {
        match *op {
            Operation::Insert(k, v) => {
                assert_eq!(std_map.insert(k, f64::from(v)), map.insert(k, f64::from(v)));
            }
            Operation::Remove(k) => {
                assert_eq!(std_map.remove(&k), map.remove(k));
            }
            Operation::Get(k) => {
                assert_eq!(std_map.get(&k).copied(), map.get(k));
            }
            Operation::Contains(k) => {
                assert_eq!(std_map.contains_key(&k), map.contains_key(k));
            }
            Operation::Clear => {
                std_map.clear();
                map.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), map.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), map.is_empty());
            }
            Operation::Update(k, v) => {
                let std_result = *std_map.entry(k).or_insert(0.0) + f64::from(v);
                std_map.insert(k, std_result);
                assert_eq!(std_result, map.add(k, f64::from(v)));
            }
            Operation::GetOrInsert(k, v) => {
                let std_result = *std_map.entry(k).or_insert(f64::from(v));
                let result = *map.get_or_insert_with(k, || f64::from(v));
                assert_eq!(std_result, result);
            }
            Operation::Retain(v) => {
                let v = f64::from(v);
                std_map.retain(|_, e| *e > v);
                map.retain(|_, e| e > v);
            }
            Operation::Reserve(_) => {}
        }
        assert!(map.len() < map.capacity());
    }

    for (k, v) in std_map.iter() {
        assert_eq!(Some(*v), map.get(*k));
    }
    assert_eq!(std_map.len(), map.len());
}

fuzz_target!(|data: FuzzInput| {
    fuzz_obj_map(&data);
    fuzz_double_map(&data);
});
