#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use recency_cache::BoundedRecencyCache;

#[derive(Arbitrary, Debug)]
enum Op {
    Get(u8),
    Put(u8, u16),
    Push(u8, u16),
    Peek(u8),
    Remove(u8),
    PopLru,
    Clear,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(capacity) = unstructured.int_in_range(1..=16_usize) else {
        return;
    };
    let mut cache = BoundedRecencyCache::new(capacity).unwrap();

    // least recently used first
    let mut model: Vec<(u8, u16)> = Vec::new();

    while !unstructured.is_empty() {
        let Ok(op) = Op::arbitrary(&mut unstructured) else {
            break;
        };
        let position = |model: &[(u8, u16)], key: u8| model.iter().position(|e| e.0 == key);

        match op {
            Op::Get(key) => {
                let expected = position(&model, key).map(|pos| {
                    let entry = model.remove(pos);
                    model.push(entry);
                    entry.1
                });
                assert_eq!(cache.get(&key).copied(), expected);
            }
            Op::Put(key, value) | Op::Push(key, value) => {
                let expected = if let Some(pos) = position(&model, key) {
                    Some(model.remove(pos))
                } else if model.len() == capacity {
                    Some(model.remove(0))
                } else {
                    None
                };
                model.push((key, value));
                if matches!(op, Op::Push(..)) {
                    assert_eq!(cache.push(key, value), expected);
                } else {
                    cache.put(key, value);
                }
            }
            Op::Peek(key) => {
                let expected = position(&model, key).map(|pos| model[pos].1);
                assert_eq!(cache.peek(&key).copied(), expected);
            }
            Op::Remove(key) => {
                let expected = position(&model, key).map(|pos| model.remove(pos).1);
                assert_eq!(cache.remove(&key), expected);
            }
            Op::PopLru => {
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0))
                };
                assert_eq!(cache.pop_lru(), expected);
            }
            Op::Clear => {
                model.clear();
                cache.clear();
            }
        }

        assert!(cache.len() <= capacity);
        cache.check_integrity().unwrap();
        assert!(cache.iter().map(|(k, v)| (*k, *v)).eq(model.iter().copied()));
    }
});
