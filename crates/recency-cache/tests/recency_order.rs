use recency_cache::{BoundedRecencyCache, Error};

fn recency_order(cache: &BoundedRecencyCache<i32, &'static str>) -> Vec<i32> {
    cache.keys().copied().collect()
}

// the walkthrough from the interview question: capacity 3, touch 2, then
// insert a fourth key
#[test]
fn interview_walkthrough() {
    let mut cache = BoundedRecencyCache::new(3).unwrap();
    cache.put(1, "A");
    cache.put(2, "B");
    cache.put(3, "C");
    assert_eq!(recency_order(&cache), [1, 2, 3]);

    assert_eq!(cache.get(&2), Some(&"B"));
    assert_eq!(recency_order(&cache), [1, 3, 2]);

    cache.put(4, "D");
    assert_eq!(recency_order(&cache), [3, 2, 4]);
    assert_eq!(cache.get(&1), None);

    cache.put(3, "Z");
    assert_eq!(cache.len(), 3);
    assert_eq!(recency_order(&cache), [2, 4, 3]);
    assert_eq!(cache.get(&3), Some(&"Z"));

    cache.check_integrity().unwrap();
}

#[test]
fn put_then_get_round_trips() {
    let mut cache = BoundedRecencyCache::new(2).unwrap();
    for (key, value) in [(10, "ten"), (20, "twenty"), (30, "thirty"), (10, "TEN")] {
        cache.put(key, value);
        assert_eq!(cache.get(&key), Some(&value));
        assert!(cache.len() <= cache.capacity());
    }
}

#[test]
fn non_positive_capacity_is_rejected() {
    assert_eq!(
        BoundedRecencyCache::<i32, i32>::new(0).err(),
        Some(Error::InvalidCapacity)
    );
    assert_eq!(
        BoundedRecencyCache::<i32, i32>::new(-1).err(),
        Some(Error::InvalidCapacity)
    );
    assert_eq!(
        Error::InvalidCapacity.to_string(),
        "cache capacity must be a positive integer"
    );
}
