use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::{BoundedRecencyCache, Result};

/// A [`BoundedRecencyCache`] that can be shared between threads.
///
/// A single lock covers both the entries and their recency order, and is
/// held for the whole of each call, so no caller can observe a half-applied
/// `get` or `put`. Lookups hand back clones since the lock is released
/// before returning.
#[derive(Debug)]
pub struct SharedRecencyCache<K, V> {
    cache: Mutex<BoundedRecencyCache<K, V>>,
}

impl<K: Clone, V: Clone> Clone for SharedRecencyCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Mutex::new(self.cache.lock().expect("cache").clone()),
        }
    }
}

impl<K, V> From<BoundedRecencyCache<K, V>> for SharedRecencyCache<K, V> {
    fn from(cache: BoundedRecencyCache<K, V>) -> Self {
        Self {
            cache: Mutex::new(cache),
        }
    }
}

impl<K: Clone + Hash + Eq, V> SharedRecencyCache<K, V> {
    pub fn new<C: TryInto<usize>>(capacity: C) -> Result<Self> {
        BoundedRecencyCache::new(capacity).map(Self::from)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        BoundedRecencyCache::with_capacity(capacity).into()
    }

    pub fn len(&self) -> usize {
        self.cache.lock().expect("cache").len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().expect("cache").is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().expect("cache").capacity()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.cache.lock().expect("cache").get(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().expect("cache").contains(key)
    }

    pub fn put(&self, key: K, value: V) {
        self.cache.lock().expect("cache").put(key, value);
    }

    pub fn push(&self, key: K, value: V) -> Option<(K, V)> {
        self.cache.lock().expect("cache").push(key, value)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().expect("cache").remove(key)
    }

    pub fn clear(&self) {
        self.cache.lock().expect("cache").clear();
    }

    /// Copies out the current entries, least recently used first.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let cache = self.cache.lock().expect("cache");
        cache
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn check_integrity(&self) -> Result<()> {
        self.cache.lock().expect("cache").check_integrity()
    }

    pub fn into_inner(self) -> BoundedRecencyCache<K, V> {
        self.cache.into_inner().expect("cache")
    }
}
