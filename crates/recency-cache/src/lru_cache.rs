use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use crate::{Error, Result};

// index into the node arena
type Slot = usize;

// upper bound on what we reserve up front, large capacities grow on demand
const PREALLOCATE_LIMIT: usize = 1024;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<Slot>,
    next: Option<Slot>,
}

/// A fixed-capacity key-value store that evicts the least recently used
/// entry when a new key is inserted into a full cache.
///
/// Both `get` and `put` count as a use. Entries live in an arena of nodes
/// linked into a doubly-linked list ordered from least recently used (head)
/// to most recently used (tail). A side index maps every key to its slot in
/// the arena, so lookup, promotion and eviction are all O(1). Slots freed by
/// `remove` are reused by later inserts.
#[derive(Clone)]
pub struct BoundedRecencyCache<K, V> {
    capacity: NonZeroUsize,
    nodes: Vec<Option<Node<K, V>>>,
    index: HashMap<K, Slot>,
    free_slots: Vec<Slot>,
    head: Option<Slot>,
    tail: Option<Slot>,
}

impl<K, V> BoundedRecencyCache<K, V> {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.free_slots.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates over the entries from least to most recently used, without
    /// touching the recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.index.len(),
        }
    }

    /// The recency order, least recently used key first.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// The entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.entry_at(self.head?)
    }

    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.entry_at(self.tail?)
    }

    fn entry_at(&self, slot: Slot) -> Option<(&K, &V)> {
        let node = self.nodes.get(slot)?.as_ref()?;
        Some((&node.key, &node.value))
    }

    fn value_at(&self, slot: Slot) -> Option<&V> {
        self.nodes.get(slot)?.as_ref().map(|node| &node.value)
    }

    fn value_at_mut(&mut self, slot: Slot) -> Option<&mut V> {
        self.nodes.get_mut(slot)?.as_mut().map(|node| &mut node.value)
    }

    fn unlink(&mut self, slot: Slot) {
        let Some(node) = self.nodes[slot].as_mut() else {
            return;
        };
        let prev = node.prev.take();
        let next = node.next.take();

        if let Some(node) = prev.and_then(|p| self.nodes[p].as_mut()) {
            node.next = next;
        } else {
            self.head = next;
        }

        if let Some(node) = next.and_then(|n| self.nodes[n].as_mut()) {
            node.prev = prev;
        } else {
            self.tail = prev;
        }
    }

    // attach a detached slot at the most recently used end
    fn link_back(&mut self, slot: Slot) {
        let old_tail = self.tail;
        if let Some(node) = self.nodes[slot].as_mut() {
            node.prev = old_tail;
            node.next = None;
        }

        if let Some(node) = old_tail.and_then(|t| self.nodes[t].as_mut()) {
            node.next = Some(slot);
        } else {
            self.head = Some(slot);
        }
        self.tail = Some(slot);
    }

    fn promote(&mut self, slot: Slot) {
        if self.tail == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.link_back(slot);
    }

    fn allocate(&mut self, node: Node<K, V>) -> Slot {
        if let Some(slot) = self.free_slots.pop() {
            self.nodes[slot] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, slot: Slot) -> Option<Node<K, V>> {
        self.unlink(slot);
        let node = self.nodes[slot].take()?;
        self.free_slots.push(slot);
        Some(node)
    }
}

impl<K: Clone + Hash + Eq, V> BoundedRecencyCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with [`Error::InvalidCapacity`] when `capacity` is zero or
    /// negative (or does not fit in a `usize`).
    pub fn new<C: TryInto<usize>>(capacity: C) -> Result<Self> {
        let capacity = capacity
            .try_into()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(Error::InvalidCapacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let reserve = capacity.get().min(PREALLOCATE_LIMIT);
        Self {
            capacity,
            nodes: Vec::with_capacity(reserve),
            index: HashMap::with_capacity(reserve),
            free_slots: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Looks up `key` and marks it as the most recently used entry.
    ///
    /// A miss returns `None` and leaves the cache untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        self.value_at(slot)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        self.value_at_mut(slot)
    }

    /// Like `get`, but leaves the recency order alone.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value_at(*self.index.get(key)?)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites `key` and marks it as the most recently used
    /// entry, evicting the least recently used entry if the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Same as `put`, but hands back what left the cache: the evicted entry,
    /// or the key with its previous value when an existing key was
    /// overwritten.
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&slot) = self.index.get(&key) {
            self.promote(slot);
            let old = self
                .value_at_mut(slot)
                .map(|current| std::mem::replace(current, value));
            return old.map(|old| (key, old));
        }

        let evicted = if self.index.len() >= self.capacity.get() {
            log::trace!(
                "cache full at {} entries, evicting least recently used",
                self.capacity
            );
            self.pop_lru()
        } else {
            None
        };

        let slot = self.allocate(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.link_back(slot);
        self.index.insert(key, slot);
        evicted
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        log::trace!("removing entry in slot {slot}");
        self.release(slot).map(|node| node.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let node = self.release(self.head?)?;
        self.index.remove(&node.key);
        Some((node.key, node.value))
    }

    /// Walks the recency order and cross-checks it against the key index and
    /// the free slot list.
    pub fn check_integrity(&self) -> Result<()> {
        let len = self.index.len();
        if len > self.capacity.get() {
            return Err(Error::IntegrityOverCapacity(len, self.capacity.get()));
        }

        let mut visited: usize = 0;
        let mut prev: Option<Slot> = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if visited >= self.nodes.len() {
                return Err(Error::CycleFound);
            }
            let node = self
                .nodes
                .get(slot)
                .and_then(Option::as_ref)
                .ok_or(Error::IntegrityEmptySlot(slot))?;
            if node.prev != prev {
                return Err(Error::IntegrityBrokenBackLink(slot));
            }
            if self.index.get(&node.key) != Some(&slot) {
                return Err(Error::IntegrityKeyToSlotMismatch(slot));
            }
            visited += 1;
            prev = Some(slot);
            cursor = node.next;
        }

        if prev != self.tail {
            return Err(Error::IntegrityTailMismatch);
        }
        if visited != len {
            return Err(Error::IntegrityOrderLength(visited, len));
        }

        for &slot in &self.free_slots {
            if self.nodes.get(slot).is_some_and(Option::is_some) {
                return Err(Error::IntegrityFreeSlotInUse(slot));
            }
        }
        let free = self.free_slots.len();
        if len + free != self.nodes.len() {
            return Err(Error::IntegritySlotAccounting(len, free, self.nodes.len()));
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BoundedRecencyCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a BoundedRecencyCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Entries of a [`BoundedRecencyCache`] in recency order, least recently
/// used first.
pub struct Iter<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    front: Option<Slot>,
    back: Option<Slot>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = nodes.get(self.front?)?.as_ref()?;
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = nodes.get(self.back?)?.as_ref()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
