//! Indexed binary min-heap.
//!
//! Items are identified by a `usize` id (the pathfinder uses cell indices).
//! Alongside the heap array we keep an `id → heap slot` table, which lets a
//! caller lower or raise the key of an item that is already queued in
//! O(log n) instead of pushing a duplicate or scanning the heap.

/// Slot value for ids that are not in the heap
const NOT_QUEUED: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Entry<K> {
    key: K,
    id: usize,
}

/// Min-heap of `(id, key)` pairs with in-place key updates
#[derive(Clone, Debug)]
pub struct MinHeap<K> {
    entries: Vec<Entry<K>>,
    /// id → index into `entries`, or `NOT_QUEUED`
    slots: Vec<usize>,
}

impl<K: Ord + Copy> MinHeap<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Pre-size the slot table for ids below `ids`
    pub fn with_capacity(ids: usize) -> Self {
        Self {
            entries: Vec::with_capacity(ids.min(1024)),
            slots: vec![NOT_QUEUED; ids],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every item, keeping allocations
    pub fn clear(&mut self) {
        for entry in &self.entries {
            self.slots[entry.id] = NOT_QUEUED;
        }
        self.entries.clear();
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.slots.get(id).is_some_and(|&s| s != NOT_QUEUED)
    }

    /// Current key of a queued item
    pub fn key_of(&self, id: usize) -> Option<K> {
        let slot = *self.slots.get(id)?;
        self.entries.get(slot).map(|e| e.key)
    }

    /// Smallest key without removing it
    pub fn peek(&self) -> Option<(usize, K)> {
        self.entries.first().map(|e| (e.id, e.key))
    }

    /// Queue an item, or change its key if it is already queued
    pub fn push(&mut self, id: usize, key: K) {
        if self.contains(id) {
            self.update(id, key);
            return;
        }
        if id >= self.slots.len() {
            self.slots.resize(id + 1, NOT_QUEUED);
        }
        let slot = self.entries.len();
        self.entries.push(Entry { key, id });
        self.slots[id] = slot;
        self.sift_up(slot);
    }

    /// Remove and return the item with the smallest key
    pub fn pop(&mut self) -> Option<(usize, K)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop()?;
        self.slots[entry.id] = NOT_QUEUED;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.id, entry.key))
    }

    /// Change the key of a queued item, restoring heap order.
    ///
    /// Returns false if the item is not queued.
    pub fn update(&mut self, id: usize, key: K) -> bool {
        let Some(&slot) = self.slots.get(id) else {
            return false;
        };
        if slot == NOT_QUEUED {
            return false;
        }
        let old = self.entries[slot].key;
        self.entries[slot].key = key;
        if key < old {
            self.sift_up(slot);
        } else if key > old {
            self.sift_down(slot);
        }
        true
    }

    /// Remove a queued item regardless of its position
    pub fn remove(&mut self, id: usize) -> Option<K> {
        let slot = *self.slots.get(id)?;
        if slot == NOT_QUEUED {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(slot, last);
        let entry = self.entries.pop()?;
        self.slots[entry.id] = NOT_QUEUED;
        if slot < self.entries.len() {
            self.sift_up(slot);
            self.sift_down(slot);
        }
        Some(entry.key)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.slots[self.entries[a].id] = a;
        self.slots[self.entries[b].id] = b;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].key >= self.entries[parent].key {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.entries[left].key < self.entries[smallest].key {
                smallest = left;
            }
            if right < len && self.entries[right].key < self.entries[smallest].key {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        for (i, entry) in self.entries.iter().enumerate() {
            assert_eq!(self.slots[entry.id], i, "slot table out of sync");
            if i > 0 {
                assert!(self.entries[(i - 1) / 2].key <= entry.key, "heap order broken");
            }
        }
        let queued = self.slots.iter().filter(|&&s| s != NOT_QUEUED).count();
        assert_eq!(queued, self.entries.len());
    }
}

impl<K: Ord + Copy> Default for MinHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}
