use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// LfuCache

struct LfuEntry<K, V> {
    key: K,
    value: V,
    hits: u64,
    stamp: u64,
}

/// A bounded cache evicting the least frequently used entry.
///
/// Ties are broken by insertion age, the older entry goes first.
/// Lookups are linear, the cache is meant for a handful of entries.
///
/// # Examples
///
/// ```
/// use weft_utils::LfuCache;
///
/// let mut cache = LfuCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");
///
/// // `b` has fewer hits than `a`.
/// let evicted = cache.insert("c", 3);
/// assert_eq!(evicted, Some(("b", 2)));
/// ```
pub struct LfuCache<K, V> {
    entries: Vec<LfuEntry<K, V>>,
    capacity: usize,
    clock: u64,
}

impl<K: PartialEq, V> LfuCache<K, V> {
    /// Creates an empty cache, `capacity` is clamped to at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            clock: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }

    /// Returns the cached value and counts the hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let entry = self.entries.iter_mut().find(|e| e.key == *key)?;
        entry.hits += 1;
        Some(&entry.value)
    }

    /// Returns the cached value mutably and counts the hit.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let entry = self.entries.iter_mut().find(|e| e.key == *key)?;
        entry.hits += 1;
        Some(&mut entry.value)
    }

    /// Inserts a value, returning the entry evicted to make room, if any.
    ///
    /// Inserting an existing key replaces its value and keeps its hit count.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.clock += 1;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            let old = core::mem::replace(&mut entry.value, value);
            return Some((key, old));
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        self.entries.push(LfuEntry {
            key,
            value,
            hits: 0,
            stamp: self.clock,
        });
        evicted
    }

    /// Returns the value for `key`, inserting `f()` first if absent.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> &mut V {
        let position = match self.entries.iter().position(|e| e.key == key) {
            Some(position) => position,
            None => {
                self.insert(key, f());
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[position];
        entry.hits += 1;
        &mut entry.value
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let victim = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| (e.hits, e.stamp))
            .map(|(index, _)| index)?;
        let entry = self.entries.swap_remove(victim);
        Some((entry.key, entry.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::LfuCache;

    #[test]
    fn evicts_least_used() {
        let mut cache = LfuCache::new(3);
        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.insert(3, "three");
        cache.get(&1);
        cache.get(&1);
        cache.get(&3);

        assert_eq!(cache.insert(4, "four"), Some((2, "two")));
        assert!(cache.contains(&1));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn ties_evict_oldest() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 0);
        cache.insert("b", 0);
        assert_eq!(cache.insert("c", 0), Some(("a", 0)));
    }

    #[test]
    fn get_or_insert_with_counts_hits() {
        let mut cache = LfuCache::new(2);
        *cache.get_or_insert_with("a", || 1) += 1;
        assert_eq!(*cache.get_or_insert_with("a", || 100), 2);
        cache.insert("b", 5);
        // `a` has two hits, `b` none.
        assert_eq!(cache.insert("c", 7), Some(("b", 5)));
    }
}
