/*!
An open-addressing hash map with linear probing and backward-shift deletion.

Unlike `std::collections::HashMap`, probing is driven by a hash the key computes itself (see
`TableKey`), so a key's slot depends only on its content and the table's capacity. The table
grows when more than 80% full and shrinks when less than half full.
*/
use std::fmt::{self, Debug, Formatter};
use std::iter::FromIterator;

/// The capacity of a freshly allocated map
pub const INITIAL_CAPACITY: usize = 4;

/// The load factor above which a map grows
pub const MAX_LOAD: f32 = 0.8;

/// The load factor below which a map shrinks
pub const MIN_LOAD: f32 = 0.5;

/// The factor a map's capacity is multiplied by when it grows (before adding `GROW_OFFSET`)
pub const GROW_FACTOR: f32 = 1.3;

/// The number of slots added on top of `GROW_FACTOR` when a map grows
pub const GROW_OFFSET: f32 = 2.0;

/// The factor a map's capacity is multiplied by when it shrinks
pub const SHRINK_FACTOR: f32 = 0.7;

/// A key which carries its own 32-bit table hash
pub trait TableKey: Eq {
    /// The hash used to pick this key's home slot
    fn table_hash(&self) -> u32;
}

/// An open-addressing map from `K` to `V`
#[derive(Clone)]
pub struct OpenMap<K, V> {
    /// The slots of this map. Every occupied slot is reachable from its key's home slot without
    /// crossing an empty one.
    slots: Vec<Option<(K, V)>>,
    /// The number of occupied slots
    len: usize,
}

impl<K: TableKey, V> OpenMap<K, V> {
    /// Create a new, empty map
    pub fn new() -> OpenMap<K, V> {
        Self::with_capacity(INITIAL_CAPACITY)
    }
    /// Create a new, empty map with a given number of slots
    pub fn with_capacity(capacity: usize) -> OpenMap<K, V> {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.resize_with(capacity.max(1), || None);
        OpenMap { slots, len: 0 }
    }
    /// Get the number of entries in this map
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
    /// Check whether this map is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Get the number of slots in this map
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    #[inline]
    fn home(&self, key: &K) -> usize {
        key.table_hash() as usize % self.slots.len()
    }
    /// Find the slot holding `key`, if any
    fn find(&self, key: &K) -> Option<usize> {
        let capacity = self.slots.len();
        let mut ix = self.home(key);
        // Every map keeps at least one slot free, so this terminates
        while let Some((k, _)) = &self.slots[ix] {
            if k.table_hash() == key.table_hash() && k == key {
                return Some(ix);
            }
            ix = (ix + 1) % capacity;
        }
        None
    }
    /// Insert a key known to be absent, without resizing
    fn insert_unique(&mut self, key: K, value: V) {
        let capacity = self.slots.len();
        let mut ix = self.home(&key);
        while self.slots[ix].is_some() {
            ix = (ix + 1) % capacity;
        }
        self.slots[ix] = Some((key, value));
        self.len += 1;
    }
    /**
    Add an entry. Returns `false`, dropping `key` and `value`, if an equal key is already
    present: existing entries are never overwritten.

    # Example
    ```rust
    use alpha_tag::{name::Name, util::open_map::OpenMap};
    let mut map = OpenMap::new();
    assert!(map.add(Name::from("x"), 1));
    assert!(!map.add(Name::from("x"), 2));
    assert_eq!(map.get(&Name::from("x")), Some(&1));
    assert_eq!(map.len(), 1);
    ```
    */
    pub fn add(&mut self, key: K, value: V) -> bool {
        if self.find(&key).is_some() {
            return false;
        }
        self.insert_unique(key, value);
        self.rehash();
        true
    }
    /**
    Remove the entry for a key, returning its value if it was present.

    The gap left behind is closed by shifting later members of the same probe run back towards
    their home slots, so no entry is ever stranded behind an empty slot.

    # Example
    ```rust
    use alpha_tag::{name::Name, util::open_map::OpenMap};
    let mut map = OpenMap::new();
    map.add(Name::from("x"), 1);
    map.add(Name::from("y"), 2);
    assert_eq!(map.remove(&Name::from("x")), Some(1));
    assert_eq!(map.remove(&Name::from("x")), None);
    assert_eq!(map.get(&Name::from("y")), Some(&2));
    ```
    */
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let found = self.find(key)?;
        let (_, value) = self.slots[found].take()?;
        self.len -= 1;
        let capacity = self.slots.len();
        let mut hole = found;
        let mut ix = (found + 1) % capacity;
        while let Some((k, _)) = &self.slots[ix] {
            let home = self.home(k);
            // An entry may fill the hole only if the hole lies on its probe path, i.e. its home
            // is at or before the hole, cyclically, as seen from `ix`
            let from_home = (ix + capacity - home) % capacity;
            let from_hole = (ix + capacity - hole) % capacity;
            if from_home >= from_hole {
                self.slots[hole] = self.slots[ix].take();
                hole = ix;
            }
            ix = (ix + 1) % capacity;
        }
        self.rehash();
        Some(value)
    }
    /// Get the value associated with a key, if any
    pub fn get(&self, key: &K) -> Option<&V> {
        let ix = self.find(key)?;
        self.slots[ix].as_ref().map(|(_, v)| v)
    }
    /// Mutably get the value associated with a key, if any
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let ix = self.find(key)?;
        self.slots[ix].as_mut().map(|(_, v)| v)
    }
    /// Check whether a key is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }
    /// Iterate over the entries of this map in slot order
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }
    /// Iterate over the keys of this map in slot order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }
    /// Iterate over the values of this map in slot order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
    /// Resize this map if its load factor left the `[MIN_LOAD, MAX_LOAD]` band
    fn rehash(&mut self) {
        if self.len == 0 {
            return;
        }
        let capacity = self.slots.len();
        let load = self.len as f32 / capacity as f32;
        let new_capacity = if load > MAX_LOAD {
            (capacity as f32 * GROW_FACTOR + GROW_OFFSET) as usize
        } else if load < MIN_LOAD {
            (capacity as f32 * SHRINK_FACTOR) as usize
        } else {
            return;
        };
        let new_capacity = new_capacity.max(self.len + 1);
        if new_capacity == capacity {
            return;
        }
        tracing::trace!(
            len = self.len,
            from = capacity,
            to = new_capacity,
            "resizing open map"
        );
        let mut slots = Vec::with_capacity(new_capacity);
        slots.resize_with(new_capacity, || None);
        let old = std::mem::replace(&mut self.slots, slots);
        self.len = 0;
        for (key, value) in old.into_iter().flatten() {
            self.insert_unique(key, value);
        }
    }
}

impl<K: TableKey + Clone, V: Clone> OpenMap<K, V> {
    /**
    Merge `smaller` into a copy of `bigger`. Every entry of `smaller` is replaced by
    `join(value_in_bigger, value_in_smaller)`, where `value_in_bigger` is `None` if its key is
    only in `smaller`. Entries only in `bigger` are copied as is.

    # Example
    ```rust
    use alpha_tag::{name::Name, util::open_map::OpenMap};
    let bigger: OpenMap<Name, u32> = vec![(Name::from("x"), 1), (Name::from("y"), 2)]
        .into_iter()
        .collect();
    let smaller: OpenMap<Name, u32> = vec![(Name::from("x"), 10), (Name::from("z"), 3)]
        .into_iter()
        .collect();
    let merged = OpenMap::merge_with(&bigger, &smaller, |b, s| b.unwrap_or(0) * 100 + *s);
    assert_eq!(merged.get(&Name::from("x")), Some(&110));
    assert_eq!(merged.get(&Name::from("y")), Some(&2));
    assert_eq!(merged.get(&Name::from("z")), Some(&3));
    ```
    */
    pub fn merge_with<F>(bigger: &Self, smaller: &Self, mut join: F) -> Self
    where
        F: FnMut(Option<V>, &V) -> V,
    {
        let mut merged = bigger.clone();
        for (key, value) in smaller.iter() {
            let value = join(merged.remove(key), value);
            merged.add(key.clone(), value);
        }
        merged
    }
}

impl<K: TableKey, V> Default for OpenMap<K, V> {
    fn default() -> OpenMap<K, V> {
        Self::new()
    }
}

impl<K: TableKey + Debug, V: Debug> Debug for OpenMap<K, V> {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same entries, whatever their capacities and layouts
impl<K: TableKey, V: PartialEq> PartialEq for OpenMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: TableKey, V: Eq> Eq for OpenMap<K, V> {}

impl<K: TableKey, V> Extend<(K, V)> for OpenMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K: TableKey, V> FromIterator<(K, V)> for OpenMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> OpenMap<K, V> {
        let mut map = OpenMap::new();
        map.extend(iter);
        map
    }
}

/// An iterator over the entries of an `OpenMap`
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Option<(K, V)>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.slots
            .by_ref()
            .find_map(|slot| slot.as_ref().map(|(k, v)| (k, v)))
    }
}

impl<'a, K: TableKey, V> IntoIterator for &'a OpenMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for OpenMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<(K, V)>>>;
    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}
