//! Hash map from string keys to `i32` values that resolves collisions by chaining.

use crate::arena::{Entry, TypedArena};
use crate::config::{Config, DEFAULT_ARENA_CHUNK_SIZE, DEFAULT_HASH_MAP_CAPACITY};
use log::debug;
use std::mem;
use thiserror::Error;

/// Errors returned by `HashMap` operations.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum HashMapError {
    #[error("key does not exist")]
    KeyError,
    #[error("key already exists")]
    KeyAlreadyExists,
    #[error("failed to allocate hash map storage")]
    MemoryError,
}

struct Item {
    key: String,
    value: i32,
    next: Option<Entry>,
}

// Additive byte hash: anagrams collide.
fn hash(key: &str) -> usize {
    key.bytes()
        .fold(0usize, |acc, byte| acc.wrapping_add(usize::from(byte)))
}

/// A hash map from string keys to `i32` values.
///
/// The map keeps an index of buckets; each bucket is the head of a chain of items stored in a
/// typed arena. The index doubles whenever the map becomes two thirds full.
///
/// # Examples
///
/// ```
/// use redblack_collections::hash_map::{HashMap, HashMapError};
///
/// let mut map = HashMap::new();
/// assert_eq!(map.capacity(), 8);
///
/// map.put("10", 10).unwrap();
/// assert_eq!(map.put("10", 11), Err(HashMapError::KeyAlreadyExists));
/// assert_eq!(map.get("10"), Ok(10));
///
/// assert_eq!(map.pop("10"), Ok(10));
/// assert_eq!(map.get("10"), Err(HashMapError::KeyError));
/// ```
pub struct HashMap {
    items: TypedArena<Item>,
    index: Vec<Option<Entry>>,
    chunk_size: usize,
}

impl HashMap {
    /// Constructs a new, empty `HashMap` with 8 buckets.
    pub fn new() -> Self {
        Self::build(DEFAULT_HASH_MAP_CAPACITY, DEFAULT_ARENA_CHUNK_SIZE)
    }

    /// Constructs a new, empty `HashMap` with a specific number of buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, DEFAULT_ARENA_CHUNK_SIZE)
    }

    /// Constructs a new, empty `HashMap` sized by `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config.hash_map_capacity` is zero.
    pub fn with_config(config: &Config) -> Self {
        Self::build(config.hash_map_capacity, config.arena_chunk_size)
    }

    fn build(capacity: usize, chunk_size: usize) -> Self {
        assert!(capacity > 0, "Expected a positive capacity.");
        HashMap {
            items: TypedArena::new(chunk_size),
            index: vec![None; capacity],
            chunk_size,
        }
    }

    fn bucket(&self, key: &str) -> usize {
        hash(key) % self.index.len()
    }

    fn find(&self, key: &str) -> Option<Entry> {
        let mut curr = self.index[self.bucket(key)];
        while let Some(entry) = curr {
            let item = &self.items[entry];
            if item.key == key {
                return Some(entry);
            }
            curr = item.next;
        }
        None
    }

    fn take(&mut self, key: &str) -> Option<Item> {
        let bucket = self.bucket(key);
        let mut prev = None;
        let mut curr = self.index[bucket];
        while let Some(entry) = curr {
            let item = &self.items[entry];
            if item.key == key {
                let next = item.next;
                match prev {
                    None => self.index[bucket] = next,
                    Some(prev) => self.items[prev].next = next,
                }
                return Some(self.items.free(&entry));
            }
            prev = Some(entry);
            curr = item.next;
        }
        None
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of items in the map.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the map holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuckets the map into `capacity` buckets.
    ///
    /// Fails with `MemoryError` if `capacity` is smaller than the number of items, is zero, or if
    /// the new index cannot be allocated. The map is unchanged on failure. Reserving the current
    /// capacity does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::hash_map::{HashMap, HashMapError};
    ///
    /// let mut map = HashMap::new();
    /// map.put("a", 1).unwrap();
    /// map.put("b", 2).unwrap();
    ///
    /// assert_eq!(map.reserve(1), Err(HashMapError::MemoryError));
    /// assert_eq!(map.reserve(32), Ok(()));
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn reserve(&mut self, capacity: usize) -> Result<(), HashMapError> {
        if capacity < self.len() || capacity == 0 {
            return Err(HashMapError::MemoryError);
        }
        if capacity == self.capacity() {
            return Ok(());
        }

        let mut index = Vec::new();
        index
            .try_reserve_exact(capacity)
            .map_err(|_| HashMapError::MemoryError)?;
        index.resize(capacity, None);
        debug!(
            "resizing hash map index from {} to {} buckets",
            self.capacity(),
            capacity,
        );

        for head in mem::replace(&mut self.index, index) {
            let mut curr = head;
            while let Some(entry) = curr {
                curr = self.items[entry].next;
                let bucket = self.bucket(&self.items[entry].key);
                self.items[entry].next = self.index[bucket];
                self.index[bucket] = Some(entry);
            }
        }
        Ok(())
    }

    /// Inserts a key-value pair. Fails with `KeyAlreadyExists` if the key is present.
    pub fn put(&mut self, key: &str, value: i32) -> Result<(), HashMapError> {
        if self.find(key).is_some() {
            return Err(HashMapError::KeyAlreadyExists);
        }
        if self.len() * 3 >= self.capacity() * 2 {
            self.reserve(self.capacity() * 2)?;
        }

        let bucket = self.bucket(key);
        let item = Item {
            key: key.to_owned(),
            value,
            next: self.index[bucket],
        };
        let entry = self
            .items
            .try_allocate(item)
            .map_err(|_| HashMapError::MemoryError)?;
        self.index[bucket] = Some(entry);
        Ok(())
    }

    /// Returns the value of a key. Fails with `KeyError` if the key is absent.
    pub fn get(&self, key: &str) -> Result<i32, HashMapError> {
        self.find(key)
            .map(|entry| self.items[entry].value)
            .ok_or(HashMapError::KeyError)
    }

    /// Returns `true` if the map holds `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes a key. Fails with `KeyError` if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<(), HashMapError> {
        self.take(key).map(|_| ()).ok_or(HashMapError::KeyError)
    }

    /// Removes a key and returns its value. Fails with `KeyError` if the key is absent.
    pub fn pop(&mut self, key: &str) -> Result<i32, HashMapError> {
        self.take(key)
            .map(|item| item.value)
            .ok_or(HashMapError::KeyError)
    }

    /// Removes every item while keeping the current capacity.
    pub fn clear(&mut self) {
        self.items = TypedArena::new(self.chunk_size);
        for head in &mut self.index {
            *head = None;
        }
    }
}

impl Default for HashMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{hash, HashMap, HashMapError};

    #[test]
    fn test_hash_collides_on_anagrams() {
        assert_eq!(hash("ab"), hash("ba"));
        assert_eq!(hash(""), 0);
    }

    #[test]
    fn test_chain_unlinks_middle_item() {
        let mut map = HashMap::with_capacity(64);
        map.put("abc", 1).unwrap();
        map.put("bca", 2).unwrap();
        map.put("cab", 3).unwrap();
        assert_eq!(map.bucket("abc"), map.bucket("cab"));

        assert_eq!(map.pop("bca"), Ok(2));
        assert_eq!(map.get("abc"), Ok(1));
        assert_eq!(map.get("cab"), Ok(3));
        assert_eq!(map.get("bca"), Err(HashMapError::KeyError));
    }

    #[test]
    fn test_growth_keeps_items() {
        let mut map = HashMap::new();
        for i in 0..100 {
            map.put(&i.to_string(), i).unwrap();
        }
        assert_eq!(map.len(), 100);
        assert!(map.capacity() >= 150);
        for i in 0..100 {
            assert_eq!(map.get(&i.to_string()), Ok(i));
        }
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity() {
        HashMap::with_capacity(0);
    }
}
