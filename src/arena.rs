//! Chunked typed arena with generational entries.

use std::collections::TryReserveError;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct Position {
    chunk_index: usize,
    block_index: usize,
}

/// A struct representing an entry to `TypedArena<T>`.
///
/// An entry stays valid until the object it refers to is freed. Freeing bumps the generation of
/// the block, so a stale entry never resolves to an object allocated later in the same block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    position: Position,
    generation: u32,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Position>),
}

struct Slot<T> {
    generation: u32,
    block: Block<T>,
}

/// A typed arena that hands out `Entry` values instead of references.
///
/// Objects are stored in fixed-size chunks so an allocation never moves existing objects. Freed
/// blocks are threaded onto a free list and reused by later allocations.
///
/// # Examples
///
/// ```
/// use redblack_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<Position>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn slot(&self, position: Position) -> Option<&Slot<T>> {
        self.chunks
            .get(position.chunk_index)
            .and_then(|chunk| chunk.get(position.block_index))
    }

    fn slot_mut(&mut self, position: Position) -> Option<&mut Slot<T>> {
        self.chunks
            .get_mut(position.chunk_index)
            .and_then(|chunk| chunk.get_mut(position.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            size: 0,
            capacity: 0,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Allocates an object in the arena, returning an error instead of aborting if a new chunk
    /// cannot be reserved. The arena is left unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(16);
    /// let x = arena.try_allocate(7).unwrap();
    /// assert_eq!(arena[x], 7);
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Entry, TryReserveError> {
        if self.size == self.capacity {
            self.chunks.try_reserve(1)?;
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(self.chunk_size)?;
            self.chunks.push(chunk);
            self.capacity += self.chunk_size;
        }
        self.size += 1;

        match self.head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk_index];
                last_chunk.push(Slot {
                    generation: 0,
                    block: Block::Occupied(value),
                });
                Ok(Entry {
                    position: Position {
                        chunk_index,
                        block_index: last_chunk.len() - 1,
                    },
                    generation: 0,
                })
            },
            Some(position) => {
                let slot = &mut self.chunks[position.chunk_index][position.block_index];
                match mem::replace(&mut slot.block, Block::Occupied(value)) {
                    Block::Vacant(next) => {
                        self.head = next;
                        Ok(Entry {
                            position,
                            generation: slot.generation,
                        })
                    },
                    Block::Occupied(_) => panic!("Expected a vacant block on the free list."),
                }
            },
        }
    }

    /// Allocates an object in the arena and returns an `Entry` that can later be used to access
    /// or free the object.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk cannot be allocated.
    pub fn allocate(&mut self, value: T) -> Entry {
        self.try_allocate(value)
            .expect("Expected arena chunk allocation to succeed.")
    }

    /// Deallocates an object in the arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is stale or does not correspond to an occupied block.
    pub fn free(&mut self, entry: &Entry) -> T {
        let head = self.head;
        let slot = match self.slot_mut(entry.position) {
            Some(slot) if slot.generation == entry.generation => slot,
            _ => panic!("Error: attempting to free invalid block."),
        };
        match mem::replace(&mut slot.block, Block::Vacant(head)) {
            Block::Vacant(next) => {
                slot.block = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                slot.generation = slot.generation.wrapping_add(1);
                self.size -= 1;
                self.head = Some(entry.position);
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns `None` if the entry is
    /// stale or out of bounds.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.slot(entry.position) {
            Some(slot) if slot.generation == entry.generation => match slot.block {
                Block::Occupied(ref value) => Some(value),
                Block::Vacant(_) => None,
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None` if the entry is
    /// stale or out of bounds.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        match self.slot_mut(entry.position) {
            Some(slot) if slot.generation == entry.generation => match slot.block {
                Block::Occupied(ref mut value) => Some(value),
                Block::Vacant(_) => None,
            },
            _ => None,
        }
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}
