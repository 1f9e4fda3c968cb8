//! Append-only arenas and key interning
//!
//! [`Arena`] stores owned values addressed by typed ids in allocation order.
//! [`Interner`] maps a lookup key to an id that was allocated elsewhere, so the
//! same key always yields the same id. The IR builder uses one interner for
//! converted C types and another for pointee placeholders.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::ids::ArenaId;
use crate::error::InvariantViolation;

/// Append-only storage addressed by typed ids
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    slots: Vec<T>,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Allocate a slot; `build` receives the fresh id so values can record it
    pub fn alloc_with(&mut self, build: impl FnOnce(I) -> T) -> Result<I, InvariantViolation> {
        let id = slot_id(self.slots.len())?;
        self.slots.push(build(id));
        Ok(id)
    }

    /// Look up a value by id
    pub fn get(&self, id: I) -> Option<&T> {
        self.slots.get(id.slot())
    }

    /// Look up a value by id for in-place update
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots.get_mut(id.slot())
    }

    /// Number of allocated slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Values in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

/// Id for slot `len`, the next one an arena of `len` values hands out
fn slot_id<I: ArenaId>(len: usize) -> Result<I, InvariantViolation> {
    u32::try_from(len)
        .map(I::from_slot)
        .map_err(|_| InvariantViolation::ArenaExhausted { kind: I::KIND, len })
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Key to id map layered over an arena owned by someone else
#[derive(Debug, Clone)]
pub struct Interner<K, I> {
    map: HashMap<K, I>,
}

impl<K: Hash + Eq, I: ArenaId> Interner<K, I> {
    /// Create an empty interner
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Cached id for `key`, if any
    pub fn get<Q>(&self, key: &Q) -> Option<I>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Return the cached id for `key`, or run `make` and cache the id it allocates
    pub fn intern_with<E>(
        &mut self,
        key: K,
        make: impl FnOnce() -> Result<I, E>,
    ) -> Result<I, E> {
        if let Some(id) = self.map.get(&key) {
            return Ok(*id);
        }
        let id = make()?;
        self.map.insert(key, id);
        Ok(id)
    }

    /// Record `id` for `key`, replacing nothing that was already there
    pub fn insert(&mut self, key: K, id: I) -> I {
        *self.map.entry(key).or_insert(id)
    }

    /// Number of interned keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing has been interned
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Hash + Eq, I: ArenaId> Default for Interner<K, I> {
    fn default() -> Self {
        Self::new()
    }
}
