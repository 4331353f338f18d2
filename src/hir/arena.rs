//! Typed arena storage for IR nodes.
//!
//! A session owns one arena per node kind. Allocation hands out a typed
//! key; the key is the node's identity for the rest of the session.
//! Interior mutability lets construction code allocate while holding
//! only a shared reference to the session.

use std::cell::{Ref, RefCell};
use std::marker::PhantomData;

/// Conversion between a typed id and its arena slot.
///
/// Implemented by the id newtypes in [`super::ids`]; keys are only ever
/// minted by [`Arena::alloc`], so a key is always in range for the arena
/// that produced it.
pub trait ArenaKey: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Append-only typed storage.
///
/// Values are never removed; `update` supports the set-once second pass
/// some nodes need (type-parameter bounds are converted after all the
/// nodes of a class exist, so self-referencing bounds can be expressed).
///
/// Callers must not hold a [`Ref`] from [`get`](Self::get) across a call
/// that allocates or updates; clone what is needed out of the borrow
/// first.
pub struct Arena<K, V> {
    entries: RefCell<Vec<V>>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, V> Arena<K, V> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { entries: RefCell::new(Vec::new()), _key: PhantomData }
    }

    /// Store a value, returning its key.
    pub fn alloc(&self, value: V) -> K {
        let mut entries = self.entries.borrow_mut();
        let key = K::from_index(entries.len());
        entries.push(value);
        key
    }

    /// Borrow the value for a key.
    ///
    /// # Panics
    /// Panics if the key came from a different arena.
    pub fn get(&self, key: K) -> Ref<'_, V> {
        Ref::map(self.entries.borrow(), |entries| &entries[key.index()])
    }

    /// Mutate the value for a key in place.
    ///
    /// # Panics
    /// Panics if the key came from a different arena.
    pub fn update<R>(&self, key: K, f: impl FnOnce(&mut V) -> R) -> R {
        let mut entries = self.entries.borrow_mut();
        f(&mut entries[key.index()])
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// All keys allocated so far, in allocation order.
    pub fn keys(&self) -> impl Iterator<Item = K> {
        (0..self.len()).map(K::from_index)
    }
}

impl<K: ArenaKey, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ids::FieldId;

    #[test]
    fn test_alloc_and_get() {
        let arena: Arena<FieldId, &str> = Arena::new();

        let a = arena.alloc("first");
        let b = arena.alloc("second");

        assert_ne!(a, b);
        assert_eq!(*arena.get(a), "first");
        assert_eq!(*arena.get(b), "second");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_update_in_place() {
        let arena: Arena<FieldId, Vec<u32>> = Arena::new();
        let key = arena.alloc(Vec::new());

        arena.update(key, |v| v.push(7));

        assert_eq!(*arena.get(key), vec![7]);
    }

    #[test]
    fn test_keys_in_allocation_order() {
        let arena: Arena<FieldId, u32> = Arena::new();
        let first = arena.alloc(10);
        let second = arena.alloc(20);

        let keys: Vec<FieldId> = arena.keys().collect();
        assert_eq!(keys, vec![first, second]);
    }
}
