//! Memoization for class symbol resolution.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::ids::ClassSymbolId;
use crate::base::ClassId;

/// Result of a cache lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheEntry {
    /// A symbol is stored for this id (reserved or fully built; readers
    /// cannot tell the difference, by design of the two-phase protocol).
    Hit(ClassSymbolId),
    /// A previous resolution concluded there is no class behind this id.
    Absent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    /// Symbol stored, node still being populated.
    Reserved(ClassSymbolId),
    /// Symbol stored, node fully built.
    Ready(ClassSymbolId),
    /// Negative result; never retried.
    Absent,
}

/// Two-phase memoizing map from [`ClassId`] to class symbol.
///
/// Resolving a class can re-enter itself: populating a node builds
/// constructors whose return type references the class's own symbol.
/// The cache therefore separates "a symbol exists for this id" from
/// "the node behind it is built":
///
/// 1. [`reserve`](Self::reserve) stores the symbol under the key BEFORE
///    population starts, so a reentrant [`get`](Self::get) during
///    population observes the partially-built symbol instead of
///    recursing without end;
/// 2. [`mark_ready`](Self::mark_ready) seals the entry afterwards.
///
/// Negative results are cached through
/// [`mark_absent`](Self::mark_absent) and never retried.
/// [`lookup_or_compute`](Self::lookup_or_compute) composes the phases
/// for callers that want the whole protocol in one call.
#[derive(Default)]
pub struct SymbolCache {
    slots: RefCell<FxHashMap<ClassId, Slot>>,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an id. `None` means the id has never been resolved.
    pub fn get(&self, id: &ClassId) -> Option<CacheEntry> {
        self.slots.borrow().get(id).map(|slot| match *slot {
            Slot::Reserved(symbol) | Slot::Ready(symbol) => CacheEntry::Hit(symbol),
            Slot::Absent => CacheEntry::Absent,
        })
    }

    /// Phase one: store `symbol` under `id` before populating its node.
    ///
    /// The id must not have an entry yet; resolving the same id twice
    /// concurrently on one call stack is a caller bug.
    pub fn reserve(&self, id: ClassId, symbol: ClassSymbolId) {
        let previous = self.slots.borrow_mut().insert(id, Slot::Reserved(symbol));
        debug_assert!(previous.is_none(), "class id reserved twice");
    }

    /// Phase two: seal a reserved entry once its node is fully built.
    pub fn mark_ready(&self, id: &ClassId) {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(id);
        debug_assert!(
            matches!(slot, Some(Slot::Reserved(_))),
            "mark_ready on a non-reserved entry"
        );
        if let Some(slot) = slot {
            if let Slot::Reserved(symbol) = *slot {
                *slot = Slot::Ready(symbol);
            }
        }
    }

    /// Cache a negative result for an id.
    pub fn mark_absent(&self, id: ClassId) {
        let previous = self.slots.borrow_mut().insert(id, Slot::Absent);
        debug_assert!(previous.is_none(), "absent marker overwrote an entry");
    }

    /// Drive both phases from closures.
    ///
    /// `compute` decides whether a symbol exists and returns it with
    /// whatever auxiliary data population needs; `populate` runs with
    /// the symbol already visible to reentrant lookups. A `None` from
    /// `compute` is cached as absent.
    pub fn lookup_or_compute<A>(
        &self,
        id: &ClassId,
        compute: impl FnOnce() -> Option<(ClassSymbolId, A)>,
        populate: impl FnOnce(ClassSymbolId, A),
    ) -> Option<ClassSymbolId> {
        match self.get(id) {
            Some(CacheEntry::Hit(symbol)) => return Some(symbol),
            Some(CacheEntry::Absent) => return None,
            None => {}
        }
        match compute() {
            Some((symbol, aux)) => {
                self.reserve(id.clone(), symbol);
                populate(symbol, aux);
                self.mark_ready(id);
                Some(symbol)
            }
            None => {
                self.mark_absent(id.clone());
                None
            }
        }
    }

    /// Number of cached entries (absent markers included).
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
