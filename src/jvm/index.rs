//! In-memory platform class index.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::{JvmClass, JvmClassFinder};
use crate::base::ClassId;

/// An in-memory [`JvmClassFinder`].
///
/// Holds fully materialized [`JvmClass`] metadata keyed by [`ClassId`],
/// plus a per-package registry of top-level short names for the
/// provider's fast-reject check. Packages iterate in insertion order, so
/// bulk loads produce deterministic listings.
///
/// Because the index has complete knowledge of its contents, it always
/// answers the package-name query (an unknown package reports an empty
/// set rather than "unknown").
#[derive(Default)]
pub struct ClassIndex {
    classes: FxHashMap<ClassId, Arc<JvmClass>>,
    /// Package -> top-level class short names.
    packages: IndexMap<SmolStr, Arc<FxHashSet<SmolStr>>>,
}

impl ClassIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a collection of classes.
    pub fn from_classes(classes: impl IntoIterator<Item = JvmClass>) -> Self {
        let mut index = Self::new();
        for class in classes {
            index.add_class(class);
        }
        index
    }

    /// Add one class, returning the shared handle now stored.
    ///
    /// Adding a class with an id already present replaces the stored
    /// metadata. The class's top-level name is registered in its
    /// package's name set (for nested ids, the outermost name).
    pub fn add_class(&mut self, class: JvmClass) -> Arc<JvmClass> {
        let id = class.id.clone();
        let names = self
            .packages
            .entry(SmolStr::new(id.package()))
            .or_insert_with(|| Arc::new(FxHashSet::default()));
        Arc::make_mut(names).insert(SmolStr::new(id.top_level_name()));

        let class = Arc::new(class);
        self.classes.insert(id, Arc::clone(&class));
        class
    }

    /// Fetch stored metadata without going through the finder contract.
    pub fn get(&self, id: &ClassId) -> Option<&Arc<JvmClass>> {
        self.classes.get(id)
    }

    /// Whether an id is present.
    pub fn contains(&self, id: &ClassId) -> bool {
        self.classes.contains_key(id)
    }

    /// Number of classes stored.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the index holds no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All stored classes, in no particular order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<JvmClass>> {
        self.classes.values()
    }

    /// All known packages, in insertion order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(SmolStr::as_str)
    }
}

impl JvmClassFinder for ClassIndex {
    fn find_class(&self, id: &ClassId, _previous: Option<&Arc<JvmClass>>) -> Option<Arc<JvmClass>> {
        // In-memory metadata has nothing to re-read, so `previous` is unused.
        self.classes.get(id).cloned()
    }

    fn top_level_names_in_package(&self, package: &str) -> Option<Arc<FxHashSet<SmolStr>>> {
        match self.packages.get(package) {
            Some(names) => Some(Arc::clone(names)),
            None => Some(Arc::new(FxHashSet::default())),
        }
    }

    fn find_package(&self, name: &str) -> Option<SmolStr> {
        if self.packages.contains_key(name) {
            return Some(SmolStr::new(name));
        }
        let prefix = format!("{name}.");
        self.packages
            .keys()
            .any(|p| p.starts_with(prefix.as_str()))
            .then(|| SmolStr::new(name))
    }
}
