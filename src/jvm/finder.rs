//! The foreign-lookup contract between the resolution layer and whatever
//! actually stores platform class metadata.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::JvmClass;
use crate::base::ClassId;

/// Source of platform class metadata.
///
/// The symbol provider is written against this trait so that tests can
/// substitute counting or failing finders, and so that a real toolchain
/// can back it with classpath scanning. Implementations must be
/// synchronous and side-effect-free from the caller's point of view;
/// any I/O failure surfaces as `None`.
pub trait JvmClassFinder {
    /// Look up one class by id.
    ///
    /// `previous` is the enclosing class's already-fetched metadata when
    /// the caller is resolving a nested class; finders that read class
    /// files can use it to avoid re-reading, in-memory finders ignore it.
    fn find_class(&self, id: &ClassId, previous: Option<&Arc<JvmClass>>) -> Option<Arc<JvmClass>>;

    /// The short names of all top-level classes in a package.
    ///
    /// `None` means "unknown" and callers must assume any name may be
    /// present. The returned set is shared; callers must not rely on it
    /// reflecting later additions.
    fn top_level_names_in_package(&self, package: &str) -> Option<Arc<FxHashSet<SmolStr>>>;

    /// Resolve a package name to its canonical form, if the package is
    /// known to exist (directly or as a prefix of a known package).
    fn find_package(&self, name: &str) -> Option<SmolStr>;
}
