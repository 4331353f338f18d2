//! # tarn-base
//!
//! Core library for Tarn's platform interop: JVM class metadata,
//! symbol import, and the member scopes built on top of it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir     → Semantic model: class symbols, scopes, platform import
//!   ↓
//! jvm     → Platform class metadata and lookup
//!   ↓
//! base    → Primitives (ClassId, Name interning)
//! ```
//!
//! The `hir` session resolves class names against two worlds: classes
//! compiled from Tarn sources, registered directly, and platform
//! classes imported lazily through a [`jvm::JvmClassFinder`]. Builtin
//! container types shadow their platform counterparts via the
//! [`hir::ClassMapper`], and the scope layer reconciles the two views
//! at use sites.

// ============================================================================
// MODULES
// ============================================================================

/// Foundation types: ClassId, Name interning
pub mod base;

/// Semantic model: sessions, symbol providers, member scopes
pub mod hir;

/// Platform class metadata: JVM classes, finders, stub loading
pub mod jvm;

// Re-export foundation types
pub use base::{ClassId, ClassIdError, Interner, Name};
