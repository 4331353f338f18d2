//! Platform (JVM) class metadata: the foreign side of symbol resolution.
//!
//! Everything in this module describes classes as the platform sees
//! them. The semantic layer in [`crate::hir`] consumes these types
//! through the [`JvmClassFinder`] trait and never mutates them.

mod class;
mod finder;
mod index;

#[cfg(feature = "interchange")]
pub mod stubs;

pub use class::{
    JvmAnnotation, JvmClass, JvmClassKind, JvmConstructor, JvmField, JvmMethod, JvmModality,
    JvmPrimitive, JvmType, JvmTypeParameter, JvmValueParameter, JvmVisibility,
};
pub use finder::JvmClassFinder;
pub use index::ClassIndex;
