//! Foundation types for the Tarn toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`ClassId`] - Package-qualified class identifiers
//! - [`Name`], [`Interner`] - String interning
//!
//! This module has NO dependencies on other tarn modules.

mod class_id;
mod intern;

pub use class_id::{ClassId, ClassIdError};
pub use intern::{Interner, Name};
