//! Semantic model: class symbols, member scopes, platform import.
//!
//! This module owns the IR view of classes: nodes live in per-session
//! arenas and are addressed by typed ids. Native (compiled-source)
//! classes are registered directly on the [`Session`]; platform
//! classes are imported on demand by the [`JvmSymbolProvider`], which
//! reads metadata through [`crate::jvm::JvmClassFinder`] and caches
//! the outcome of every lookup, including the misses.
//!
//! ## Design Principles
//!
//! 1. **Absence over errors**: a class that cannot be imported is
//!    simply not there; lookups return `None` and the miss is cached
//!    so it is never retried
//! 2. **Ids at the seams**: scopes and caches traffic in ids, and the
//!    nodes behind them are fetched from the session when needed
//! 3. **Single-threaded sessions**: one resolution pass owns its
//!    session; interior mutability is `RefCell`, not locks
//!
//! ## Usage
//!
//! ```
//! use tarn::hir::{JvmSymbolProvider, ScopeSession, Session};
//! use tarn::jvm::{ClassIndex, JvmClass, JvmClassKind};
//!
//! let index = ClassIndex::from_classes([
//!     JvmClass::new("java/lang/Thread".parse().unwrap(), JvmClassKind::Class),
//! ]);
//! let session = Session::new();
//! let provider = JvmSymbolProvider::new(&session, &index);
//!
//! let thread = provider.resolve_class(&"java/lang/Thread".parse().unwrap()).unwrap();
//! let node = session.class(thread).unwrap();
//! assert!(node.is_top_level);
//!
//! // Member lookup goes through a scope session.
//! let scopes = ScopeSession::new();
//! let scope = provider.enhanced_scope(thread, &scopes).unwrap();
//! assert_eq!(scope.owner(), thread);
//! ```

mod arena;
mod convert;

pub mod cache;
pub mod decl;
pub mod ids;
pub mod mapping;
pub mod provider;
pub mod scopes;
pub mod session;
pub mod type_params;
pub mod types;

pub use cache::{CacheEntry, SymbolCache};
pub use ids::{ClassSymbolId, FieldId, FunctionId, TypeParamId};
pub use mapping::ClassMapper;
pub use provider::JvmSymbolProvider;
pub use scopes::{
    DeclaredScope, EnhancementScope, MappedReconciliationScope, MemberScope, MemberSignature,
    PropertySymbol, ScopeSession, SupertypeUnionScope, SyntheticPropertyScope, UseSiteScope,
};
pub use session::Session;
pub use type_params::TypeParameterStack;
pub use types::{IrClassRef, IrPrimitive, IrType};
