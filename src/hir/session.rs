//! The resolution session: node storage plus everything resolution
//! consults.
//!
//! A [`Session`] owns the arenas all IR nodes live in, the name
//! interner, the class mapper and the registry of natively-declared
//! classes. It is the single-threaded heart of the bridge; everything
//! in it uses interior mutability so construction code can allocate
//! while holding `&Session`, and none of it is `Sync`.
//!
//! Symbol resolution itself lives in [`super::provider`]; the session
//! only stores and serves.

use std::cell::RefCell;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::arena::Arena;
use super::decl::{ClassNode, FieldNode, FunctionNode, TypeParamNode};
use super::ids::{ClassSymbolId, FieldId, FunctionId, TypeParamId};
use super::mapping::ClassMapper;
use super::types::IrType;
use crate::base::{ClassId, Interner};

/// Storage slot for a class symbol.
///
/// A symbol is allocated (and therefore referencable) before its node
/// is built; readers that hit a reserved slot get `None` from
/// [`Session::class`] and must not assume a node exists.
#[derive(Clone, Debug)]
enum ClassSlot {
    Reserved,
    Ready(ClassNode),
}

/// Owner of all per-resolution state.
///
/// # Example
///
/// ```
/// use tarn::hir::Session;
///
/// let session = Session::new();
/// let name = session.interner().intern("size");
/// assert_eq!(session.interner().get(name), "size");
/// ```
pub struct Session {
    interner: Interner,
    mapper: ClassMapper,
    classes: Arena<ClassSymbolId, ClassSlot>,
    type_params: Arena<TypeParamId, TypeParamNode>,
    fields: Arena<FieldId, FieldNode>,
    functions: Arena<FunctionId, FunctionNode>,
    /// Classes declared natively (builtins, compiled Tarn sources).
    /// Consulted before any platform lookup.
    source_classes: RefCell<FxHashMap<ClassId, ClassSymbolId>>,
}

impl Session {
    /// Session with the default class mapper.
    pub fn new() -> Self {
        Self::with_mapper(ClassMapper::new())
    }

    /// Session with a caller-supplied mapper.
    pub fn with_mapper(mapper: ClassMapper) -> Self {
        Self {
            interner: Interner::new(),
            mapper,
            classes: Arena::new(),
            type_params: Arena::new(),
            fields: Arena::new(),
            functions: Arena::new(),
            source_classes: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn mapper(&self) -> &ClassMapper {
        &self.mapper
    }

    // ========================================================================
    // CLASS SLOTS
    // ========================================================================

    /// Allocate a class symbol with no node behind it yet.
    pub(crate) fn reserve_class(&self) -> ClassSymbolId {
        self.classes.alloc(ClassSlot::Reserved)
    }

    /// Install the node for a previously reserved symbol.
    pub(crate) fn fill_class(&self, symbol: ClassSymbolId, node: ClassNode) {
        self.classes.update(symbol, |slot| {
            debug_assert!(
                matches!(slot, ClassSlot::Reserved),
                "class slot filled twice"
            );
            *slot = ClassSlot::Ready(node);
        });
    }

    /// The node for a class symbol, or `None` while the symbol is still
    /// being populated.
    ///
    /// Returns an owned clone; node fields are `Arc` slices, so this is
    /// cheap and never holds a borrow of the session.
    ///
    /// # Panics
    /// Panics if the symbol came from a different session.
    pub fn class(&self, symbol: ClassSymbolId) -> Option<ClassNode> {
        match &*self.classes.get(symbol) {
            ClassSlot::Ready(node) => Some(node.clone()),
            ClassSlot::Reserved => None,
        }
    }

    /// The declared direct supertypes of a class, interfaces included.
    ///
    /// Non-transitive: only the references written on the class itself.
    /// Empty while the symbol is still being populated.
    pub fn direct_supertypes(&self, symbol: ClassSymbolId) -> SmallVec<[IrType; 4]> {
        match self.class(symbol) {
            Some(node) => node.supertypes.iter().cloned().collect(),
            None => SmallVec::new(),
        }
    }

    /// Number of class symbols allocated so far.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Every class symbol allocated so far, in allocation order.
    pub fn class_symbols(&self) -> impl Iterator<Item = ClassSymbolId> {
        self.classes.keys()
    }

    // ========================================================================
    // MEMBER NODES
    // ========================================================================

    // Member allocators are public so that whatever lowers compiled
    // sources into the session can mint the ids a class node refers to.

    pub fn alloc_type_param(&self, node: TypeParamNode) -> TypeParamId {
        self.type_params.alloc(node)
    }

    /// Second construction pass: install the converted bounds of a
    /// type-parameter node.
    pub fn set_type_param_bounds(&self, id: TypeParamId, bounds: Arc<[IrType]>) {
        debug_assert!(!bounds.is_empty(), "type parameter left without bounds");
        self.type_params.update(id, |node| node.bounds = bounds);
    }

    pub fn alloc_field(&self, node: FieldNode) -> FieldId {
        self.fields.alloc(node)
    }

    pub fn alloc_function(&self, node: FunctionNode) -> FunctionId {
        self.functions.alloc(node)
    }

    /// The node for a type-parameter id.
    ///
    /// # Panics
    /// Panics if the id came from a different session.
    pub fn type_param(&self, id: TypeParamId) -> TypeParamNode {
        self.type_params.get(id).clone()
    }

    /// The node for a field id.
    ///
    /// # Panics
    /// Panics if the id came from a different session.
    pub fn field(&self, id: FieldId) -> FieldNode {
        self.fields.get(id).clone()
    }

    /// The node for a function id.
    ///
    /// # Panics
    /// Panics if the id came from a different session.
    pub fn function(&self, id: FunctionId) -> FunctionNode {
        self.functions.get(id).clone()
    }

    // ========================================================================
    // SOURCE REGISTRY
    // ========================================================================

    /// Register a natively-declared class under `id`.
    ///
    /// The build closure receives the freshly allocated symbol so the
    /// node's members can name their owner. The registered id wins over
    /// any platform class with the same id in every later resolution.
    pub fn add_source_class(
        &self,
        id: ClassId,
        build: impl FnOnce(ClassSymbolId) -> ClassNode,
    ) -> ClassSymbolId {
        let symbol = self.reserve_class();
        self.source_classes.borrow_mut().insert(id.clone(), symbol);
        let node = build(symbol);
        debug_assert_eq!(node.id, id, "source class registered under a foreign id");
        self.fill_class(symbol, node);
        symbol
    }

    /// The symbol of a natively-declared class, if one is registered.
    pub fn source_class(&self, id: &ClassId) -> Option<ClassSymbolId> {
        self.source_classes.borrow().get(id).copied()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
