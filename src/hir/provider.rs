//! Lazy class symbol resolution from platform metadata.
//!
//! The [`JvmSymbolProvider`] is the entry point of the bridge: asked
//! for a [`ClassId`], it consults the session's native registry, then
//! the symbol cache, then the platform finder, and materializes an IR
//! class node on first sight. Resolution is lazy and memoized; a class
//! is imported at most once per session, and a failed import is
//! remembered and never retried.
//!
//! Population follows the two-phase protocol of
//! [`SymbolCache`](super::cache::SymbolCache): the symbol is visible in
//! the cache before its members are built, so member types that
//! reference the class itself (constructor return types, recursive
//! generics) resolve without recursing into a rebuild.

use std::cell::RefCell;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::cache::{CacheEntry, SymbolCache};
use super::convert::TypeConverter;
use super::decl::{
    ClassNode, ClassOrigin, FieldNode, FunctionKind, FunctionNode, TypeParamNode, ValueParam,
    Variance, Visibility,
};
use super::ids::{ClassSymbolId, FieldId, FunctionId, TypeParamId};
use super::scopes::use_site::build_enhanced_scope;
use super::scopes::{DeclaredScope, EnhancementScope, ScopeSession};
use super::session::Session;
use super::type_params::TypeParameterStack;
use super::types::{IrClassRef, IrType};
use crate::base::ClassId;
use crate::jvm::{JvmClass, JvmClassFinder, JvmConstructor, JvmField, JvmMethod, JvmTypeParameter};

/// Name every constructor node carries.
const CONSTRUCTOR_NAME: &str = "<init>";

/// Symbol provider over one platform finder.
///
/// Holds the per-session symbol cache and the per-package name sets
/// used for fast rejection. Construction borrows the session; all
/// further state lives behind interior mutability, so resolution only
/// ever needs `&self`.
pub struct JvmSymbolProvider<'a> {
    session: &'a Session,
    finder: &'a dyn JvmClassFinder,
    cache: SymbolCache,
    /// Top-level class names per package, as reported by the finder.
    /// `None` is cached too: it means the finder does not know the
    /// package's contents, and rejection must fail open.
    package_names: RefCell<FxHashMap<SmolStr, Option<Arc<FxHashSet<SmolStr>>>>>,
    /// Metadata of imported classes, retained so a nested lookup can
    /// hand the finder its enclosing class's already-fetched view.
    imported: RefCell<FxHashMap<ClassId, Arc<JvmClass>>>,
}

impl<'a> JvmSymbolProvider<'a> {
    pub fn new(session: &'a Session, finder: &'a dyn JvmClassFinder) -> Self {
        Self {
            session,
            finder,
            cache: SymbolCache::new(),
            package_names: RefCell::new(FxHashMap::default()),
            imported: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Resolve a class id to its symbol, importing the class on first
    /// sight.
    ///
    /// Natively registered classes win over platform classes with the
    /// same id. Returns `None` when the platform has no such class,
    /// when the finder's package listing rules the name out, or when
    /// the class carries the metadata marker annotation; every such
    /// outcome is cached and never retried within the session.
    pub fn resolve_class(&self, id: &ClassId) -> Option<ClassSymbolId> {
        if let Some(symbol) = self.session.source_class(id) {
            return Some(symbol);
        }
        match self.cache.get(id) {
            Some(CacheEntry::Hit(symbol)) => return Some(symbol),
            Some(CacheEntry::Absent) => return None,
            None => {}
        }
        self.cache.lookup_or_compute(
            id,
            || self.locate_class(id),
            |symbol, (metadata, parent)| self.build_class_node(id, symbol, &metadata, parent),
        )
    }

    /// Compute phase: decide whether a platform class exists behind
    /// `id` and allocate its symbol.
    ///
    /// The enclosing-class chain is resolved here, before the symbol is
    /// reserved, so a nested class builds on a fully populated parent
    /// and the finder gets the enclosing metadata for its lookup.
    fn locate_class(
        &self,
        id: &ClassId,
    ) -> Option<(ClassSymbolId, (Arc<JvmClass>, Option<ClassSymbolId>))> {
        if self.rejected_by_package_index(id) {
            trace!(class = %id, "rejected by package name index");
            return None;
        }
        let parent = if id.is_nested() {
            id.parent().and_then(|parent_id| self.resolve_class(&parent_id))
        } else {
            None
        };
        let previous = id.parent().and_then(|parent_id| self.imported_metadata(&parent_id));
        let metadata = self.finder.find_class(id, previous.as_ref())?;
        if metadata.has_annotation(self.session.mapper().metadata_marker()) {
            debug!(class = %id, "excluded by metadata marker annotation");
            return None;
        }
        self.imported.borrow_mut().insert(id.clone(), metadata.clone());
        let symbol = self.session.reserve_class();
        Some((symbol, (metadata, parent)))
    }

    fn imported_metadata(&self, id: &ClassId) -> Option<Arc<JvmClass>> {
        self.imported.borrow().get(id).cloned()
    }

    /// Whether the finder's package listing rules out `id`'s top-level
    /// name. An unknown listing never rejects.
    fn rejected_by_package_index(&self, id: &ClassId) -> bool {
        match self.known_top_level_names(id.package()) {
            Some(names) => !names.contains(id.top_level_name()),
            None => false,
        }
    }

    fn known_top_level_names(&self, package: &str) -> Option<Arc<FxHashSet<SmolStr>>> {
        if let Some(cached) = self.package_names.borrow().get(package) {
            return cached.clone();
        }
        let names = self.finder.top_level_names_in_package(package);
        self.package_names.borrow_mut().insert(SmolStr::new(package), names.clone());
        names
    }

    // ========================================================================
    // NODE CONSTRUCTION
    // ========================================================================

    /// Populate phase: build the class node behind an already-reserved
    /// symbol. Reentrant [`resolve_class`](Self::resolve_class) calls
    /// for the same id observe the reserved symbol during this.
    fn build_class_node(
        &self,
        id: &ClassId,
        symbol: ClassSymbolId,
        metadata: &JvmClass,
        parent: Option<ClassSymbolId>,
    ) {
        let session = self.session;

        // A nested class whose enclosing class failed to resolve still
        // imports; its stack just starts empty.
        let parent_stack = parent
            .and_then(|parent_symbol| session.class(parent_symbol))
            .map(|node| node.type_param_stack.clone())
            .unwrap_or_default();

        let (own_params, stack) =
            self.allocate_type_params(symbol, &metadata.type_parameters, &parent_stack);
        self.convert_type_param_bounds(&metadata.type_parameters, &own_params, &stack);

        let converter = TypeConverter::new(session.mapper(), &stack);
        let supertypes = converter.convert_all(&metadata.supertypes);
        let annotations = converter.convert_annotations(&metadata.annotations);

        let fields: Vec<FieldId> = metadata
            .fields
            .iter()
            .map(|field| self.build_field(symbol, &stack, field))
            .collect();
        let methods: Vec<FunctionId> = metadata
            .methods
            .iter()
            .map(|method| self.build_method(symbol, &stack, method))
            .collect();

        let is_inner = id.is_nested() && !metadata.is_static;
        let constructors: Vec<FunctionId> =
            if metadata.constructors.is_empty() && metadata.kind.is_plain_class() {
                vec![self.synthesize_default_constructor(
                    symbol,
                    id,
                    &own_params,
                    is_inner,
                    metadata.visibility.into(),
                )]
            } else {
                metadata
                    .constructors
                    .iter()
                    .map(|constructor| {
                        self.build_constructor(symbol, id, &stack, &own_params, is_inner, constructor)
                    })
                    .collect()
            };

        let node = ClassNode {
            id: id.clone(),
            name: session.interner().intern(id.short_name()),
            kind: metadata.kind.into(),
            origin: ClassOrigin::Jvm,
            visibility: metadata.visibility.into(),
            modality: metadata.modality.into(),
            is_static: metadata.is_static,
            is_top_level: !id.is_nested(),
            is_inner,
            type_parameters: own_params.into(),
            type_param_stack: stack,
            supertypes,
            fields: fields.into(),
            methods: methods.into(),
            constructors: constructors.into(),
            annotations,
        };
        session.fill_class(symbol, node);
        debug!(class = %id, "imported platform class");
    }

    /// First type-parameter pass: allocate nodes with empty bounds and
    /// push them onto the stack, so the second pass can convert bounds
    /// that reference the parameters being declared.
    fn allocate_type_params(
        &self,
        owner: ClassSymbolId,
        declared: &[JvmTypeParameter],
        base: &TypeParameterStack,
    ) -> (Vec<TypeParamId>, TypeParameterStack) {
        let ids: Vec<TypeParamId> = declared
            .iter()
            .map(|param| {
                self.session.alloc_type_param(TypeParamNode {
                    name: self.session.interner().intern_smol(&param.name),
                    owner,
                    variance: Variance::Invariant,
                    reified: false,
                    bounds: Arc::new([]),
                })
            })
            .collect();
        let stack = base.extend(
            declared
                .iter()
                .zip(&ids)
                .map(|(param, &param_id)| (param.name.clone(), param_id)),
        );
        (ids, stack)
    }

    /// Second type-parameter pass: convert declared upper bounds, or
    /// inject the default bound for parameters declared without one.
    fn convert_type_param_bounds(
        &self,
        declared: &[JvmTypeParameter],
        ids: &[TypeParamId],
        stack: &TypeParameterStack,
    ) {
        let mapper = self.session.mapper();
        let converter = TypeConverter::new(mapper, stack);
        for (param, &param_id) in declared.iter().zip(ids) {
            let bounds: Arc<[IrType]> = if param.bounds.is_empty() {
                Arc::new([IrType::class(mapper.default_upper_bound().clone())])
            } else {
                converter.convert_all(&param.bounds)
            };
            self.session.set_type_param_bounds(param_id, bounds);
        }
    }

    fn build_field(
        &self,
        owner: ClassSymbolId,
        stack: &TypeParameterStack,
        field: &JvmField,
    ) -> FieldId {
        let converter = TypeConverter::new(self.session.mapper(), stack);
        self.session.alloc_field(FieldNode {
            name: self.session.interner().intern_smol(&field.name),
            owner,
            ty: converter.convert(&field.ty),
            is_mutable: !field.is_final,
            is_static: field.is_static,
            visibility: field.visibility.into(),
            annotations: converter.convert_annotations(&field.annotations),
        })
    }

    fn build_method(
        &self,
        owner: ClassSymbolId,
        class_stack: &TypeParameterStack,
        method: &JvmMethod,
    ) -> FunctionId {
        let (type_params, stack) =
            self.allocate_type_params(owner, &method.type_parameters, class_stack);
        self.convert_type_param_bounds(&method.type_parameters, &type_params, &stack);

        let converter = TypeConverter::new(self.session.mapper(), &stack);
        self.session.alloc_function(FunctionNode {
            name: self.session.interner().intern_smol(&method.name),
            owner,
            kind: FunctionKind::Method,
            type_parameters: type_params.into(),
            return_type: converter.convert(&method.return_type),
            parameters: self.convert_value_params(&converter, &method.parameters),
            is_static: method.is_static,
            visibility: method.visibility.into(),
            annotations: converter.convert_annotations(&method.annotations),
        })
    }

    fn build_constructor(
        &self,
        owner: ClassSymbolId,
        class_id: &ClassId,
        class_stack: &TypeParameterStack,
        class_params: &[TypeParamId],
        is_inner: bool,
        constructor: &JvmConstructor,
    ) -> FunctionId {
        let (type_params, stack) =
            self.allocate_type_params(owner, &constructor.type_parameters, class_stack);
        self.convert_type_param_bounds(&constructor.type_parameters, &type_params, &stack);

        let converter = TypeConverter::new(self.session.mapper(), &stack);
        self.session.alloc_function(FunctionNode {
            name: self.session.interner().intern(CONSTRUCTOR_NAME),
            owner,
            kind: FunctionKind::Constructor { is_primary: false, is_inner },
            type_parameters: type_params.into(),
            return_type: self_referencing_type(class_id, class_params),
            parameters: self.convert_value_params(&converter, &constructor.parameters),
            is_static: false,
            visibility: constructor.visibility.into(),
            annotations: converter.convert_annotations(&constructor.annotations),
        })
    }

    /// The one constructor a plain class gets when it declares none.
    fn synthesize_default_constructor(
        &self,
        owner: ClassSymbolId,
        class_id: &ClassId,
        class_params: &[TypeParamId],
        is_inner: bool,
        visibility: Visibility,
    ) -> FunctionId {
        self.session.alloc_function(FunctionNode {
            name: self.session.interner().intern(CONSTRUCTOR_NAME),
            owner,
            kind: FunctionKind::Constructor { is_primary: true, is_inner },
            type_parameters: Arc::new([]),
            return_type: self_referencing_type(class_id, class_params),
            parameters: Arc::new([]),
            is_static: false,
            visibility,
            annotations: Arc::new([]),
        })
    }

    fn convert_value_params(
        &self,
        converter: &TypeConverter<'_>,
        parameters: &[crate::jvm::JvmValueParameter],
    ) -> Arc<[ValueParam]> {
        parameters
            .iter()
            .map(|parameter| ValueParam {
                name: parameter
                    .name
                    .as_ref()
                    .map(|name| self.session.interner().intern_smol(name)),
                ty: converter.convert(&parameter.ty),
            })
            .collect::<Vec<_>>()
            .into()
    }

    // ========================================================================
    // PRODUCED SCOPE VIEWS
    // ========================================================================

    /// The declared-member scope of a class, resolving it first.
    pub fn declared_member_scope(
        &self,
        id: &ClassId,
        scopes: &ScopeSession,
    ) -> Option<Arc<DeclaredScope>> {
        let symbol = self.resolve_class(id)?;
        scopes.declared_scope(self.session, symbol)
    }

    /// The use-site member scope of a class, resolving it first.
    pub fn use_site_scope(
        &self,
        id: &ClassId,
        scopes: &ScopeSession,
    ) -> Option<Arc<EnhancementScope>> {
        let symbol = self.resolve_class(id)?;
        self.enhanced_scope(symbol, scopes)
    }

    /// The use-site member scope of an already-resolved class.
    pub fn enhanced_scope(
        &self,
        symbol: ClassSymbolId,
        scopes: &ScopeSession,
    ) -> Option<Arc<EnhancementScope>> {
        let mut visited = FxHashSet::default();
        build_enhanced_scope(self, scopes, symbol, &mut visited)
    }

    /// Every top-level class symbol in the session so far, native and
    /// imported alike, in allocation order.
    pub fn top_level_class_symbols(&self) -> Vec<ClassSymbolId> {
        self.session
            .class_symbols()
            .filter(|&symbol| {
                self.session.class(symbol).is_some_and(|node| node.is_top_level)
            })
            .collect()
    }

    /// Canonical package name for `name`, straight from the finder.
    pub fn resolve_package(&self, name: &str) -> Option<SmolStr> {
        self.finder.find_package(name)
    }
}

/// The type of "this class, parameterized by its own parameters",
/// used as every constructor's return type.
fn self_referencing_type(class_id: &ClassId, class_params: &[TypeParamId]) -> IrType {
    let args: Vec<IrType> = class_params.iter().map(|&id| IrType::TypeParameter(id)).collect();
    IrType::Class(IrClassRef::with_args(class_id.clone(), args))
}
