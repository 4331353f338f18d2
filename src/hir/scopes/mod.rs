//! Member lookup scopes.
//!
//! A scope answers "which members named `n` does this class expose":
//! the [`DeclaredScope`] for members declared directly on one class,
//! [`SupertypeUnionScope`] for an ordered chain of inherited views, and
//! the use-site composition in [`use_site`] that layers the two and
//! reconciles mapped supertypes. [`synthetic`] derives property views
//! from getter conventions on top of any of them.
//!
//! Scopes hand out ids, not nodes; callers go back to the
//! [`Session`](crate::hir::Session) for the node behind an id.

use std::cell::RefCell;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::decl::Visibility;
use super::ids::{ClassSymbolId, FieldId, FunctionId};
use super::session::Session;
use crate::base::Name;

pub mod synthetic;
pub mod use_site;

pub use synthetic::{PropertySymbol, SyntheticPropertyScope};
pub use use_site::{EnhancementScope, MappedReconciliationScope, UseSiteScope};

// ============================================================================
// SCOPE TRAIT
// ============================================================================

/// Name-indexed view over a set of class members.
///
/// Lookup is push-style: the scope drives the callback once per match,
/// in the scope's own precedence order. Implementations decide what
/// "the members named `n`" means (declared only, inherited, merged).
pub trait MemberScope {
    /// Invoke `f` for every function named `name`, in precedence order.
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId));

    /// Invoke `f` for every field named `name`, in precedence order.
    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId));

    /// Invoke `f` for every constructor. Constructors are not
    /// inherited; only scopes backed by a single class yield any.
    fn for_each_constructor(&self, f: &mut dyn FnMut(FunctionId)) {
        let _ = f;
    }

    /// All function names this scope can answer for, deduplicated,
    /// in no particular order.
    fn function_names(&self) -> Vec<Name>;

    /// All field names this scope can answer for, deduplicated,
    /// in no particular order.
    fn field_names(&self) -> Vec<Name>;

    /// The functions named `name`, collected in precedence order.
    fn functions_named(&self, name: Name) -> Vec<FunctionId> {
        let mut out = Vec::new();
        self.for_each_function(name, &mut |id| out.push(id));
        out
    }

    /// The fields named `name`, collected in precedence order.
    fn fields_named(&self, name: Name) -> Vec<FieldId> {
        let mut out = Vec::new();
        self.for_each_field(name, &mut |id| out.push(id));
        out
    }
}

// ============================================================================
// DECLARED SCOPE
// ============================================================================

/// Members declared directly on one class; no inheritance.
///
/// Pre-indexed by name at construction, so lookups never touch the
/// session again.
pub struct DeclaredScope {
    owner: ClassSymbolId,
    functions: FxHashMap<Name, SmallVec<[FunctionId; 2]>>,
    fields: FxHashMap<Name, SmallVec<[FieldId; 1]>>,
    constructors: SmallVec<[FunctionId; 2]>,
}

impl DeclaredScope {
    /// Index the declared members of `symbol`.
    ///
    /// Returns `None` while the class node is still being populated.
    pub fn for_class(session: &Session, symbol: ClassSymbolId) -> Option<Self> {
        let node = session.class(symbol)?;
        let mut functions: FxHashMap<Name, SmallVec<[FunctionId; 2]>> = FxHashMap::default();
        for &id in node.methods.iter() {
            functions.entry(session.function(id).name).or_default().push(id);
        }
        let mut fields: FxHashMap<Name, SmallVec<[FieldId; 1]>> = FxHashMap::default();
        for &id in node.fields.iter() {
            fields.entry(session.field(id).name).or_default().push(id);
        }
        Some(Self {
            owner: symbol,
            functions,
            fields,
            constructors: node.constructors.iter().copied().collect(),
        })
    }

    /// The class this scope was built from.
    pub fn owner(&self) -> ClassSymbolId {
        self.owner
    }
}

impl MemberScope for DeclaredScope {
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId)) {
        if let Some(ids) = self.functions.get(&name) {
            for &id in ids {
                f(id);
            }
        }
    }

    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId)) {
        if let Some(ids) = self.fields.get(&name) {
            for &id in ids {
                f(id);
            }
        }
    }

    fn for_each_constructor(&self, f: &mut dyn FnMut(FunctionId)) {
        for &id in &self.constructors {
            f(id);
        }
    }

    fn function_names(&self) -> Vec<Name> {
        self.functions.keys().copied().collect()
    }

    fn field_names(&self) -> Vec<Name> {
        self.fields.keys().copied().collect()
    }
}

// ============================================================================
// SUPERTYPE UNION
// ============================================================================

/// Ordered union over the scopes of a class's supertypes.
///
/// Lookup delegates to each scope in declaration order; the first scope
/// that yields any match for a name answers for that name, later
/// scopes are not consulted (first-match chain, the same discipline a
/// scope chain with parents uses).
pub struct SupertypeUnionScope {
    scopes: Vec<Arc<EnhancementScope>>,
}

impl SupertypeUnionScope {
    pub fn new(scopes: Vec<Arc<EnhancementScope>>) -> Self {
        Self { scopes }
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl MemberScope for SupertypeUnionScope {
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId)) {
        for scope in &self.scopes {
            let mut found = false;
            scope.for_each_function(name, &mut |id| {
                found = true;
                f(id);
            });
            if found {
                return;
            }
        }
    }

    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId)) {
        for scope in &self.scopes {
            let mut found = false;
            scope.for_each_field(name, &mut |id| {
                found = true;
                f(id);
            });
            if found {
                return;
            }
        }
    }

    fn function_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = FxHashSet::default();
        for scope in &self.scopes {
            names.extend(scope.function_names());
        }
        names.into_iter().collect()
    }

    fn field_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = FxHashSet::default();
        for scope in &self.scopes {
            names.extend(scope.field_names());
        }
        names.into_iter().collect()
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

/// Name and arity of one member, the unit of supertype reconciliation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberSignature {
    pub name: Name,
    pub arity: u32,
}

/// The signatures a class contributes to reconciliation: its declared
/// non-static public methods, as name/arity pairs, sorted and
/// deduplicated.
fn compute_member_signatures(session: &Session, symbol: ClassSymbolId) -> Arc<[MemberSignature]> {
    let Some(node) = session.class(symbol) else {
        return Arc::new([]);
    };
    let mut signatures: Vec<MemberSignature> = node
        .methods
        .iter()
        .map(|&id| session.function(id))
        .filter(|function| !function.is_static && function.visibility == Visibility::Public)
        .map(|function| MemberSignature { name: function.name, arity: function.arity() })
        .collect();
    signatures.sort_unstable();
    signatures.dedup();
    signatures.into()
}

// ============================================================================
// SCOPE SESSION
// ============================================================================

/// Per-resolution-session scope memoization.
///
/// Keeps one declared scope and at most one enhancement scope per class
/// symbol, plus the reconciliation signature sets. Separate from
/// [`Session`] so a caller can rebuild scopes (fresh `ScopeSession`)
/// over the same symbol arenas.
#[derive(Default)]
pub struct ScopeSession {
    declared: RefCell<FxHashMap<ClassSymbolId, Arc<DeclaredScope>>>,
    enhanced: RefCell<FxHashMap<ClassSymbolId, Arc<EnhancementScope>>>,
    signatures: RefCell<FxHashMap<ClassSymbolId, Arc<[MemberSignature]>>>,
}

impl ScopeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared scope of `symbol`, built on first request.
    pub fn declared_scope(
        &self,
        session: &Session,
        symbol: ClassSymbolId,
    ) -> Option<Arc<DeclaredScope>> {
        if let Some(scope) = self.declared.borrow().get(&symbol) {
            return Some(scope.clone());
        }
        let scope = Arc::new(DeclaredScope::for_class(session, symbol)?);
        self.declared.borrow_mut().insert(symbol, scope.clone());
        Some(scope)
    }

    /// The reconciliation signature set of `symbol`, computed on first
    /// request.
    pub fn reconciliation_signatures(
        &self,
        session: &Session,
        symbol: ClassSymbolId,
    ) -> Arc<[MemberSignature]> {
        if let Some(signatures) = self.signatures.borrow().get(&symbol) {
            return signatures.clone();
        }
        let signatures = compute_member_signatures(session, symbol);
        self.signatures.borrow_mut().insert(symbol, signatures.clone());
        signatures
    }

    pub(crate) fn enhanced_scope(&self, symbol: ClassSymbolId) -> Option<Arc<EnhancementScope>> {
        self.enhanced.borrow().get(&symbol).cloned()
    }

    pub(crate) fn memoize_enhanced(&self, symbol: ClassSymbolId, scope: Arc<EnhancementScope>) {
        let previous = self.enhanced.borrow_mut().insert(symbol, scope);
        debug_assert!(previous.is_none(), "enhancement scope built twice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ClassId;
    use crate::hir::decl::{
        ClassKind, ClassNode, ClassOrigin, FunctionKind, FunctionNode, Modality,
    };
    use crate::hir::type_params::TypeParameterStack;
    use crate::hir::types::IrType;

    /// Source class with the given public instance methods, each with
    /// `arity` parameters' worth of unnamed unit parameters.
    fn class_with_methods(
        session: &Session,
        id: &str,
        methods: &[(&str, u32)],
    ) -> ClassSymbolId {
        let id: ClassId = id.parse().unwrap();
        session.add_source_class(id.clone(), |symbol| {
            let method_ids: Vec<_> = methods
                .iter()
                .map(|&(name, arity)| {
                    let parameters: Vec<_> = (0..arity)
                        .map(|_| crate::hir::decl::ValueParam { name: None, ty: IrType::Unit })
                        .collect();
                    session.alloc_function(FunctionNode {
                        name: session.interner().intern(name),
                        owner: symbol,
                        kind: FunctionKind::Method,
                        type_parameters: Arc::new([]),
                        return_type: IrType::Unit,
                        parameters: parameters.into(),
                        is_static: false,
                        visibility: Visibility::Public,
                        annotations: Arc::new([]),
                    })
                })
                .collect();
            ClassNode {
                name: session.interner().intern(id.short_name()),
                id: id.clone(),
                kind: ClassKind::Class,
                origin: ClassOrigin::Source,
                visibility: Visibility::Public,
                modality: Modality::Open,
                is_static: false,
                is_top_level: true,
                is_inner: false,
                type_parameters: Arc::new([]),
                type_param_stack: TypeParameterStack::empty(),
                supertypes: Arc::new([]),
                fields: Arc::new([]),
                methods: method_ids.into(),
                constructors: Arc::new([]),
                annotations: Arc::new([]),
            }
        })
    }

    #[test]
    fn test_declared_scope_indexes_by_name() {
        let session = Session::new();
        let symbol = class_with_methods(&session, "demo/Widget", &[("size", 0), ("size", 1)]);
        let scope = DeclaredScope::for_class(&session, symbol).unwrap();

        let size = session.interner().intern("size");
        assert_eq!(scope.functions_named(size).len(), 2);
        assert!(scope.functions_named(session.interner().intern("other")).is_empty());
        assert_eq!(scope.owner(), symbol);
    }

    #[test]
    fn test_declared_scope_memoized_per_symbol() {
        let session = Session::new();
        let scopes = ScopeSession::new();
        let symbol = class_with_methods(&session, "demo/Widget", &[("size", 0)]);

        let first = scopes.declared_scope(&session, symbol).unwrap();
        let second = scopes.declared_scope(&session, symbol).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_member_signatures_sorted_and_deduplicated() {
        let session = Session::new();
        let scopes = ScopeSession::new();
        let symbol = class_with_methods(
            &session,
            "demo/Widget",
            &[("resize", 1), ("size", 0), ("resize", 1)],
        );

        let signatures = scopes.reconciliation_signatures(&session, symbol);
        assert_eq!(signatures.len(), 2);
        assert!(signatures.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
