//! Use-site member scopes.
//!
//! The use-site view of a class layers its declared members over the
//! recursively built views of its supertypes. Building one walks the
//! supertype graph with a call-stack-scoped visited set, so cyclic or
//! repeated references terminate by dropping the offending edge, and
//! memoizes the finished scope per (class, scope session).
//!
//! When a platform supertype reference diverges (the mapper turned it
//! into a builtin, so the mapped and the raw platform class disagree on
//! signatures), the supertype slot becomes a reconciliation scope that
//! exposes the builtin's members first and falls back to the raw
//! class's declared members.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;

use super::{DeclaredScope, MemberScope, MemberSignature, ScopeSession, SupertypeUnionScope};
use crate::base::Name;
use crate::hir::decl::ClassOrigin;
use crate::hir::ids::{ClassSymbolId, FieldId, FunctionId};
use crate::hir::provider::JvmSymbolProvider;
use crate::hir::types::{IrClassRef, IrType};

// ============================================================================
// ENHANCEMENT SCOPE
// ============================================================================

/// The signature-enhancement boundary around a member scope.
///
/// Enhancement itself (nullability and variance normalization of
/// platform signatures) is a transform owned by the resolver built on
/// top of this crate; at this layer the wrapper delegates lookups
/// unchanged. It is still a distinct type because it is the unit the
/// scope session memoizes and the unit supertype slots are made of.
pub struct EnhancementScope {
    owner: ClassSymbolId,
    inner: Box<dyn MemberScope>,
}

impl EnhancementScope {
    pub(crate) fn new(owner: ClassSymbolId, inner: Box<dyn MemberScope>) -> Self {
        Self { owner, inner }
    }

    /// The class this scope is the use-site view of.
    pub fn owner(&self) -> ClassSymbolId {
        self.owner
    }
}

impl MemberScope for EnhancementScope {
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId)) {
        self.inner.for_each_function(name, f);
    }

    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId)) {
        self.inner.for_each_field(name, f);
    }

    fn for_each_constructor(&self, f: &mut dyn FnMut(FunctionId)) {
        self.inner.for_each_constructor(f);
    }

    fn function_names(&self) -> Vec<Name> {
        self.inner.function_names()
    }

    fn field_names(&self) -> Vec<Name> {
        self.inner.field_names()
    }
}

// ============================================================================
// USE-SITE COMPOSITION
// ============================================================================

/// Declared members layered over the supertype union.
///
/// A name answered by the declared scope shadows every inherited member
/// of that name; only unanswered names fall through to the supertypes.
/// Constructors come from the declared scope alone.
pub struct UseSiteScope {
    declared: Arc<DeclaredScope>,
    supertypes: SupertypeUnionScope,
}

impl UseSiteScope {
    pub(crate) fn new(declared: Arc<DeclaredScope>, supertypes: SupertypeUnionScope) -> Self {
        Self { declared, supertypes }
    }
}

impl MemberScope for UseSiteScope {
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId)) {
        let mut found = false;
        self.declared.for_each_function(name, &mut |id| {
            found = true;
            f(id);
        });
        if !found {
            self.supertypes.for_each_function(name, f);
        }
    }

    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId)) {
        let mut found = false;
        self.declared.for_each_field(name, &mut |id| {
            found = true;
            f(id);
        });
        if !found {
            self.supertypes.for_each_field(name, f);
        }
    }

    fn for_each_constructor(&self, f: &mut dyn FnMut(FunctionId)) {
        self.declared.for_each_constructor(f);
    }

    fn function_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = self.declared.function_names().into_iter().collect();
        names.extend(self.supertypes.function_names());
        names.into_iter().collect()
    }

    fn field_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = self.declared.field_names().into_iter().collect();
        names.extend(self.supertypes.field_names());
        names.into_iter().collect()
    }
}

// ============================================================================
// RECONCILIATION
// ============================================================================

/// Supertype slot for a diverging platform reference.
///
/// The mapped builtin answers first; names it does not know fall back
/// to the raw platform class's declared members, so members that exist
/// only in the platform's view of the type stay resolvable. The
/// signature set records which raw members are subject to
/// reconciliation; a slot is only built when it is non-empty.
pub struct MappedReconciliationScope {
    mapped: Arc<EnhancementScope>,
    unmapped_declared: Arc<DeclaredScope>,
    signatures: Arc<[MemberSignature]>,
}

impl MappedReconciliationScope {
    pub(crate) fn new(
        mapped: Arc<EnhancementScope>,
        unmapped_declared: Arc<DeclaredScope>,
        signatures: Arc<[MemberSignature]>,
    ) -> Self {
        Self { mapped, unmapped_declared, signatures }
    }

    /// The raw members subject to reconciliation, sorted by name and
    /// arity.
    pub fn signatures(&self) -> &[MemberSignature] {
        &self.signatures
    }
}

impl MemberScope for MappedReconciliationScope {
    fn for_each_function(&self, name: Name, f: &mut dyn FnMut(FunctionId)) {
        let mut found = false;
        self.mapped.for_each_function(name, &mut |id| {
            found = true;
            f(id);
        });
        if !found {
            self.unmapped_declared.for_each_function(name, f);
        }
    }

    fn for_each_field(&self, name: Name, f: &mut dyn FnMut(FieldId)) {
        let mut found = false;
        self.mapped.for_each_field(name, &mut |id| {
            found = true;
            f(id);
        });
        if !found {
            self.unmapped_declared.for_each_field(name, f);
        }
    }

    fn function_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = self.mapped.function_names().into_iter().collect();
        names.extend(self.unmapped_declared.function_names());
        names.into_iter().collect()
    }

    fn field_names(&self) -> Vec<Name> {
        let mut names: FxHashSet<Name> = self.mapped.field_names().into_iter().collect();
        names.extend(self.unmapped_declared.field_names());
        names.into_iter().collect()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build (or fetch) the use-site scope of `symbol`.
///
/// `visited` is the call-stack cycle guard: a symbol already in it is
/// being built further up this call tree, and the edge that led here is
/// skipped. Entries are removed on the way out, so the guard never
/// outlives the call path that added them.
pub(crate) fn build_enhanced_scope(
    provider: &JvmSymbolProvider<'_>,
    scopes: &ScopeSession,
    symbol: ClassSymbolId,
    visited: &mut FxHashSet<ClassSymbolId>,
) -> Option<Arc<EnhancementScope>> {
    if let Some(scope) = scopes.enhanced_scope(symbol) {
        return Some(scope);
    }
    if !visited.insert(symbol) {
        trace!(?symbol, "supertype cycle, edge skipped");
        return None;
    }
    let built = build_scope(provider, scopes, symbol, visited);
    visited.remove(&symbol);
    if let Some(scope) = &built {
        scopes.memoize_enhanced(symbol, scope.clone());
    }
    built
}

fn build_scope(
    provider: &JvmSymbolProvider<'_>,
    scopes: &ScopeSession,
    symbol: ClassSymbolId,
    visited: &mut FxHashSet<ClassSymbolId>,
) -> Option<Arc<EnhancementScope>> {
    let session = provider.session();
    let node = session.class(symbol)?;
    let declared = scopes.declared_scope(session, symbol)?;

    // The origin decides how supertypes are enumerated: platform nodes
    // carry references that may diverge into mapped/raw pairs, native
    // nodes list their direct supertypes as plain references.
    let slots = match node.origin {
        ClassOrigin::Jvm => platform_supertype_slots(provider, scopes, &node.supertypes, visited),
        ClassOrigin::Source => native_supertype_slots(provider, scopes, symbol, visited),
    };

    let use_site = UseSiteScope::new(declared, SupertypeUnionScope::new(slots));
    Some(Arc::new(EnhancementScope::new(symbol, Box::new(use_site))))
}

/// Supertype slots of a platform class: each declared reference is
/// resolved and recursively enhanced, with diverging references routed
/// through reconciliation. Error types, unresolvable classes and
/// cyclic edges are skipped without complaint.
fn platform_supertype_slots(
    provider: &JvmSymbolProvider<'_>,
    scopes: &ScopeSession,
    supertypes: &[IrType],
    visited: &mut FxHashSet<ClassSymbolId>,
) -> Vec<Arc<EnhancementScope>> {
    let mut slots = Vec::new();
    for supertype in supertypes {
        let Some(class_ref) = supertype.as_class_ref() else { continue };
        let Some(super_symbol) = provider.resolve_class(&class_ref.id) else { continue };
        let Some(mapped) = build_enhanced_scope(provider, scopes, super_symbol, visited) else {
            continue;
        };
        let slot = match reconciliation_slot(provider, scopes, class_ref, &mapped, visited) {
            Some(reconciled) => reconciled,
            None => mapped,
        };
        slots.push(slot);
    }
    slots
}

/// Supertype slots of a native class: the session's direct-supertype
/// list, each resolved and recursively enhanced, no divergence to
/// reconcile.
fn native_supertype_slots(
    provider: &JvmSymbolProvider<'_>,
    scopes: &ScopeSession,
    symbol: ClassSymbolId,
    visited: &mut FxHashSet<ClassSymbolId>,
) -> Vec<Arc<EnhancementScope>> {
    let mut slots = Vec::new();
    for supertype in provider.session().direct_supertypes(symbol) {
        let Some(class_ref) = supertype.as_class_ref() else { continue };
        let Some(super_symbol) = provider.resolve_class(&class_ref.id) else { continue };
        if let Some(scope) = build_enhanced_scope(provider, scopes, super_symbol, visited) {
            slots.push(scope);
        }
    }
    slots
}

/// Build the reconciliation slot for a diverging reference, or `None`
/// when the plain mapped scope should stand: the reference does not
/// diverge, the raw class cannot be resolved (or is mid-build on this
/// call path), or it contributes no signatures.
fn reconciliation_slot(
    provider: &JvmSymbolProvider<'_>,
    scopes: &ScopeSession,
    class_ref: &IrClassRef,
    mapped: &Arc<EnhancementScope>,
    visited: &FxHashSet<ClassSymbolId>,
) -> Option<Arc<EnhancementScope>> {
    let unmapped_id = class_ref.unmapped.as_ref()?;
    let unmapped_symbol = provider.resolve_class(unmapped_id)?;
    if visited.contains(&unmapped_symbol) {
        return None;
    }
    let signatures = scopes.reconciliation_signatures(provider.session(), unmapped_symbol);
    if signatures.is_empty() {
        return None;
    }
    let unmapped_declared = scopes.declared_scope(provider.session(), unmapped_symbol)?;
    trace!(?unmapped_symbol, "reconciling diverging supertype");
    let reconciliation =
        MappedReconciliationScope::new(mapped.clone(), unmapped_declared, signatures);
    Some(Arc::new(EnhancementScope::new(mapped.owner(), Box::new(reconciliation))))
}
