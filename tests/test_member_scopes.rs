//! Member scope behavior through the public API.
//!
//! Covers the layering rules end to end: declared members shadow
//! inherited ones, supertype slots answer in declaration order, builtin
//! containers reconcile with the raw platform classes they shadow, and
//! synthetic properties surface qualifying getters anywhere in the
//! hierarchy.

use std::sync::Arc;

use rstest::rstest;
use tarn::ClassId;
use tarn::hir::decl::{
    ClassKind, ClassNode, ClassOrigin, FunctionKind, FunctionNode, Modality, Visibility,
};
use tarn::hir::scopes::synthetic::{getter_candidates, property_name_by_getter_name};
use tarn::hir::{
    ClassSymbolId, IrType, JvmSymbolProvider, MemberScope, ScopeSession, Session,
    SyntheticPropertyScope, TypeParameterStack,
};
use tarn::jvm::{
    ClassIndex, JvmClass, JvmClassKind, JvmMethod, JvmPrimitive, JvmType, JvmTypeParameter,
};

fn id(text: &str) -> ClassId {
    text.parse().unwrap()
}

fn method(name: &str) -> JvmMethod {
    JvmMethod::new(name, JvmType::class(id("java/lang/String")))
}

/// Register a native class with public instance methods returning a
/// class type, plus the given supertypes.
fn native_class(
    session: &Session,
    class_id: &str,
    supertypes: Vec<IrType>,
    methods: &[&str],
) -> ClassSymbolId {
    let class_id: ClassId = class_id.parse().unwrap();
    session.add_source_class(class_id.clone(), |symbol| {
        let method_ids: Vec<_> = methods
            .iter()
            .map(|&name| {
                session.alloc_function(FunctionNode {
                    name: session.interner().intern(name),
                    owner: symbol,
                    kind: FunctionKind::Method,
                    type_parameters: Arc::new([]),
                    return_type: IrType::class(id("java/lang/String")),
                    parameters: Arc::new([]),
                    is_static: false,
                    visibility: Visibility::Public,
                    annotations: Arc::new([]),
                })
            })
            .collect();
        ClassNode {
            id: class_id.clone(),
            name: session.interner().intern(class_id.short_name()),
            kind: ClassKind::Class,
            origin: ClassOrigin::Source,
            visibility: Visibility::Public,
            modality: Modality::Open,
            is_static: false,
            is_top_level: true,
            is_inner: false,
            type_parameters: Arc::new([]),
            type_param_stack: TypeParameterStack::empty(),
            supertypes: supertypes.into(),
            fields: Arc::new([]),
            methods: method_ids.into(),
            constructors: Arc::new([]),
            annotations: Arc::new([]),
        }
    })
}

// ============================================================================
// SCOPE LAYERING
// ============================================================================

#[test]
fn test_declared_scope_lists_own_members_only() {
    let index = ClassIndex::from_classes([
        JvmClass::new(id("demo/Base"), JvmClassKind::Class).with_method(method("size")),
        JvmClass::new(id("demo/Derived"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("demo/Base")))
            .with_method(method("extra")),
    ]);
    let session = Session::new();
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let declared = provider.declared_member_scope(&id("demo/Derived"), &scopes).unwrap();
    assert_eq!(declared.functions_named(session.interner().intern("extra")).len(), 1);
    assert!(declared.functions_named(session.interner().intern("size")).is_empty());
}

#[test]
fn test_supertype_slots_answer_in_declaration_order() {
    let index = ClassIndex::from_classes([
        JvmClass::new(id("demo/A"), JvmClassKind::Interface).with_method(method("run")),
        JvmClass::new(id("demo/B"), JvmClassKind::Interface)
            .with_method(method("run"))
            .with_method(method("only")),
        JvmClass::new(id("demo/C"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("demo/A")))
            .with_supertype(JvmType::class(id("demo/B"))),
    ]);
    let session = Session::new();
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let scope = provider.use_site_scope(&id("demo/C"), &scopes).unwrap();

    // `run` exists on both supertypes; the first declared slot answers.
    let a = provider.resolve_class(&id("demo/A")).unwrap();
    let a_run = session.class(a).unwrap().methods[0];
    assert_eq!(scope.functions_named(session.interner().intern("run")), vec![a_run]);

    // Names unique to a later slot are still reachable.
    assert_eq!(scope.functions_named(session.interner().intern("only")).len(), 1);
}

#[test]
fn test_members_inherited_through_intermediate_class() {
    let index = ClassIndex::from_classes([
        JvmClass::new(id("demo/A"), JvmClassKind::Class).with_method(method("base")),
        JvmClass::new(id("demo/B"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("demo/A"))),
        JvmClass::new(id("demo/C"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("demo/B"))),
    ]);
    let session = Session::new();
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let scope = provider.use_site_scope(&id("demo/C"), &scopes).unwrap();
    assert_eq!(scope.functions_named(session.interner().intern("base")).len(), 1);
}

#[test]
fn test_builtin_shadow_reconciles_with_raw_platform_class() {
    let index = ClassIndex::from_classes([
        JvmClass::new(id("java/util/List"), JvmClassKind::Interface)
            .with_method(method("size"))
            .with_method(method("sort")),
        JvmClass::new(id("java/util/ArrayList"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("java/util/List"))),
    ]);
    let session = Session::new();
    let builtin = native_class(&session, "tarn/List", Vec::new(), &["get", "size"]);
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let scope = provider.use_site_scope(&id("java/util/ArrayList"), &scopes).unwrap();
    let interner = session.interner();

    // Builtin-only and raw-only members are both reachable.
    assert_eq!(scope.functions_named(interner.intern("get")).len(), 1);
    assert_eq!(scope.functions_named(interner.intern("sort")).len(), 1);

    // Where both views declare a name, the builtin answers.
    let builtin_size = session.class(builtin).unwrap().methods[1];
    assert_eq!(scope.functions_named(interner.intern("size")), vec![builtin_size]);
}

// ============================================================================
// SYNTHETIC PROPERTIES
// ============================================================================

#[test]
fn test_property_backed_by_inherited_getter() {
    let index = ClassIndex::from_classes([
        JvmClass::new(id("demo/Base"), JvmClassKind::Class).with_method(method("getName")),
        JvmClass::new(id("demo/Derived"), JvmClassKind::Class)
            .with_supertype(JvmType::class(id("demo/Base"))),
    ]);
    let session = Session::new();
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let scope = provider.use_site_scope(&id("demo/Derived"), &scopes).unwrap();
    let properties = SyntheticPropertyScope::new(&session, scope.as_ref());

    let base = provider.resolve_class(&id("demo/Base")).unwrap();
    let getter = session.class(base).unwrap().methods[0];

    let property = properties.find_property(session.interner().intern("name")).unwrap();
    assert_eq!(property.getter, getter);
}

#[test]
fn test_properties_require_qualifying_getters() {
    let index = ClassIndex::from_classes([JvmClass::new(id("demo/Widget"), JvmClassKind::Class)
        .with_method(method("getTitle"))
        .with_method(JvmMethod::new("getFlush", JvmType::Primitive(JvmPrimitive::Void)))
        .with_method(method("getItem").with_parameter(JvmType::class(id("java/lang/String"))))
        .with_method(method("getShared").with_static())
        .with_method(method("getTag").with_type_parameter(JvmTypeParameter::new("X")))]);
    let session = Session::new();
    let scopes = ScopeSession::new();
    let provider = JvmSymbolProvider::new(&session, &index);

    let scope = provider.use_site_scope(&id("demo/Widget"), &scopes).unwrap();
    let properties = SyntheticPropertyScope::new(&session, scope.as_ref());
    let interner = session.interner();

    assert!(properties.find_property(interner.intern("title")).is_some());
    // Void-returning, parameterized, static and generic accessors do
    // not qualify.
    assert!(properties.find_property(interner.intern("flush")).is_none());
    assert!(properties.find_property(interner.intern("item")).is_none());
    assert!(properties.find_property(interner.intern("shared")).is_none());
    assert!(properties.find_property(interner.intern("tag")).is_none());
}

// ============================================================================
// ACCESSOR NAME DERIVATION
// ============================================================================

#[rstest]
#[case("foo", &["getFoo", "getFOO"])]
#[case("url", &["getUrl", "getURL"])]
#[case("xId", &["getXId"])]
#[case("isEnabled", &["getIsEnabled", "getISEnabled", "isEnabled"])]
#[case("island", &["getIsland", "getISLAND"])]
#[case("URL", &[])]
fn test_getter_candidates(#[case] property: &str, #[case] expected: &[&str]) {
    assert_eq!(getter_candidates(property), expected);
}

#[rstest]
#[case("getFoo", Some("foo"))]
#[case("getURL", Some("url"))]
#[case("getXId", Some("xId"))]
#[case("isEnabled", Some("isEnabled"))]
#[case("getter", None)]
#[case("island", None)]
#[case("get", None)]
#[case("size", None)]
fn test_property_name_from_getter(#[case] getter: &str, #[case] expected: Option<&str>) {
    assert_eq!(property_name_by_getter_name(getter).as_deref(), expected);
}
