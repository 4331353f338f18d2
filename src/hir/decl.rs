//! IR declaration nodes.
//!
//! Nodes are frozen at the end of construction: the builder accumulates
//! declarations in local buffers and the finished node lands in the
//! session's class arena in one step. Every collection-valued field is
//! an `Arc` slice, so cloning a node out of the arena is cheap and no
//! caller can observe a half-built node.

use std::sync::Arc;

use crate::base::{ClassId, Name};
use crate::jvm::{JvmClassKind, JvmModality, JvmVisibility};

use super::ids::{ClassSymbolId, FieldId, FunctionId, TypeParamId};
use super::type_params::TypeParameterStack;
use super::types::IrType;

// ============================================================================
// FLAGS
// ============================================================================

/// Where a class node came from.
///
/// The origin decides how the use-site scope builder enumerates
/// supertypes: platform-imported classes walk their declared references
/// (with mapped/unmapped reconciliation), native classes go through the
/// session's direct-supertype lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Imported from platform metadata by the symbol provider.
    Jvm,
    /// Registered natively by the compiler (builtins, compiled sources).
    Source,
}

/// IR-side class kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// IR-side declaration visibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

/// IR-side inheritance modality.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Modality {
    Open,
    Final,
    Abstract,
}

/// Variance of a type parameter.
///
/// Platform type parameters are always invariant; the other variants
/// exist for native declarations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

impl From<JvmClassKind> for ClassKind {
    fn from(kind: JvmClassKind) -> Self {
        match kind {
            JvmClassKind::Class => ClassKind::Class,
            JvmClassKind::Interface => ClassKind::Interface,
            JvmClassKind::Enum => ClassKind::Enum,
            JvmClassKind::Annotation => ClassKind::Annotation,
        }
    }
}

impl From<JvmVisibility> for Visibility {
    fn from(visibility: JvmVisibility) -> Self {
        match visibility {
            JvmVisibility::Public => Visibility::Public,
            JvmVisibility::Protected => Visibility::Protected,
            JvmVisibility::PackagePrivate => Visibility::PackagePrivate,
            JvmVisibility::Private => Visibility::Private,
        }
    }
}

impl From<JvmModality> for Modality {
    fn from(modality: JvmModality) -> Self {
        match modality {
            JvmModality::Open => Modality::Open,
            JvmModality::Final => Modality::Final,
            JvmModality::Abstract => Modality::Abstract,
        }
    }
}

/// An annotation attached to an IR node, by annotation-class id
/// (post-mapping).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IrAnnotation {
    pub id: ClassId,
}

// ============================================================================
// NODES
// ============================================================================

/// An IR type-parameter node.
///
/// Allocated before its bounds are converted (two-pass construction),
/// so self-referencing bounds like `E extends Enum<E>` can point back
/// at the node being declared.
#[derive(Clone, Debug)]
pub struct TypeParamNode {
    pub name: Name,
    /// The class whose construction introduced this parameter; for
    /// method and constructor parameters, the declaring class.
    pub owner: ClassSymbolId,
    pub variance: Variance,
    pub reified: bool,
    /// Upper bounds. Never empty: a default bound is injected when the
    /// declaration has none.
    pub bounds: Arc<[IrType]>,
}

/// An IR field node.
#[derive(Clone, Debug)]
pub struct FieldNode {
    pub name: Name,
    pub owner: ClassSymbolId,
    pub ty: IrType,
    /// Platform fields are mutable exactly when they are non-final.
    pub is_mutable: bool,
    pub is_static: bool,
    pub visibility: Visibility,
    pub annotations: Arc<[IrAnnotation]>,
}

/// What a function node is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Method,
    Constructor {
        /// Set only on the synthesized default constructor; declared
        /// platform constructors are never primary.
        is_primary: bool,
        /// Whether the constructed class is nested and non-static.
        is_inner: bool,
    },
}

impl FunctionKind {
    pub fn is_constructor(self) -> bool {
        matches!(self, FunctionKind::Constructor { .. })
    }
}

/// A value parameter of a function.
#[derive(Clone, Debug)]
pub struct ValueParam {
    pub name: Option<Name>,
    pub ty: IrType,
}

/// An IR function node: a method or a constructor.
#[derive(Clone, Debug)]
pub struct FunctionNode {
    pub name: Name,
    pub owner: ClassSymbolId,
    pub kind: FunctionKind,
    /// The function's own declared type parameters only; the owning
    /// class's parameters are reachable through its stack.
    pub type_parameters: Arc<[TypeParamId]>,
    pub return_type: IrType,
    pub parameters: Arc<[ValueParam]>,
    pub is_static: bool,
    pub visibility: Visibility,
    pub annotations: Arc<[IrAnnotation]>,
}

impl FunctionNode {
    /// Whether the function declares type parameters of its own.
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// Number of value parameters.
    pub fn arity(&self) -> u32 {
        self.parameters.len() as u32
    }
}

/// An IR class node.
#[derive(Clone, Debug)]
pub struct ClassNode {
    pub id: ClassId,
    pub name: Name,
    pub kind: ClassKind,
    pub origin: ClassOrigin,
    pub visibility: Visibility,
    pub modality: Modality,
    pub is_static: bool,
    /// Whether the class has no enclosing class.
    pub is_top_level: bool,
    /// Whether the class is nested and non-static.
    pub is_inner: bool,
    pub type_parameters: Arc<[TypeParamId]>,
    /// The class's own parameter mapping, extending the enclosing
    /// class's stack when there is one.
    pub type_param_stack: TypeParameterStack,
    pub supertypes: Arc<[IrType]>,
    pub fields: Arc<[FieldId]>,
    pub methods: Arc<[FunctionId]>,
    pub constructors: Arc<[FunctionId]>,
    pub annotations: Arc<[IrAnnotation]>,
}
