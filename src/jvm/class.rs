//! Read-only metadata model for platform classes.
//!
//! These types describe what the platform knows about an already-compiled
//! class: its kind, flags, type parameters, supertypes and members. They
//! are produced by a [`JvmClassFinder`](super::JvmClassFinder)
//! implementation and never mutated by the resolution layer; fixture code
//! and the stub loader assemble them through the `with_*` builders.

use smol_str::SmolStr;

use crate::base::ClassId;

#[cfg(feature = "interchange")]
use serde::{Deserialize, Serialize};

// ============================================================================
// KINDS & FLAGS
// ============================================================================

/// What sort of class-like artifact a platform class is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub enum JvmClassKind {
    /// An ordinary class.
    #[default]
    Class,
    /// An interface.
    Interface,
    /// An enum class.
    Enum,
    /// An annotation interface.
    Annotation,
}

impl JvmClassKind {
    /// Whether this is a plain class (not an interface, enum or annotation).
    ///
    /// Only plain classes get a synthesized default constructor.
    pub fn is_plain_class(self) -> bool {
        matches!(self, JvmClassKind::Class)
    }
}

/// Platform visibility of a class or member.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub enum JvmVisibility {
    #[default]
    Public,
    Protected,
    /// Visible within the declaring package only (no modifier).
    PackagePrivate,
    Private,
}

/// Inheritance modality of a class.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub enum JvmModality {
    /// Neither `final` nor `abstract`.
    #[default]
    Open,
    Final,
    Abstract,
}

// ============================================================================
// TYPES
// ============================================================================

/// Primitive platform types, including `void`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub enum JvmPrimitive {
    Void,
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

/// A type reference as it appears in platform metadata.
///
/// Type variables are referenced by name, the way generic signatures
/// spell them; resolving a name to an actual type-parameter node is the
/// conversion layer's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub enum JvmType {
    Primitive(JvmPrimitive),
    Class {
        id: ClassId,
        #[cfg_attr(feature = "interchange", serde(default))]
        args: Vec<JvmType>,
    },
    TypeVariable(SmolStr),
    Array(Box<JvmType>),
}

impl JvmType {
    /// A non-generic class reference.
    pub fn class(id: ClassId) -> Self {
        JvmType::Class { id, args: Vec::new() }
    }

    /// A parameterized class reference.
    pub fn class_with_args(id: ClassId, args: Vec<JvmType>) -> Self {
        JvmType::Class { id, args }
    }

    /// A type-variable reference by name.
    pub fn variable(name: &str) -> Self {
        JvmType::TypeVariable(SmolStr::new(name))
    }
}

impl Default for JvmType {
    fn default() -> Self {
        JvmType::Primitive(JvmPrimitive::Void)
    }
}

/// A declared type parameter with its upper bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmTypeParameter {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub bounds: Vec<JvmType>,
}

impl JvmTypeParameter {
    /// A type parameter with no explicit bounds.
    pub fn new(name: &str) -> Self {
        Self { name: SmolStr::new(name), bounds: Vec::new() }
    }

    /// Add an upper bound.
    pub fn with_bound(mut self, bound: JvmType) -> Self {
        self.bounds.push(bound);
        self
    }
}

/// An annotation sitting on a class or member.
///
/// Only the annotation's class identity matters at this layer; argument
/// values are not modeled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmAnnotation {
    pub id: ClassId,
}

impl JvmAnnotation {
    pub fn new(id: ClassId) -> Self {
        Self { id }
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// A declared field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmField {
    pub name: SmolStr,
    pub ty: JvmType,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub visibility: JvmVisibility,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_final: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<JvmAnnotation>,
}

impl JvmField {
    pub fn new(name: &str, ty: JvmType) -> Self {
        Self {
            name: SmolStr::new(name),
            ty,
            visibility: JvmVisibility::Public,
            is_static: false,
            is_final: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: JvmVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn with_annotation(mut self, annotation: JvmAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A value parameter of a method or constructor.
///
/// Parameter names are optional; compiled metadata often drops them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmValueParameter {
    #[cfg_attr(feature = "interchange", serde(default))]
    pub name: Option<SmolStr>,
    pub ty: JvmType,
}

impl JvmValueParameter {
    pub fn new(ty: JvmType) -> Self {
        Self { name: None, ty }
    }

    pub fn named(name: &str, ty: JvmType) -> Self {
        Self { name: Some(SmolStr::new(name)), ty }
    }
}

/// A declared method.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmMethod {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub type_parameters: Vec<JvmTypeParameter>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub return_type: JvmType,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub parameters: Vec<JvmValueParameter>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub visibility: JvmVisibility,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<JvmAnnotation>,
}

impl JvmMethod {
    pub fn new(name: &str, return_type: JvmType) -> Self {
        Self {
            name: SmolStr::new(name),
            type_parameters: Vec::new(),
            return_type,
            parameters: Vec::new(),
            visibility: JvmVisibility::Public,
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, ty: JvmType) -> Self {
        self.parameters.push(JvmValueParameter::new(ty));
        self
    }

    pub fn with_named_parameter(mut self, name: &str, ty: JvmType) -> Self {
        self.parameters.push(JvmValueParameter::named(name, ty));
        self
    }

    pub fn with_type_parameter(mut self, tp: JvmTypeParameter) -> Self {
        self.type_parameters.push(tp);
        self
    }

    pub fn with_visibility(mut self, visibility: JvmVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_annotation(mut self, annotation: JvmAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A declared constructor.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmConstructor {
    #[cfg_attr(feature = "interchange", serde(default))]
    pub type_parameters: Vec<JvmTypeParameter>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub parameters: Vec<JvmValueParameter>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub visibility: JvmVisibility,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<JvmAnnotation>,
}

impl JvmConstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, ty: JvmType) -> Self {
        self.parameters.push(JvmValueParameter::new(ty));
        self
    }

    pub fn with_named_parameter(mut self, name: &str, ty: JvmType) -> Self {
        self.parameters.push(JvmValueParameter::named(name, ty));
        self
    }

    pub fn with_type_parameter(mut self, tp: JvmTypeParameter) -> Self {
        self.type_parameters.push(tp);
        self
    }

    pub fn with_visibility(mut self, visibility: JvmVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

// ============================================================================
// CLASS
// ============================================================================

/// Everything the platform reports about one compiled class.
///
/// # Example
///
/// ```
/// use tarn::base::ClassId;
/// use tarn::jvm::{JvmClass, JvmClassKind, JvmMethod, JvmType, JvmPrimitive};
///
/// let id = ClassId::new("com.example", "Point").unwrap();
/// let class = JvmClass::new(id, JvmClassKind::Class)
///     .with_method(JvmMethod::new("getX", JvmType::Primitive(JvmPrimitive::Int)));
/// assert_eq!(class.methods.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(Serialize, Deserialize))]
pub struct JvmClass {
    pub id: ClassId,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub kind: JvmClassKind,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub visibility: JvmVisibility,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub modality: JvmModality,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub type_parameters: Vec<JvmTypeParameter>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub supertypes: Vec<JvmType>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub fields: Vec<JvmField>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub methods: Vec<JvmMethod>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub constructors: Vec<JvmConstructor>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Vec<JvmAnnotation>,
}

impl JvmClass {
    pub fn new(id: ClassId, kind: JvmClassKind) -> Self {
        Self {
            id,
            kind,
            visibility: JvmVisibility::Public,
            modality: JvmModality::Open,
            is_static: false,
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: JvmVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: JvmModality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_type_parameter(mut self, tp: JvmTypeParameter) -> Self {
        self.type_parameters.push(tp);
        self
    }

    pub fn with_supertype(mut self, ty: JvmType) -> Self {
        self.supertypes.push(ty);
        self
    }

    pub fn with_field(mut self, field: JvmField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: JvmMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: JvmConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_annotation(mut self, annotation: JvmAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Whether an annotation with the given class id sits on this class.
    pub fn has_annotation(&self, id: &ClassId) -> bool {
        self.annotations.iter().any(|a| &a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_id() -> ClassId {
        ClassId::new("com.example", "Point").unwrap()
    }

    #[test]
    fn test_builder_chain() {
        let class = JvmClass::new(point_id(), JvmClassKind::Class)
            .with_modality(JvmModality::Final)
            .with_field(JvmField::new("x", JvmType::Primitive(JvmPrimitive::Int)).with_final())
            .with_method(JvmMethod::new("getX", JvmType::Primitive(JvmPrimitive::Int)))
            .with_constructor(
                JvmConstructor::new().with_parameter(JvmType::Primitive(JvmPrimitive::Int)),
            );

        assert_eq!(class.modality, JvmModality::Final);
        assert_eq!(class.fields.len(), 1);
        assert!(class.fields[0].is_final);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.constructors[0].parameters.len(), 1);
    }

    #[test]
    fn test_has_annotation() {
        let marker = ClassId::new("tarn", "Metadata").unwrap();
        let class = JvmClass::new(point_id(), JvmClassKind::Class)
            .with_annotation(JvmAnnotation::new(marker.clone()));

        assert!(class.has_annotation(&marker));
        assert!(!class.has_annotation(&point_id()));
    }

    #[test]
    fn test_plain_class_kind() {
        assert!(JvmClassKind::Class.is_plain_class());
        assert!(!JvmClassKind::Interface.is_plain_class());
        assert!(!JvmClassKind::Enum.is_plain_class());
        assert!(!JvmClassKind::Annotation.is_plain_class());
    }
}
