//! IR type references.
//!
//! Class references carry a [`ClassId`] rather than a resolved symbol:
//! conversion from platform metadata never resolves classes, resolution
//! happens lazily when a scope or supertype is actually needed. A
//! reference remembers both its mapped id (the builtin the class mapper
//! translated it to) and, when mapping changed the id, the original
//! platform id.

use std::sync::Arc;

use smol_str::SmolStr;

use super::ids::TypeParamId;
use crate::base::ClassId;

/// Primitive IR value types, converted 1:1 from platform primitives.
///
/// `void` is not here; it converts to [`IrType::Unit`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrPrimitive {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

/// A reference to a class-like type, possibly parameterized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IrClassRef {
    /// The id this reference resolves through (post-mapping).
    pub id: ClassId,
    /// The original platform id, present only when mapping changed it.
    pub unmapped: Option<ClassId>,
    /// Type arguments, empty for raw references.
    pub args: Arc<[IrType]>,
}

impl IrClassRef {
    /// A plain, unparameterized reference.
    pub fn new(id: ClassId) -> Self {
        Self { id, unmapped: None, args: Arc::from(Vec::new()) }
    }

    /// A parameterized reference.
    pub fn with_args(id: ClassId, args: Vec<IrType>) -> Self {
        Self { id, unmapped: None, args: Arc::from(args) }
    }

    /// Whether this reference has two representations: the mapped id it
    /// resolves through and a distinct unmapped platform id.
    pub fn diverges(&self) -> bool {
        self.unmapped.is_some()
    }
}

/// An IR type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    Class(IrClassRef),
    /// Reference to a type-parameter node by identity.
    TypeParameter(TypeParamId),
    Primitive(IrPrimitive),
    /// The unit type; platform `void` converts to this.
    Unit,
    Array(Arc<IrType>),
    /// A reference that could not be represented; the payload says why.
    Error(SmolStr),
}

impl IrType {
    /// A plain class reference.
    pub fn class(id: ClassId) -> Self {
        IrType::Class(IrClassRef::new(id))
    }

    /// An error type with a human-readable reason.
    pub fn error(reason: impl Into<SmolStr>) -> Self {
        IrType::Error(reason.into())
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, IrType::Unit)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, IrType::Error(_))
    }

    /// The class reference inside this type, if it is a class type.
    pub fn as_class_ref(&self) -> Option<&IrClassRef> {
        match self {
            IrType::Class(class_ref) => Some(class_ref),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> ClassId {
        text.parse().unwrap()
    }

    #[test]
    fn test_unit_and_error_predicates() {
        assert!(IrType::Unit.is_unit());
        assert!(!IrType::Primitive(IrPrimitive::Int).is_unit());
        assert!(IrType::error("unresolved").is_error());
        assert!(!IrType::class(id("java/lang/Object")).is_error());
    }

    #[test]
    fn test_divergence() {
        let mut reference = IrClassRef::new(id("tarn/List"));
        assert!(!reference.diverges());

        reference.unmapped = Some(id("java/util/List"));
        assert!(reference.diverges());
    }

    #[test]
    fn test_as_class_ref() {
        let ty = IrType::class(id("java/lang/Object"));
        assert_eq!(ty.as_class_ref().unwrap().id, id("java/lang/Object"));
        assert!(IrType::Unit.as_class_ref().is_none());
    }
}
