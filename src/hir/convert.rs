//! Conversion from platform type references to IR types.
//!
//! Conversion is purely syntactic: class references keep their
//! [`ClassId`](crate::base::ClassId) (after mapping) and are never
//! resolved to symbols here. The only context a conversion needs is the
//! type-parameter stack of the declaration site, for resolving type
//! variables by name.

use std::sync::Arc;

use super::decl::IrAnnotation;
use super::mapping::ClassMapper;
use super::type_params::TypeParameterStack;
use super::types::{IrClassRef, IrPrimitive, IrType};
use crate::jvm::{JvmAnnotation, JvmPrimitive, JvmType};

/// Converter for one declaration context.
///
/// Holds the mapper and the stack of type parameters visible at the
/// site being converted; a method body context layers the method's own
/// parameters on the class stack before constructing one of these.
pub(crate) struct TypeConverter<'a> {
    mapper: &'a ClassMapper,
    stack: &'a TypeParameterStack,
}

impl<'a> TypeConverter<'a> {
    pub(crate) fn new(mapper: &'a ClassMapper, stack: &'a TypeParameterStack) -> Self {
        Self { mapper, stack }
    }

    /// Convert one platform type reference.
    ///
    /// Never fails: a type variable that no stack segment declares
    /// becomes an [`IrType::Error`] carrying the variable name.
    pub(crate) fn convert(&self, ty: &JvmType) -> IrType {
        match ty {
            JvmType::Primitive(primitive) => convert_primitive(*primitive),
            JvmType::TypeVariable(name) => match self.stack.lookup(name) {
                Some(id) => IrType::TypeParameter(id),
                None => IrType::error(format!("unresolved type variable `{name}`")),
            },
            JvmType::Array(element) => IrType::Array(Arc::new(self.convert(element))),
            JvmType::Class { id, args } => {
                let args: Vec<IrType> = args.iter().map(|arg| self.convert(arg)).collect();
                let class_ref = match self.mapper.map(id) {
                    Some(mapped) => IrClassRef {
                        id: mapped.clone(),
                        unmapped: Some(id.clone()),
                        args: args.into(),
                    },
                    None => IrClassRef { id: id.clone(), unmapped: None, args: args.into() },
                };
                IrType::Class(class_ref)
            }
        }
    }

    /// Convert a list of types into an `Arc` slice.
    pub(crate) fn convert_all(&self, types: &[JvmType]) -> Arc<[IrType]> {
        types.iter().map(|ty| self.convert(ty)).collect::<Vec<_>>().into()
    }

    /// Convert annotation references, mapping their class ids.
    pub(crate) fn convert_annotations(&self, annotations: &[JvmAnnotation]) -> Arc<[IrAnnotation]> {
        annotations
            .iter()
            .map(|annotation| IrAnnotation {
                id: self
                    .mapper
                    .map(&annotation.id)
                    .cloned()
                    .unwrap_or_else(|| annotation.id.clone()),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

fn convert_primitive(primitive: JvmPrimitive) -> IrType {
    match primitive {
        JvmPrimitive::Void => IrType::Unit,
        JvmPrimitive::Boolean => IrType::Primitive(IrPrimitive::Boolean),
        JvmPrimitive::Char => IrType::Primitive(IrPrimitive::Char),
        JvmPrimitive::Byte => IrType::Primitive(IrPrimitive::Byte),
        JvmPrimitive::Short => IrType::Primitive(IrPrimitive::Short),
        JvmPrimitive::Int => IrType::Primitive(IrPrimitive::Int),
        JvmPrimitive::Long => IrType::Primitive(IrPrimitive::Long),
        JvmPrimitive::Float => IrType::Primitive(IrPrimitive::Float),
        JvmPrimitive::Double => IrType::Primitive(IrPrimitive::Double),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ClassId;
    use crate::hir::ids::TypeParamId;
    use smol_str::SmolStr;

    fn id(text: &str) -> ClassId {
        text.parse().unwrap()
    }

    fn convert(mapper: &ClassMapper, stack: &TypeParameterStack, ty: &JvmType) -> IrType {
        TypeConverter::new(mapper, stack).convert(ty)
    }

    #[test]
    fn test_primitives() {
        let mapper = ClassMapper::empty();
        let stack = TypeParameterStack::empty();

        assert_eq!(
            convert(&mapper, &stack, &JvmType::Primitive(JvmPrimitive::Int)),
            IrType::Primitive(IrPrimitive::Int)
        );
        assert_eq!(
            convert(&mapper, &stack, &JvmType::Primitive(JvmPrimitive::Void)),
            IrType::Unit
        );
    }

    #[test]
    fn test_array_of_arrays() {
        let mapper = ClassMapper::empty();
        let stack = TypeParameterStack::empty();
        let ty = JvmType::Array(Box::new(JvmType::Array(Box::new(JvmType::Primitive(
            JvmPrimitive::Byte,
        )))));

        let converted = convert(&mapper, &stack, &ty);
        let IrType::Array(outer) = converted else { panic!("expected array") };
        let IrType::Array(inner) = &*outer else { panic!("expected nested array") };
        assert_eq!(**inner, IrType::Primitive(IrPrimitive::Byte));
    }

    #[test]
    fn test_type_variable_resolves_through_stack() {
        let mapper = ClassMapper::empty();
        let param = TypeParamId::from_raw(3);
        let stack = TypeParameterStack::empty().extend([(SmolStr::new("T"), param)]);

        assert_eq!(
            convert(&mapper, &stack, &JvmType::variable("T")),
            IrType::TypeParameter(param)
        );
    }

    #[test]
    fn test_unknown_type_variable_becomes_error() {
        let mapper = ClassMapper::empty();
        let stack = TypeParameterStack::empty();

        let converted = convert(&mapper, &stack, &JvmType::variable("T"));
        assert!(converted.is_error());
    }

    #[test]
    fn test_mapped_class_keeps_unmapped_id() {
        let mapper = ClassMapper::new();
        let stack = TypeParameterStack::empty();

        let converted = convert(&mapper, &stack, &JvmType::class(id("java/util/List")));
        let class_ref = converted.as_class_ref().unwrap();

        assert_eq!(class_ref.id, id("tarn/List"));
        assert_eq!(class_ref.unmapped, Some(id("java/util/List")));
        assert!(class_ref.diverges());
    }

    #[test]
    fn test_unmapped_class_passes_through() {
        let mapper = ClassMapper::new();
        let stack = TypeParameterStack::empty();

        let converted = convert(&mapper, &stack, &JvmType::class(id("java/util/ArrayList")));
        let class_ref = converted.as_class_ref().unwrap();

        assert_eq!(class_ref.id, id("java/util/ArrayList"));
        assert_eq!(class_ref.unmapped, None);
    }

    #[test]
    fn test_type_arguments_convert_recursively() {
        let mapper = ClassMapper::new();
        let param = TypeParamId::from_raw(0);
        let stack = TypeParameterStack::empty().extend([(SmolStr::new("E"), param)]);
        let ty = JvmType::class_with_args(id("java/util/List"), vec![JvmType::variable("E")]);

        let converted = convert(&mapper, &stack, &ty);
        let class_ref = converted.as_class_ref().unwrap();

        assert_eq!(class_ref.id, id("tarn/List"));
        assert_eq!(class_ref.args.as_ref(), &[IrType::TypeParameter(param)]);
    }

    #[test]
    fn test_annotation_ids_are_mapped() {
        let mut mapper = ClassMapper::empty();
        mapper.add_mapping(id("java/lang/Deprecated"), id("tarn/Obsolete"));
        let stack = TypeParameterStack::empty();
        let converter = TypeConverter::new(&mapper, &stack);

        let converted = converter.convert_annotations(&[
            JvmAnnotation::new(id("java/lang/Deprecated")),
            JvmAnnotation::new(id("com/example/Custom")),
        ]);

        assert_eq!(converted[0].id, id("tarn/Obsolete"));
        assert_eq!(converted[1].id, id("com/example/Custom"));
    }
}
