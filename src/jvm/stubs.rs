//! JSON class-stub interchange.
//!
//! A stub document is a JSON object with a `classes` array of
//! [`JvmClass`] values (class ids in their `pkg/Outer.Inner` string
//! form). Stubs exist so that toolchains and tests can ship platform
//! metadata without a classpath; [`load_index`] turns a document into a
//! ready [`ClassIndex`] and [`dump_index`] writes one back out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ClassIndex, JvmClass};
use crate::base::ClassId;

/// Error produced while reading or writing a stub document.
#[derive(Debug, Error)]
pub enum StubError {
    /// The document is not valid JSON or does not match the schema.
    #[error("malformed stub document: {0}")]
    Parse(#[from] serde_json::Error),
    /// The same class id appears twice.
    #[error("duplicate class `{0}` in stub document")]
    Duplicate(ClassId),
}

#[derive(Serialize, Deserialize)]
struct StubDocument {
    classes: Vec<JvmClass>,
}

/// Parse a stub document into a [`ClassIndex`].
pub fn load_index(json: &str) -> Result<ClassIndex, StubError> {
    let document: StubDocument = serde_json::from_str(json)?;
    let mut index = ClassIndex::new();
    for class in document.classes {
        if index.contains(&class.id) {
            return Err(StubError::Duplicate(class.id));
        }
        index.add_class(class);
    }
    Ok(index)
}

/// Serialize an index back into a stub document.
///
/// Classes are written sorted by id so output is stable across runs.
pub fn dump_index(index: &ClassIndex) -> Result<String, StubError> {
    let mut classes: Vec<JvmClass> = index.classes().map(|c| (**c).clone()).collect();
    classes.sort_by(|a, b| a.id.cmp(&b.id));
    let document = StubDocument { classes };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::{JvmClassKind, JvmMethod, JvmType};

    const SAMPLE: &str = r#"{
        "classes": [
            {
                "id": "java/lang/Object",
                "methods": [
                    { "name": "hashCode", "return_type": { "Primitive": "Int" } }
                ]
            },
            {
                "id": "java/util/Map.Entry",
                "kind": "Interface"
            }
        ]
    }"#;

    #[test]
    fn test_load_sample_document() {
        let index = load_index(SAMPLE).unwrap();

        assert_eq!(index.len(), 2);
        let object = index.get(&"java/lang/Object".parse().unwrap()).unwrap();
        assert_eq!(object.methods.len(), 1);
        assert_eq!(object.methods[0].name, "hashCode");

        let entry = index.get(&"java/util/Map.Entry".parse().unwrap()).unwrap();
        assert_eq!(entry.kind, JvmClassKind::Interface);
    }

    #[test]
    fn test_duplicate_rejected() {
        let doc = r#"{ "classes": [ { "id": "a/B" }, { "id": "a/B" } ] }"#;
        assert!(matches!(load_index(doc), Err(StubError::Duplicate(_))));
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(matches!(load_index("{"), Err(StubError::Parse(_))));
        assert!(matches!(
            load_index(r#"{ "classes": [ { "id": "not a class id" } ] }"#),
            Err(StubError::Parse(_))
        ));
    }

    #[test]
    fn test_dump_then_load_preserves_classes() {
        let mut index = ClassIndex::new();
        index.add_class(
            JvmClass::new("com/example/Widget".parse().unwrap(), JvmClassKind::Class)
                .with_method(JvmMethod::new("getName", JvmType::class("java/lang/String".parse().unwrap()))),
        );

        let json = dump_index(&index).unwrap();
        let reloaded = load_index(&json).unwrap();

        assert_eq!(reloaded.len(), 1);
        let widget = reloaded.get(&"com/example/Widget".parse().unwrap()).unwrap();
        assert_eq!(widget.methods[0].name, "getName");
    }
}
