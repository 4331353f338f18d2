//! Mapping between platform classes and the Tarn builtins that shadow
//! them.
//!
//! A handful of platform classes are not surfaced as-is: Tarn ships its
//! own `tarn.Any`, `tarn.List` and friends, and references to the
//! platform originals must resolve to those instead. The [`ClassMapper`]
//! owns that substitution table along with the other well-known ids the
//! bridge consults (the metadata marker annotation and the default
//! upper bound for type parameters).

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::ClassId;

fn well_known(package: &'static str, name: &'static str) -> ClassId {
    ClassId::from_parts(SmolStr::new_static(package), SmolStr::new_static(name))
}

/// Substitution table from platform class ids to Tarn builtin ids.
///
/// The default table covers the builtins every session needs:
///
/// | platform             | tarn              |
/// |----------------------|-------------------|
/// | `java/lang/Object`   | `tarn/Any`        |
/// | `java/lang/Iterable` | `tarn/Iterable`   |
/// | `java/util/Collection` | `tarn/Collection` |
/// | `java/util/List`     | `tarn/List`       |
/// | `java/util/Map`      | `tarn/Map`        |
///
/// # Example
///
/// ```
/// use tarn::base::ClassId;
/// use tarn::hir::ClassMapper;
///
/// let mapper = ClassMapper::new();
/// let object: ClassId = "java/lang/Object".parse().unwrap();
/// assert_eq!(mapper.map(&object).unwrap().to_string(), "tarn/Any");
/// ```
#[derive(Debug, Clone)]
pub struct ClassMapper {
    to_tarn: IndexMap<ClassId, ClassId>,
    metadata_marker: ClassId,
    default_bound: ClassId,
}

impl ClassMapper {
    /// Mapper with the builtin substitution table.
    pub fn new() -> Self {
        let mut mapper = Self::empty();
        mapper.add_mapping(well_known("java.lang", "Object"), well_known("tarn", "Any"));
        mapper.add_mapping(
            well_known("java.lang", "Iterable"),
            well_known("tarn", "Iterable"),
        );
        mapper.add_mapping(
            well_known("java.util", "Collection"),
            well_known("tarn", "Collection"),
        );
        mapper.add_mapping(well_known("java.util", "List"), well_known("tarn", "List"));
        mapper.add_mapping(well_known("java.util", "Map"), well_known("tarn", "Map"));
        mapper
    }

    /// Mapper with no substitutions at all.
    ///
    /// The well-known marker and bound ids are still present; only the
    /// class table starts out empty.
    pub fn empty() -> Self {
        Self {
            to_tarn: IndexMap::new(),
            metadata_marker: well_known("tarn", "Metadata"),
            default_bound: well_known("tarn", "Any"),
        }
    }

    /// Register a substitution from a platform id to a Tarn id.
    pub fn add_mapping(&mut self, platform: ClassId, tarn: ClassId) {
        self.to_tarn.insert(platform, tarn);
    }

    /// The Tarn id a platform id is substituted with, if any.
    pub fn map(&self, id: &ClassId) -> Option<&ClassId> {
        self.to_tarn.get(id)
    }

    /// All substitutions, in registration order.
    pub fn mappings(&self) -> impl Iterator<Item = (&ClassId, &ClassId)> {
        self.to_tarn.iter()
    }

    /// The marker annotation that excludes a platform class from
    /// resolution. Classes carrying it are compiled Tarn output, and
    /// loading them through the bridge would shadow their source form.
    pub fn metadata_marker(&self) -> &ClassId {
        &self.metadata_marker
    }

    /// Upper bound injected for type parameters declared without one.
    pub fn default_upper_bound(&self) -> &ClassId {
        &self.default_bound
    }
}

impl Default for ClassMapper {
    fn default() -> Self {
        Self::new()
    }
}
