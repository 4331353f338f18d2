//! Package-qualified class identifiers.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

/// Error produced when constructing a [`ClassId`] from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassIdError {
    /// The input had no class-name part (empty relative name).
    #[error("class id `{0}` has no class name")]
    MissingName(String),
    /// A package or class-name segment is not a valid identifier.
    #[error("invalid identifier segment `{segment}` in `{input}`")]
    InvalidSegment {
        /// The full input being parsed.
        input: String,
        /// The offending segment.
        segment: String,
    },
}

/// Identifier of a class as the platform names it: a package plus a
/// possibly-nested relative class name.
///
/// `ClassId` is the cache key for symbol resolution and the unit of
/// foreign lookup. It is an immutable value type; cloning is cheap
/// (two [`SmolStr`]s).
///
/// The textual form separates package segments with `/` and nesting
/// levels with `.`, so `java/util/Map.Entry` names the class `Entry`
/// nested in `Map` in package `java.util`. This keeps the two kinds
/// of qualification distinguishable in one string.
///
/// # Example
///
/// ```
/// use tarn::base::ClassId;
///
/// let id: ClassId = "java/util/Map.Entry".parse().unwrap();
/// assert_eq!(id.package(), "java.util");
/// assert_eq!(id.short_name(), "Entry");
/// assert_eq!(id.top_level_name(), "Map");
/// assert_eq!(id.parent().unwrap().to_string(), "java/util/Map");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    /// Dot-separated package name; empty for the default package.
    package: SmolStr,
    /// Dot-separated relative class name, outermost first. Never empty.
    relative: SmolStr,
}

impl ClassId {
    /// Create a `ClassId` from a dotted package and a dotted relative name.
    ///
    /// Both parts are validated segment by segment; the package may be
    /// empty (default package), the relative name may not.
    pub fn new(package: &str, relative: &str) -> Result<Self, ClassIdError> {
        if relative.is_empty() {
            return Err(ClassIdError::MissingName(format_input(package, relative)));
        }
        if !package.is_empty() {
            for segment in package.split('.') {
                check_segment(segment, || format_input(package, relative))?;
            }
        }
        for segment in relative.split('.') {
            check_segment(segment, || format_input(package, relative))?;
        }
        Ok(Self::from_parts(SmolStr::new(package), SmolStr::new(relative)))
    }

    /// Construct without validation.
    ///
    /// Callers must pass well-formed dotted parts; used for well-known
    /// ids and for values that were validated on the way in.
    pub(crate) fn from_parts(package: SmolStr, relative: SmolStr) -> Self {
        Self { package, relative }
    }

    /// The dotted package name (empty for the default package).
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The dotted relative class name, outermost class first.
    pub fn relative_name(&self) -> &str {
        &self.relative
    }

    /// The innermost (simple) class name.
    pub fn short_name(&self) -> &str {
        match self.relative.rsplit_once('.') {
            Some((_, last)) => last,
            None => &self.relative,
        }
    }

    /// The outermost class name in this id's nesting chain.
    ///
    /// For a top-level class this equals [`short_name`](Self::short_name).
    pub fn top_level_name(&self) -> &str {
        match self.relative.split_once('.') {
            Some((first, _)) => first,
            None => &self.relative,
        }
    }

    /// Whether this id names a nested class.
    pub fn is_nested(&self) -> bool {
        self.relative.contains('.')
    }

    /// The id of the enclosing class, if this id names a nested class.
    pub fn parent(&self) -> Option<ClassId> {
        let (outer, _) = self.relative.rsplit_once('.')?;
        Some(Self::from_parts(self.package.clone(), SmolStr::new(outer)))
    }

    /// The id of a class nested directly inside this one.
    pub fn nested(&self, name: &str) -> Result<ClassId, ClassIdError> {
        check_segment(name, || format!("{self}.{name}"))?;
        let relative = SmolStr::new(format!("{}.{}", self.relative, name));
        Ok(Self::from_parts(self.package.clone(), relative))
    }
}

fn format_input(package: &str, relative: &str) -> String {
    if package.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", package.replace('.', "/"), relative)
    }
}

/// Validate one identifier segment.
///
/// The platform allows `_` and `$` anywhere in an identifier on top of
/// the usual Unicode identifier characters.
fn check_segment(segment: &str, input: impl FnOnce() -> String) -> Result<(), ClassIdError> {
    let invalid = || ClassIdError::InvalidSegment {
        input: input(),
        segment: segment.to_string(),
    };
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if unicode_ident::is_xid_start(c) || c == '_' || c == '$' => {}
        _ => return Err(invalid()),
    }
    for c in chars {
        if !(unicode_ident::is_xid_continue(c) || c == '$') {
            return Err(invalid());
        }
    }
    Ok(())
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.relative)
        } else {
            write!(f, "{}/{}", self.package.replace('.', "/"), self.relative)
        }
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({self})")
    }
}

impl FromStr for ClassId {
    type Err = ClassIdError;

    /// Parse the `java/util/Map.Entry` textual form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (package_path, relative) = match s.rsplit_once('/') {
            Some((pkg, rel)) => (pkg, rel),
            None => ("", s),
        };
        if relative.is_empty() {
            return Err(ClassIdError::MissingName(s.to_string()));
        }
        let package = package_path.replace('/', ".");
        Self::new(&package, relative)
    }
}

#[cfg(feature = "interchange")]
mod serde_impls {
    use super::ClassId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for ClassId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for ClassId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(D::Error::custom)
        }
    }
}
