//! Synthetic properties over platform getters.
//!
//! A zero-argument platform accessor like `getName()` is surfaced as a
//! read-only property `name`. The mapping between property and getter
//! names follows the platform's bean convention, including its acronym
//! quirks: `url` pairs with both `getUrl` and `getURL`, a name that
//! already starts with `is` pairs with itself, and a name like `URL`
//! that no getter round-trips back to has no synthetic property at
//! all. Candidate derivation and the reverse derivation used to vet it
//! are both ASCII-only.

use super::MemberScope;
use crate::base::Name;
use crate::hir::ids::FunctionId;
use crate::hir::session::Session;
use crate::hir::types::IrType;

// ============================================================================
// NAME DERIVATION
// ============================================================================

/// Uppercase the first character when it is an ASCII lowercase letter.
fn capitalize_ascii(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        _ => name.to_string(),
    }
}

/// Uppercase the leading lowercase word: `fooBar` becomes `FOOBar`, a
/// fully lowercase name is uppercased wholly, and a name that does not
/// start lowercase is left alone.
fn capitalize_first_word(name: &str) -> String {
    match name.find(|c: char| !c.is_ascii_lowercase()) {
        None => name.to_ascii_uppercase(),
        Some(0) => name.to_string(),
        Some(second_word) => {
            let mut out = name[..second_word].to_ascii_uppercase();
            out.push_str(&name[second_word..]);
            out
        }
    }
}

/// Lowercase a leading capital, treating a run of capitals as an
/// acronym: `Foo` becomes `foo`, `URL` becomes `url`, and `ISEnabled`
/// becomes `isEnabled` because the last capital of the run starts the
/// next word.
fn decapitalize_smart(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return String::new() };
    if !first.is_ascii_uppercase() {
        return name.to_string();
    }
    match chars.next() {
        Some(second) if second.is_ascii_uppercase() => {
            match name.find(|c: char| !c.is_ascii_uppercase()) {
                None => name.to_ascii_lowercase(),
                Some(second_word) => {
                    let mut out = name[..second_word - 1].to_ascii_lowercase();
                    out.push_str(&name[second_word - 1..]);
                    out
                }
            }
        }
        _ => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_lowercase());
            out.push_str(&name[1..]);
            out
        }
    }
}

/// Whether `name` is an `is`-prefixed accessor name: `isEnabled` is,
/// `island` and a bare `is` are not.
fn starts_with_is_prefix(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("is") else { return false };
    rest.chars().next().is_some_and(|c| !c.is_ascii_lowercase())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    (unicode_ident::is_xid_start(first) || first == '_')
        && chars.all(unicode_ident::is_xid_continue)
}

/// The property name a getter of this name stands for, or `None` when
/// the name is not an accessor name at all (`getter` is not, because a
/// lowercase letter follows the prefix).
pub fn property_name_by_getter_name(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("get") {
        let first = rest.chars().next()?;
        if first.is_ascii_lowercase() {
            return None;
        }
        let property = decapitalize_smart(rest);
        return is_identifier(&property).then_some(property);
    }
    starts_with_is_prefix(name).then(|| name.to_string())
}

/// Getter names that may back a property of this name, in probe order.
///
/// Each candidate must derive back to exactly `property_name`; the
/// round trip is what rules out `getURL` for a property literally
/// named `URL`.
pub fn getter_candidates(property_name: &str) -> Vec<String> {
    let capitalized = capitalize_ascii(property_name);
    let first_word = capitalize_first_word(property_name);
    let mut candidates = Vec::with_capacity(3);
    candidates.push(format!("get{capitalized}"));
    if first_word != capitalized {
        candidates.push(format!("get{first_word}"));
    }
    if property_name.starts_with("is") {
        candidates.push(property_name.to_string());
    }
    candidates.retain(|candidate| {
        property_name_by_getter_name(candidate).as_deref() == Some(property_name)
    });
    candidates
}

// ============================================================================
// SCOPE
// ============================================================================

/// A synthetic read-only property backed by a platform getter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertySymbol {
    /// The property name the lookup asked for.
    pub name: Name,
    /// The accessor the property reads through.
    pub getter: FunctionId,
}

/// Property view over a member scope.
///
/// Lookups derive the candidate getter names for the requested
/// property, probe the base scope for each, and keep the functions
/// that qualify as getters: zero-argument, non-static, non-generic,
/// with a value-bearing return type. Functions that miss any condition
/// are skipped without diagnostics.
pub struct SyntheticPropertyScope<'a> {
    session: &'a Session,
    base: &'a dyn MemberScope,
}

impl<'a> SyntheticPropertyScope<'a> {
    pub fn new(session: &'a Session, base: &'a dyn MemberScope) -> Self {
        Self { session, base }
    }

    /// Every property backed by a qualifying getter named for `name`,
    /// in candidate probe order.
    pub fn process_properties(&self, name: Name, f: &mut dyn FnMut(PropertySymbol)) {
        let Some(text) = self.session.interner().lookup(name) else { return };
        for candidate in getter_candidates(&text) {
            let candidate_name = self.session.interner().intern(&candidate);
            self.base.for_each_function(candidate_name, &mut |function| {
                if self.qualifies_as_getter(function) {
                    f(PropertySymbol { name, getter: function });
                }
            });
        }
    }

    /// First property for `name`, if any getter qualifies.
    pub fn find_property(&self, name: Name) -> Option<PropertySymbol> {
        let mut found = None;
        self.process_properties(name, &mut |property| {
            if found.is_none() {
                found = Some(property);
            }
        });
        found
    }

    /// Collecting convenience over [`Self::process_properties`].
    pub fn properties_named(&self, name: Name) -> Vec<PropertySymbol> {
        let mut properties = Vec::new();
        self.process_properties(name, &mut |property| properties.push(property));
        properties
    }

    /// Property names derivable from the base scope's function names.
    ///
    /// Advisory: derivation alone decides membership here, so a name
    /// may still come back empty from [`Self::properties_named`] when
    /// its only getter fails the qualification filter.
    pub fn property_names(&self) -> Vec<Name> {
        let interner = self.session.interner();
        let mut names: Vec<Name> = self
            .base
            .function_names()
            .into_iter()
            .filter_map(|name| {
                let text = interner.lookup(name)?;
                let property = property_name_by_getter_name(&text)?;
                Some(interner.intern(&property))
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn qualifies_as_getter(&self, function: FunctionId) -> bool {
        let function = self.session.function(function);
        function.parameters.is_empty()
            && !function.is_static
            && !function.is_generic()
            && !matches!(function.return_type, IrType::Unit)
    }
}
