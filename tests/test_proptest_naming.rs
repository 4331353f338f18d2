//! Property-based tests for accessor name derivation.
//!
//! The getter-candidate list and the reverse derivation are two halves
//! of one convention; these tests pin their agreement over generated
//! names instead of enumerating the acronym corner cases by hand.
#![cfg(feature = "proptest")]

use proptest::prelude::*;
use tarn::hir::scopes::synthetic::{getter_candidates, property_name_by_getter_name};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Property-name shapes: camelCase, acronym-leading, `is`-prefixed.
fn arb_property_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-zA-Z0-9]{0,10}",
        1 => "[A-Z]{1,4}[a-z0-9]{0,6}",
        1 => "is[A-Z][a-zA-Z0-9]{0,8}",
        1 => "_[a-z]{1,8}",
    ]
}

/// Method-name shapes, weighted toward accessor-looking names.
fn arb_method_name() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => "get[A-Z][a-zA-Z0-9]{0,8}",
        2 => "is[A-Z][a-zA-Z0-9]{0,8}",
        1 => "[a-z][a-zA-Z0-9]{0,10}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Every candidate the forward derivation offers must derive back
    /// to exactly the property it was offered for.
    #[test]
    fn prop_candidates_round_trip(name in arb_property_name()) {
        for candidate in getter_candidates(&name) {
            let derived = property_name_by_getter_name(&candidate);
            prop_assert_eq!(
                derived.as_deref(),
                Some(name.as_str()),
                "candidate `{}` does not derive back to `{}`",
                candidate,
                name
            );
        }
    }

    /// At most three candidates, never duplicated.
    #[test]
    fn prop_candidates_are_distinct_and_bounded(name in arb_property_name()) {
        let candidates = getter_candidates(&name);
        prop_assert!(candidates.len() <= 3);
        let mut deduped = candidates.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), candidates.len());
    }

    /// A name the reverse derivation accepts as an accessor must be
    /// offered as a candidate for the property it derives.
    #[test]
    fn prop_accessor_names_appear_in_their_property_candidates(name in arb_method_name()) {
        if let Some(property) = property_name_by_getter_name(&name) {
            prop_assert!(
                getter_candidates(&property).contains(&name),
                "`{}` derives `{}` but is not among its candidates",
                name,
                property
            );
        }
    }

    /// A property can only be its own getter when it is `is`-prefixed.
    #[test]
    fn prop_self_named_candidates_are_is_prefixed(name in arb_property_name()) {
        if getter_candidates(&name).contains(&name) {
            prop_assert!(name.starts_with("is"));
        }
    }
}
