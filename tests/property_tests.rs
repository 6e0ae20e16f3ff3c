//! Property-Based Tests for Predicate Matching
//!
//! Properties: the literal pattern constructors (`contains`, `starts_with`,
//! `ends_with`) SHALL agree with the corresponding `str` methods for any
//! input, wildcard and escape characters included; the comparison predicates
//! SHALL compose consistently with one another; and narrowing a candidate
//! collection by an id set SHALL be monotonic and order-preserving.

use std::collections::HashSet;

use proptest::prelude::*;
use scopestore::{Predicate, Scope, Scopes};

proptest! {
    #[test]
    fn contains_agrees_with_str_contains(fragment in any::<String>(), hay in any::<String>()) {
        let predicate = Predicate::<String>::contains(&fragment);
        prop_assert_eq!(predicate.matches(&hay), hay.contains(&fragment));
    }

    #[test]
    fn starts_with_agrees_with_str_starts_with(prefix in any::<String>(), hay in any::<String>()) {
        let predicate = Predicate::<String>::starts_with(&prefix);
        prop_assert_eq!(predicate.matches(&hay), hay.starts_with(&prefix));
    }

    #[test]
    fn ends_with_agrees_with_str_ends_with(suffix in any::<String>(), hay in any::<String>()) {
        let predicate = Predicate::<String>::ends_with(&suffix);
        prop_assert_eq!(predicate.matches(&hay), hay.ends_with(&suffix));
    }

    #[test]
    fn every_value_contains_itself(value in any::<String>()) {
        prop_assert!(Predicate::<String>::contains(&value).matches(&value));
        prop_assert!(Predicate::<String>::starts_with(&value).matches(&value));
        prop_assert!(Predicate::<String>::ends_with(&value).matches(&value));
    }

    #[test]
    fn bare_percent_matches_everything(value in any::<String>()) {
        prop_assert!(Predicate::<String>::like("%").matches(&value));
    }

    #[test]
    fn between_is_the_intersection_of_its_bounds(lo: i64, hi: i64, value: i64) {
        let expected = Predicate::GreaterOrEqual(lo).matches(&value)
            && Predicate::LessOrEqual(hi).matches(&value);
        prop_assert_eq!(Predicate::Between(lo, hi).matches(&value), expected);
    }

    #[test]
    fn in_and_not_in_are_complements(values in prop::collection::vec(any::<i64>(), 0..8), probe: i64) {
        let contained = Predicate::In(values.clone()).matches(&probe);
        let excluded = Predicate::NotIn(values).matches(&probe);
        prop_assert_ne!(contained, excluded);
    }

    #[test]
    fn equal_and_not_equal_are_complements(left: i64, right: i64) {
        prop_assert_ne!(
            Predicate::Equal(left).matches(&right),
            Predicate::NotEqual(left).matches(&right)
        );
    }

    // Narrowing a candidate collection by a surviving id set only ever
    // shrinks it, keeps the original order, and is idempotent.
    #[test]
    fn narrowing_by_id_set_is_monotonic(
        ids in prop::collection::hash_set(0_i64..64, 0..16),
        keep in prop::collection::hash_set(0_i64..64, 0..16),
    ) {
        let mut ordered: Vec<i64> = ids.into_iter().collect();
        ordered.sort_unstable();
        let candidates: Scopes = ordered
            .iter()
            .map(|&id| Scope::new(id, format!("s{id}")))
            .collect();

        let narrowed = candidates.filter_by_ids(&keep);
        prop_assert!(narrowed.len() <= candidates.len());

        let narrowed_ids = narrowed.ids();
        let expected: Vec<i64> = ordered
            .iter()
            .copied()
            .filter(|id| keep.contains(id))
            .collect();
        prop_assert_eq!(&narrowed_ids, &expected);

        let original: HashSet<i64> = candidates.id_set();
        prop_assert!(narrowed_ids.iter().all(|id| keep.contains(id) && original.contains(id)));
        prop_assert_eq!(narrowed.filter_by_ids(&keep).ids(), narrowed_ids);
    }
}
