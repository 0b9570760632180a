//! Property tests for normalization and deduplication.

use hcdw_transform::dedupe_by_key;
use hcdw_transform::normalization::{coerce_amount, coerce_integer, normalize_text};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_text_is_idempotent(value in ".{0,40}") {
        let once = normalize_text(Some(&value));
        let twice = normalize_text(Some(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_text_keeps_only_alphanumerics_and_spaces(value in ".{0,40}") {
        let normalized = normalize_text(Some(&value));
        prop_assert!(
            normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace())
        );
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    #[test]
    fn coerced_amount_is_never_negative(value in any::<f64>()) {
        if let Some(amount) = coerce_amount(Some(&value.to_string())) {
            prop_assert!(amount.value() >= 0.0);
            prop_assert!(amount.value().is_finite());
        }
    }

    #[test]
    fn dedupe_is_idempotent(rows in prop::collection::vec((0i64..8, any::<u8>()), 0..40)) {
        let (once, _) = dedupe_by_key(rows, |row| row.0);
        let (twice, removed) = dedupe_by_key(once.clone(), |row| row.0);
        prop_assert_eq!(once, twice);
        prop_assert_eq!(removed, 0);
    }

    #[test]
    fn integer_literals_coerce_exactly(value in any::<i64>()) {
        prop_assert_eq!(coerce_integer(Some(&value.to_string())), Some(value));
    }
}

#[test]
fn whole_real_keys_collapse_onto_integers() {
    assert_eq!(coerce_integer(Some("12.0")), coerce_integer(Some("12")));
    assert_eq!(coerce_integer(Some("12.5")), None);
}
