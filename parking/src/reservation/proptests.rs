//! Property-based tests for slot conflict detection.

use super::Slot;
use crate::inventory::{Lot, SpaceCode};
use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

// Minutes since midnight within the service day, as (start, end) with start < end.
fn interval_strategy() -> impl Strategy<Value = (u32, u32)> {
    (480u32..1380).prop_flat_map(|start| (Just(start), (start + 1)..=1380))
}

fn minute(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
}

fn slot_at(space: &str, (start, end): (u32, u32)) -> Slot {
    Slot {
        lot: Lot::try_from(1).unwrap(),
        space: space.parse::<SpaceCode>().unwrap(),
        date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        start: minute(start),
        end: minute(end),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Conflict is symmetric
    #[test]
    fn conflict_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
        let x = slot_at("01A", a);
        let y = slot_at("01A", b);
        prop_assert_eq!(x.conflicts_with(&y), y.conflicts_with(&x));
    }

    // Conflict holds exactly when the intervals share at least one minute
    #[test]
    fn conflict_matches_shared_minutes(a in interval_strategy(), b in interval_strategy()) {
        let shared = (a.0..a.1).any(|m| (b.0..b.1).contains(&m));
        prop_assert_eq!(slot_at("01A", a).conflicts_with(&slot_at("01A", b)), shared);
    }

    // A slot ending where another starts never conflicts
    #[test]
    fn back_to_back_never_conflicts(start in 480u32..1300, first in 1u32..40, second in 1u32..40) {
        let middle = start + first;
        let earlier = slot_at("01A", (start, middle));
        let later = slot_at("01A", (middle, middle + second));
        prop_assert!(!earlier.conflicts_with(&later));
    }

    // A slot always conflicts with itself, never with another space
    #[test]
    fn identity_and_space_separation(a in interval_strategy()) {
        let x = slot_at("01A", a);
        prop_assert!(x.conflicts_with(&x));
        prop_assert!(!x.conflicts_with(&slot_at("02B", a)));
    }
}
