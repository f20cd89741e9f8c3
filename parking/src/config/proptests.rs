//! Property-based tests for configuration validation.

use super::schema::Config;
use super::validator::ConfigValidator;
use proptest::prelude::*;

// Strategy for generating HH:MM strings
fn time_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..24, 0u32..60)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Grid dimensions are accepted exactly when they fit one letter per
    // column and two digits per cell
    #[test]
    fn grid_limits(lots in 0u8..=10, rows in 0u8..=30, columns in 0u8..=30) {
        let config = Config { lots, rows, columns, ..Default::default() };
        let expected = lots > 0
            && rows > 0
            && columns > 0
            && columns <= 26
            && u16::from(rows) * u16::from(columns) <= 99;
        prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), expected);
    }

    // Service hours are accepted exactly when opening precedes closing
    #[test]
    fn hours_must_be_ordered(open in time_strategy(), close in time_strategy()) {
        let config = Config {
            opening_time: format!("{:02}:{:02}", open.0, open.1),
            closing_time: format!("{:02}:{:02}", close.0, close.1),
            ..Default::default()
        };
        prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), open < close);
    }

    // YAML serialization of a valid config reads back unchanged
    #[test]
    fn yaml_round_trip(lots in 1u8..=9, notice in 0u32..=600) {
        let config = Config { lots, minimum_notice_minutes: notice, ..Default::default() };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
