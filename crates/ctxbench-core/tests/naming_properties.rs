//! Properties of artifact names and size bounds

use ctxbench_core::artifact::{format_symbol_list, in_order_artifact_name, sanitize_network_name};
use ctxbench_core::SizeBounds;
use proptest::prelude::*;
use std::time::Duration;

proptest! {
    #[test]
    fn prop_sanitized_names_are_path_safe(name in ".{0,60}") {
        let clean = sanitize_network_name(&name);
        prop_assert!(!clean.contains(['[', ']', '\'', ',', ' ']));
        prop_assert_eq!(sanitize_network_name(&clean), clean.clone());
    }

    #[test]
    fn prop_symbol_lists_sanitize_to_dash_joined(symbols in proptest::collection::vec("[A-Z][A-Z0-9]{0,5}", 1..10)) {
        let listed = format_symbol_list(&symbols);
        prop_assert_eq!(sanitize_network_name(&listed), symbols.join("-"));
    }

    #[test]
    fn prop_in_order_names_lead_with_size_and_iteration(
        size in 1..100usize,
        iteration in 1..100usize,
        millis in 0..100_000u64,
    ) {
        let name = in_order_artifact_name(size, iteration, Duration::from_millis(millis), "n");
        let expected_prefix = format!("size-{size}-iter-{iteration}-time-");
        prop_assert!(name.starts_with(&expected_prefix));
        prop_assert!(name.ends_with("-n.graphml"));
    }

    #[test]
    fn prop_size_bounds_display_parses_back(min in any::<u32>(), max in any::<u32>()) {
        let bounds = SizeBounds { min, max };
        prop_assert_eq!(bounds.to_string().parse::<SizeBounds>().unwrap(), bounds);
    }
}
