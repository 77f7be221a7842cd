//! Filter normalization and evaluation tests

use proptest::prelude::*;
use serde_json::json;
use term_dictionary_sdk::dictionary::{DictionaryBuilder, DictionaryConfig, TermIndex};
use term_dictionary_sdk::filter::{
    EntityRows, FilterEvaluator, FilterNode, Join, LeafFilter, MatchSet, NumericInterval,
    evaluate, normalize,
};
use term_dictionary_sdk::source::{TabularData, parse_table};

const COHORT: &str = "id,sex,age\n1,M,10\n2,F,20\n3,F,30\n";

fn fixture(raw: &str) -> (TabularData, TermIndex) {
    let data = parse_table(raw, b',').unwrap();
    let config = DictionaryConfig::builder().entity_key_column("id").build();
    let index = DictionaryBuilder::with_config(config).build(&data).unwrap();
    (data, index)
}

fn run(raw_filter: serde_json::Value) -> Vec<String> {
    let (data, index) = fixture(COHORT);
    let rows = EntityRows::new(&data, index.entity_key_column());
    let filter = normalize(&raw_filter);
    evaluate(filter.as_ref(), &rows, &index).to_sorted_vec()
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_sex_equals_f() {
        let keys = run(json!({
            "type": "leaf", "termId": "sex", "kind": "categorical", "values": ["F"]
        }));
        assert_eq!(keys, vec!["2", "3"]);
    }

    #[test]
    fn test_not_sex_equals_f() {
        let keys = run(json!({
            "type": "leaf", "termId": "sex", "kind": "categorical",
            "negate": true, "values": ["F"]
        }));
        assert_eq!(keys, vec!["1"]);
    }

    #[test]
    fn test_age_ranges() {
        let closed = run(json!({
            "type": "leaf", "termId": "age", "kind": "numeric",
            "ranges": [{"min": 20, "max": 30, "includeMin": true, "includeMax": true}]
        }));
        assert_eq!(closed, vec!["2", "3"]);

        let open = run(json!({
            "type": "leaf", "termId": "age", "kind": "numeric",
            "ranges": [{"min": 20, "max": 30, "includeMin": false, "includeMax": false}]
        }));
        assert!(open.is_empty());
    }

    #[test]
    fn test_or_group() {
        let keys = run(json!({
            "type": "group", "join": "or", "negate": false,
            "children": [
                {"type": "leaf", "termId": "sex", "kind": "categorical", "values": ["F"]},
                {"type": "leaf", "termId": "age", "kind": "numeric",
                 "ranges": [{"min": null, "max": 15, "includeMax": false}]}
            ]
        }));
        assert_eq!(keys, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_interval_boundary_exactness() {
        let keys = run(json!({
            "type": "leaf", "termId": "age", "kind": "numeric",
            "ranges": [{"min": 10, "max": 20, "includeMin": false, "includeMax": true}]
        }));
        assert_eq!(keys, vec!["2"]);
    }

    #[test]
    fn test_legacy_shape_matches_canonical() {
        let legacy = run(json!({
            "type": "tvslst", "join": "and", "in": true,
            "lst": [{
                "type": "tvs",
                "tvs": {"term": {"id": "sex", "type": "categorical"}, "values": [{"key": "F"}]}
            }, {
                "type": "tvs",
                "tvs": {
                    "term": {"id": "age", "type": "integer"},
                    "ranges": [{"start": 25, "stopunbounded": true}]
                }
            }]
        }));
        assert_eq!(legacy, vec!["3"]);
    }

    #[test]
    fn test_null_and_empty_filters_match_everything() {
        assert_eq!(run(serde_json::Value::Null), vec!["1", "2", "3"]);
        assert_eq!(run(json!([])), vec!["1", "2", "3"]);
        assert_eq!(
            run(json!({"type": "tvslst", "join": "and", "lst": []})),
            vec!["1", "2", "3"]
        );
    }

    #[test]
    fn test_group_of_dropped_children_matches_nothing() {
        let keys = run(json!({"type": "group", "join": "and", "children": [null]}));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_stale_term_does_not_abort_tree() {
        let keys = run(json!({
            "type": "group", "join": "or",
            "children": [
                {"type": "leaf", "termId": "removed_column", "values": ["x"]},
                {"type": "leaf", "termId": "sex", "values": ["M"]}
            ]
        }));
        assert_eq!(keys, vec!["1"]);
    }
}

mod cache_tests {
    use super::*;

    #[test]
    fn test_repeated_leaf_scans_once() {
        let (data, index) = fixture(COHORT);
        let rows = EntityRows::new(&data, 0);
        let leaf = || FilterNode::from(LeafFilter::categorical("sex", ["F"]));
        let tree = FilterNode::and(vec![
            leaf(),
            FilterNode::or(vec![leaf(), leaf().negated()]),
        ]);

        let mut evaluator = FilterEvaluator::new(&rows, &index);
        let result = evaluator.evaluate(Some(&tree));
        assert_eq!(result.to_sorted_vec(), vec!["2", "3"]);

        let stats = evaluator.stats();
        // the negated leaf has its own cache entry
        assert_eq!(stats.leaves_evaluated, 2);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_deterministic_results() {
        let (data, index) = fixture(COHORT);
        let rows = EntityRows::new(&data, 0);
        let tree = FilterNode::or(vec![
            LeafFilter::numeric("age", vec![NumericInterval::above(15.0, false)]).into(),
            LeafFilter::categorical("sex", ["M"]).into(),
        ]);

        let first = evaluate(Some(&tree), &rows, &index);
        let second = evaluate(Some(&tree), &rows, &index);
        assert_eq!(first, second);
    }
}

// ============================================================================
// Property tests for the set algebra of evaluation
// ============================================================================

fn cohort_strategy() -> impl Strategy<Value = Vec<(&'static str, u32)>> {
    prop::collection::vec((prop::sample::select(vec!["M", "F", ""]), 0u32..100), 1..40)
}

fn cohort_text(rows: &[(&str, u32)]) -> String {
    let mut text = String::from("id,sex,age\n");
    for (i, (sex, age)) in rows.iter().enumerate() {
        text.push_str(&format!("e{},{},{}\n", i, sex, age));
    }
    text
}

fn leaf_strategy() -> impl Strategy<Value = LeafFilter> {
    let categorical = prop::sample::subsequence(vec!["M", "F", "undefined"], 0..=3)
        .prop_map(|values| LeafFilter::categorical("sex", values));
    let numeric = (0u32..100, 0u32..60, any::<bool>(), any::<bool>()).prop_map(
        |(min, width, include_min, include_max)| {
            LeafFilter::numeric(
                "age",
                vec![NumericInterval {
                    min: min as f64,
                    max: (min + width) as f64,
                    include_min,
                    include_max,
                }],
            )
        },
    );
    (prop_oneof![categorical, numeric], any::<bool>()).prop_map(|(leaf, negate)| {
        if negate { leaf.negated() } else { leaf }
    })
}

fn eval_with(data: &TabularData, index: &TermIndex, node: &FilterNode) -> (MatchSet, MatchSet) {
    let rows = EntityRows::new(data, index.entity_key_column());
    let result = evaluate(Some(node), &rows, index);
    (result, rows.universe().clone())
}

proptest! {
    /// Negating a leaf yields exactly the complement of the leaf within the universe
    #[test]
    fn test_leaf_complement_law(rows in cohort_strategy(), leaf in leaf_strategy()) {
        let (data, index) = fixture(&cohort_text(&rows));

        let (positive, universe) = eval_with(&data, &index, &FilterNode::from(leaf.clone()));
        let (negative, _) = eval_with(&data, &index, &FilterNode::from(leaf.negated()));

        prop_assert_eq!(negative, positive.complement_in(&universe));
    }

    /// A negated group equals the complement of its combined children
    #[test]
    fn test_de_morgan_consistency(
        rows in cohort_strategy(),
        a in leaf_strategy(),
        b in leaf_strategy(),
        or in any::<bool>(),
    ) {
        let (data, index) = fixture(&cohort_text(&rows));
        let join = if or { Join::Or } else { Join::And };
        let group = FilterNode::Group {
            join,
            negate: true,
            children: vec![a.clone().into(), b.clone().into()],
        };

        let (negated, universe) = eval_with(&data, &index, &group);
        let (eval_a, _) = eval_with(&data, &index, &FilterNode::from(a));
        let (eval_b, _) = eval_with(&data, &index, &FilterNode::from(b));
        let combined = match join {
            Join::And => eval_a.intersect(eval_b),
            Join::Or => eval_a.union(eval_b),
        };

        prop_assert_eq!(negated, combined.complement_in(&universe));
    }

    /// Results never leave the universe
    #[test]
    fn test_results_within_universe(rows in cohort_strategy(), leaf in leaf_strategy()) {
        let (data, index) = fixture(&cohort_text(&rows));
        let (result, universe) = eval_with(&data, &index, &FilterNode::from(leaf));
        prop_assert!(result.iter().all(|key| universe.contains(key)));
    }
}
