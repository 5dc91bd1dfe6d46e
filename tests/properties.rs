// tests/properties.rs - Property tests for normalization, scoring and merging
use dedupe_lib::clustering::merge_edges;
use dedupe_lib::matching::{
    normalize_address, normalize_record, normalize_site_name, AddressDictionary,
    RecordScorer,
};
use dedupe_lib::models::{BlockingField, Edge, Record, RecordId};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,#'_-]{0,30}"
}

fn phone() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{7}",
        "[0-9]{10}",
        "\\([0-9]{3}\\) [0-9]{3}-[0-9]{4}",
        "[a-z0-9 -]{0,12}",
    ]
}

fn record(id: usize) -> impl Strategy<Value = Record> {
    (text(), text(), phone()).prop_map(move |(name, address, phone)| {
        Record::new(RecordId::from(id as u64))
            .with_site_name(&name)
            .with_address(&address)
            .with_zip("02134")
            .with_phone(&phone)
    })
}

proptest! {
    #[test]
    fn site_name_normalization_is_idempotent(name in text()) {
        let once = normalize_site_name(&name);
        prop_assert_eq!(normalize_site_name(&once), once);
    }

    #[test]
    fn address_normalization_is_idempotent(address in text()) {
        let dictionary = AddressDictionary::default();
        let once = normalize_address(&address, &dictionary);
        prop_assert_eq!(normalize_address(&once, &dictionary), once);
    }

    #[test]
    fn record_distance_is_symmetric(a in record(1), b in record(2)) {
        let dictionary = AddressDictionary::default();
        let scorer = RecordScorer::default();
        let a = normalize_record(&a, &dictionary).unwrap();
        let b = normalize_record(&b, &dictionary).unwrap();
        prop_assert_eq!(scorer.record_distance(&a, &b), scorer.record_distance(&b, &a));
    }

    #[test]
    fn golden_groups_are_components_of_the_edge_union(
        n in 1usize..40,
        raw_edges in prop::collection::vec((0usize..40, 0usize..40), 0..60),
    ) {
        let ids: Vec<RecordId> = (0..n as u64).map(RecordId::from).collect();
        let edges: Vec<Edge> = raw_edges
            .into_iter()
            .filter(|&(a, b)| a < n && b < n && a != b)
            .map(|(row, column)| Edge {
                row,
                column,
                block_type: BlockingField::ZipCode,
                block_value: "00000".to_string(),
                diameter: 0.0,
            })
            .collect();
        let map = merge_edges(&ids, &edges);

        // every edge lands inside one group
        for edge in &edges {
            prop_assert_eq!(map.golden_id(edge.row), map.golden_id(edge.column));
        }

        // groups cover every record exactly once
        let groups = map.groups();
        let covered: BTreeSet<usize> = groups.iter().flatten().copied().collect();
        prop_assert_eq!(covered.len(), n);
        prop_assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), n);

        // no group can be split without cutting an edge
        for group in &groups {
            let members: BTreeSet<usize> = group.iter().copied().collect();
            let mut reached = BTreeSet::from([group[0]]);
            let mut frontier = vec![group[0]];
            while let Some(node) = frontier.pop() {
                for edge in &edges {
                    let next = if edge.row == node {
                        edge.column
                    } else if edge.column == node {
                        edge.row
                    } else {
                        continue;
                    };
                    if reached.insert(next) {
                        frontier.push(next);
                    }
                }
            }
            prop_assert_eq!(reached, members);
        }
    }
}
