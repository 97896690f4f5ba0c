//! Grouping stage: location keys bucketed by rate.
//!
//! Groups appear in the order their rate was first seen, and locations keep
//! input order within a group. Duplicates are kept. A single unparsable rate
//! fails the whole grouping.

use std::collections::HashMap;

use crate::domain::{Rate, RateGroup, RateGroups};
use crate::error::IngestError;
use crate::io::ingest::RateRow;

/// Group rows by their parsed rate value.
pub fn group_by_rate<I>(rows: I) -> Result<RateGroups, IngestError>
where
    I: IntoIterator<Item = RateRow>,
{
    let mut groups: Vec<RateGroup> = Vec::new();
    let mut slots: HashMap<u64, usize> = HashMap::new();

    for row in rows {
        let rate = Rate::parse(&row.rate).ok_or_else(|| IngestError::InvalidRate {
            line: row.line,
            value: row.rate.clone(),
        })?;

        let slot = *slots.entry(rate.key()).or_insert_with(|| {
            groups.push(RateGroup {
                index: groups.len() + 1,
                rate,
                locations: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].locations.push(row.location);
    }

    Ok(RateGroups::from_groups(groups))
}

/// Convenience for `(location, rate)` pairs without line information.
pub fn group_pairs<'a, I>(pairs: I) -> Result<RateGroups, IngestError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    group_by_rate(
        pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (location, rate))| RateRow::new(idx + 1, location, rate)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(raw: &str) -> Rate {
        Rate::parse(raw).unwrap()
    }

    #[test]
    fn keeps_first_seen_order_within_group() {
        let groups = group_pairs([("A", "5"), ("B", "3"), ("C", "5")]).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get(rate("5")).unwrap().locations, vec!["A", "C"]);
        assert_eq!(groups.get(rate("3")).unwrap().locations, vec!["B"]);

        let indices: Vec<(usize, f64)> = groups.iter().map(|g| (g.index, g.rate.value())).collect();
        assert_eq!(indices, vec![(1, 5.0), (2, 3.0)]);
    }

    #[test]
    fn preserves_every_location_and_rate() {
        let input = [
            ("23451", "100.0"),
            ("23452", "100.0"),
            ("23460", "85.5"),
            ("23451", "100"),
            ("23462", "70"),
            ("23460", "85.50"),
        ];
        let groups = group_pairs(input).unwrap();

        let mut seen: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.locations.iter().map(String::as_str))
            .collect();
        let mut expected: Vec<&str> = input.iter().map(|(loc, _)| *loc).collect();
        seen.sort_unstable();
        expected.sort_unstable();
        assert_eq!(seen, expected);
        assert_eq!(groups.total_locations(), input.len());

        for (loc, raw) in input {
            let group = groups.get(rate(raw)).unwrap();
            assert_eq!(group.rate, rate(raw));
            assert!(group.locations.iter().any(|l| l == loc));
        }
    }

    #[test]
    fn numerically_equal_rates_collapse() {
        let groups = group_pairs([("A", "100"), ("B", "100.00"), ("C", "1e2")]).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.iter().next().unwrap().locations, vec!["A", "B", "C"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let groups = group_pairs([("A", "5"), ("A", "5")]).unwrap();
        assert_eq!(groups.get(rate("5")).unwrap().locations, vec!["A", "A"]);
    }

    #[test]
    fn bad_rate_fails_whole_grouping() {
        let rows = vec![
            RateRow::new(2, "A", "5"),
            RateRow::new(3, "B", "five"),
            RateRow::new(4, "C", "5"),
        ];
        let err = group_by_rate(rows).unwrap_err();
        assert!(matches!(err, IngestError::InvalidRate { line: 3, ref value } if value == "five"));
    }

    #[test]
    fn empty_input_yields_empty_groups() {
        let groups = group_by_rate(Vec::new()).unwrap();
        assert!(groups.is_empty());
        assert_eq!(groups.total_locations(), 0);
    }

    #[test]
    fn sorted_by_rate_is_ascending() {
        let groups = group_pairs([("A", "100"), ("B", "85.5"), ("C", "92")]).unwrap();
        let sorted: Vec<f64> = groups.sorted_by_rate().iter().map(|g| g.rate.value()).collect();
        assert_eq!(sorted, vec![85.5, 92.0, 100.0]);
    }
}
