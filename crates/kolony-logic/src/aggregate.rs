//! Grouping of resource records by identity.

use std::collections::BTreeMap;

use crate::resource::{ResourceId, ResourceRecord};

/// Per-resource totals. Ordered by resource name so reports are stable.
pub type ResourceTotals = BTreeMap<ResourceId, f64>;

/// Sum record amounts per resource identity. Empty input gives empty output.
pub fn aggregate<I>(records: I) -> ResourceTotals
where
    I: IntoIterator<Item = ResourceRecord>,
{
    let mut totals = ResourceTotals::new();
    for record in records {
        *totals.entry(record.resource).or_insert(0.0) += record.amount;
    }
    totals
}

/// Distinct identities in first-appearance order.
pub fn distinct<'a, I>(ids: I) -> Vec<ResourceId>
where
    I: IntoIterator<Item = &'a ResourceId>,
{
    let mut seen: Vec<ResourceId> = Vec::new();
    for id in ids {
        if !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}

/// Flatten totals back into records, in key order.
pub fn to_records(totals: &ResourceTotals) -> Vec<ResourceRecord> {
    totals
        .iter()
        .map(|(id, amount)| ResourceRecord::new(id.clone(), *amount))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_totals() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn test_sums_per_identity() {
        let totals = aggregate(vec![
            ResourceRecord::new("Ore", 10.0),
            ResourceRecord::new("Fuel", 2.5),
            ResourceRecord::new("Ore", 5.0),
        ]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&ResourceId::new("Ore")], 15.0);
        assert_eq!(totals[&ResourceId::new("Fuel")], 2.5);
    }

    #[test]
    fn test_signed_amounts_sum() {
        let totals = aggregate(vec![
            ResourceRecord::new("Ore", 4.0),
            ResourceRecord::new("Ore", -6.0),
        ]);
        assert_eq!(totals[&ResourceId::new("Ore")], -2.0);
    }

    #[test]
    fn test_distinct_keeps_first_appearance_order() {
        let ids = [
            ResourceId::new("Ore"),
            ResourceId::new("Fuel"),
            ResourceId::new("Ore"),
            ResourceId::new("Water"),
        ];
        let names: Vec<_> = distinct(&ids).iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["Ore", "Fuel", "Water"]);
    }

    #[test]
    fn test_to_records_round_trips_totals() {
        let totals = aggregate(vec![ResourceRecord::new("B", 1.0), ResourceRecord::new("A", 2.0)]);
        let records = to_records(&totals);
        assert_eq!(records[0], ResourceRecord::new("A", 2.0));
        assert_eq!(records[1], ResourceRecord::new("B", 1.0));
    }
}
