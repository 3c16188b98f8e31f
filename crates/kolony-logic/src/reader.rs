//! Per-resource views of a vessel's storage, in either representation.
//!
//! All reads go through [`StorageUnit`](crate::storage::StorageUnit), so a
//! loaded vessel and its packed snapshot report identical totals. A
//! malformed snapshot value aborts the whole read; no partial totals are
//! returned and nothing is zero-filled.

use crate::aggregate::{aggregate, distinct, to_records, ResourceTotals};
use crate::error::Result;
use crate::resource::{ResourceId, ResourceRecord};
use crate::vessel::Vessel;

/// What a resource read reports for each resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceQuery {
    /// Distinct resources only; amounts are zero.
    Names,
    /// Summed stored amount.
    Amounts,
    /// Summed capacity.
    Capacities,
}

/// Distinct resources stored on the vessel, in first-appearance order.
pub fn resource_names(vessel: &Vessel) -> Vec<ResourceId> {
    let units = vessel.storage_units();
    distinct(units.iter().map(|u| u.resource()))
}

/// Stored amount per resource.
pub fn resource_amounts(vessel: &Vessel) -> Result<ResourceTotals> {
    let records = vessel
        .storage_units()
        .into_iter()
        .map(|u| -> Result<ResourceRecord> {
            Ok(ResourceRecord::new(u.resource().clone(), u.amount()?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate(records))
}

/// Capacity per resource.
pub fn resource_capacities(vessel: &Vessel) -> Result<ResourceTotals> {
    let records = vessel
        .storage_units()
        .into_iter()
        .map(|u| -> Result<ResourceRecord> {
            Ok(ResourceRecord::new(u.resource().clone(), u.capacity()?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(aggregate(records))
}

/// Run a query and flatten the result into records.
pub fn read_resources(vessel: &Vessel, query: ResourceQuery) -> Result<Vec<ResourceRecord>> {
    match query {
        ResourceQuery::Names => Ok(resource_names(vessel)
            .into_iter()
            .map(|id| ResourceRecord::new(id, 0.0))
            .collect()),
        ResourceQuery::Amounts => resource_amounts(vessel).map(|t| to_records(&t)),
        ResourceQuery::Capacities => resource_capacities(vessel).map(|t| to_records(&t)),
    }
}

/// Stored amount and capacity of one resource, as shown in a transfer list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLevel {
    pub resource: ResourceId,
    pub available: f64,
    pub capacity: f64,
}

impl ResourceLevel {
    /// Room left before the vessel is full of this resource.
    pub fn free_space(&self) -> f64 {
        (self.capacity - self.available).max(0.0)
    }
}

/// Available amount and capacity for every resource on the vessel.
pub fn resource_levels(vessel: &Vessel) -> Result<Vec<ResourceLevel>> {
    let amounts = resource_amounts(vessel)?;
    let capacities = resource_capacities(vessel)?;
    Ok(resource_names(vessel)
        .into_iter()
        .map(|id| ResourceLevel {
            available: amounts.get(&id).copied().unwrap_or(0.0),
            capacity: capacities.get(&id).copied().unwrap_or(0.0),
            resource: id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogisticsError;
    use crate::snapshot::{ConfigNode, AMOUNT, MAX_AMOUNT};
    use crate::storage::{PartResource, ProtoResource};
    use crate::vessel::{Part, ProtoPart};

    fn station() -> Vessel {
        Vessel::loaded(
            1,
            "Station",
            vec![
                Part::new("tank-1")
                    .with_resource(PartResource::new("Fuel", 40.0, 100.0))
                    .with_resource(PartResource::new("Ore", 5.0, 50.0)),
                Part::new("tank-2").with_resource(PartResource::new("Fuel", 60.0, 100.0)),
            ],
        )
    }

    #[test]
    fn test_names_are_distinct() {
        let names: Vec<_> = resource_names(&station())
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(names, vec!["Fuel", "Ore"]);
    }

    #[test]
    fn test_amounts_and_capacities_sum() {
        let vessel = station();
        let amounts = resource_amounts(&vessel).unwrap();
        let caps = resource_capacities(&vessel).unwrap();
        assert_eq!(amounts[&ResourceId::new("Fuel")], 100.0);
        assert_eq!(amounts[&ResourceId::new("Ore")], 5.0);
        assert_eq!(caps[&ResourceId::new("Fuel")], 200.0);
        assert_eq!(caps[&ResourceId::new("Ore")], 50.0);
    }

    #[test]
    fn test_packed_reads_match_loaded() {
        let loaded = station();
        let packed = loaded.to_packed();
        for query in [
            ResourceQuery::Names,
            ResourceQuery::Amounts,
            ResourceQuery::Capacities,
        ] {
            assert_eq!(
                read_resources(&loaded, query).unwrap(),
                read_resources(&packed, query).unwrap(),
                "{query:?}"
            );
        }
    }

    #[test]
    fn test_malformed_amount_aborts_read() {
        let bad = ConfigNode::new("RESOURCE")
            .with_value(AMOUNT, "twelve")
            .with_value(MAX_AMOUNT, "20");
        let vessel = Vessel::packed(
            2,
            "Derelict",
            vec![ProtoPart {
                name: "tank".into(),
                resources: vec![
                    ProtoResource::new("Ore", 1.0, 20.0),
                    ProtoResource::from_node("Ore", bad).unwrap(),
                ],
            }],
        );
        let err = resource_amounts(&vessel).unwrap_err();
        assert!(matches!(err, LogisticsError::MalformedSnapshot { .. }));
        // Names never touch the numeric fields.
        assert_eq!(resource_names(&vessel), vec![ResourceId::new("Ore")]);
        assert_eq!(resource_capacities(&vessel).unwrap()[&ResourceId::new("Ore")], 40.0);
    }

    #[test]
    fn test_resource_levels() {
        let levels = resource_levels(&station()).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].resource, ResourceId::new("Fuel"));
        assert_eq!(levels[0].free_space(), 100.0);
        assert_eq!(levels[1].available, 5.0);
        assert_eq!(levels[1].free_space(), 45.0);
    }

    #[test]
    fn test_empty_vessel() {
        let vessel = Vessel::loaded(9, "Probe", vec![Part::new("core")]);
        assert!(resource_names(&vessel).is_empty());
        assert!(resource_amounts(&vessel).unwrap().is_empty());
    }
}
