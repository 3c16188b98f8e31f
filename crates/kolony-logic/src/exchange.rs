//! Resource exchange — add or remove a quantity of one resource on a vessel.
//!
//! The change is spread across the vessel's storage units strictly in part
//! order. Withdrawals drain each unit before moving to the next; deposits
//! fill each unit to capacity before moving on. If the vessel runs out of
//! stock or room the exchange stops early and reports what it actually
//! moved. A short result is the caller's signal, not an error.

use crate::error::Result;
use crate::resource::ResourceId;
use crate::vessel::Vessel;

/// Requests smaller than this are no-ops.
pub const EXCHANGE_EPSILON: f64 = 1e-6;

/// Apply a signed `amount` of `resource` to `vessel`.
///
/// Returns the amount actually applied: equal to `amount` when the vessel
/// has enough stock (or room), smaller in magnitude otherwise, never of the
/// opposite sign. Requests below [`EXCHANGE_EPSILON`] return `amount`
/// untouched without changing the vessel. Non-finite requests apply nothing
/// and return zero.
///
/// A malformed snapshot value stops the exchange at the offending unit.
/// Units before it keep their new amounts; units after it are untouched.
pub fn exchange_resources(vessel: &mut Vessel, resource: &ResourceId, amount: f64) -> Result<f64> {
    log::debug!(
        "exchange: vessel={} resource={} amount={}",
        vessel.name,
        resource,
        amount
    );
    if !amount.is_finite() {
        log::warn!("exchange: ignoring non-finite amount {} on {}", amount, vessel.name);
        return Ok(0.0);
    }
    if amount.abs() < EXCHANGE_EPSILON {
        return Ok(amount);
    }

    let mode = if vessel.is_dormant() { "packed" } else { "loaded" };
    let mut exchanged = 0.0;
    for unit in vessel.storage_units_mut(resource) {
        let current = unit.amount()?;
        let remaining = amount - exchanged;
        if amount < 0.0 {
            if current < remaining.abs() {
                exchanged -= current;
                unit.set_amount(0.0);
            } else {
                unit.set_amount(current + remaining);
                exchanged = amount;
                break;
            }
        } else {
            let capacity = unit.capacity()?;
            let room = (capacity - current).max(0.0);
            if room < remaining {
                if room > 0.0 {
                    exchanged += room;
                    unit.set_amount(current + room);
                }
            } else {
                unit.set_amount(current + remaining);
                exchanged = amount;
                break;
            }
        }
    }

    if exchanged != amount {
        log::debug!(
            "exchange ({mode}): {} short on {}: requested {}, applied {}",
            vessel.name,
            resource,
            amount,
            exchanged
        );
    }
    Ok(exchanged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogisticsError;
    use crate::reader::resource_amounts;
    use crate::snapshot::{ConfigNode, AMOUNT, MAX_AMOUNT};
    use crate::storage::{PartResource, ProtoResource};
    use crate::vessel::{Part, ProtoPart};

    fn ore() -> ResourceId {
        ResourceId::new("Ore")
    }

    fn tanks(levels: &[(f64, f64)]) -> Vessel {
        let parts = levels
            .iter()
            .enumerate()
            .map(|(i, (amount, cap))| {
                Part::new(format!("tank-{i}")).with_resource(PartResource::new("Ore", *amount, *cap))
            })
            .collect();
        Vessel::loaded(1, "Hauler", parts)
    }

    fn levels(vessel: &Vessel) -> Vec<f64> {
        vessel
            .storage_units()
            .iter()
            .map(|u| u.amount().unwrap())
            .collect()
    }

    #[test]
    fn test_withdraw_drains_in_part_order() {
        let mut vessel = tanks(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), -15.0).unwrap();
        assert_eq!(applied, -15.0);
        assert_eq!(levels(&vessel), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_deposit_fills_in_part_order() {
        let mut vessel = tanks(&[(0.0, 10.0), (4.0, 10.0), (0.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), 12.0).unwrap();
        assert_eq!(applied, 12.0);
        assert_eq!(levels(&vessel), vec![10.0, 6.0, 0.0]);
    }

    #[test]
    fn test_withdraw_more_than_stock_is_partial() {
        let mut vessel = tanks(&[(2.0, 10.0), (3.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), -8.0).unwrap();
        assert_eq!(applied, -5.0);
        assert_eq!(levels(&vessel), vec![0.0, 0.0]);
    }

    #[test]
    fn test_deposit_more_than_room_is_partial() {
        let mut vessel = tanks(&[(8.0, 10.0), (9.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), 5.0).unwrap();
        assert_eq!(applied, 3.0);
        assert_eq!(levels(&vessel), vec![10.0, 10.0]);
    }

    #[test]
    fn test_tiny_amount_is_noop() {
        let mut vessel = tanks(&[(5.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), 0.0000001).unwrap();
        assert_eq!(applied, 0.0000001);
        assert_eq!(levels(&vessel), vec![5.0]);
        assert_eq!(exchange_resources(&mut vessel, &ore(), -0.0000001).unwrap(), -0.0000001);
        assert_eq!(levels(&vessel), vec![5.0]);
    }

    #[test]
    fn test_unknown_resource_applies_nothing() {
        let mut vessel = tanks(&[(5.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ResourceId::new("Water"), 3.0).unwrap();
        assert_eq!(applied, 0.0);
        assert_eq!(levels(&vessel), vec![5.0]);
    }

    #[test]
    fn test_other_resources_untouched() {
        let mut vessel = Vessel::loaded(
            1,
            "Mixed",
            vec![Part::new("tank")
                .with_resource(PartResource::new("Fuel", 7.0, 10.0))
                .with_resource(PartResource::new("Ore", 7.0, 10.0))],
        );
        exchange_resources(&mut vessel, &ore(), -7.0).unwrap();
        let amounts = resource_amounts(&vessel).unwrap();
        assert_eq!(amounts[&ResourceId::new("Fuel")], 7.0);
        assert_eq!(amounts[&ore()], 0.0);
    }

    #[test]
    fn test_packed_exchange_matches_loaded() {
        let mut loaded = tanks(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);
        let mut packed = loaded.to_packed();
        for delta in [-15.0, 7.5, -30.0, 4.25, 100.0] {
            let a = exchange_resources(&mut loaded, &ore(), delta).unwrap();
            let b = exchange_resources(&mut packed, &ore(), delta).unwrap();
            assert_eq!(a, b, "delta {delta}");
            assert_eq!(levels(&loaded), levels(&packed), "delta {delta}");
        }
    }

    #[test]
    fn test_packed_exchange_writes_text() {
        let mut vessel = tanks(&[(10.0, 10.0), (10.0, 10.0)]).to_packed();
        exchange_resources(&mut vessel, &ore(), -12.5).unwrap();
        if let crate::vessel::VesselState::Packed { parts } = &vessel.state {
            assert_eq!(parts[0].resources[0].values.get_value(AMOUNT), Some("0"));
            assert_eq!(parts[1].resources[0].values.get_value(AMOUNT), Some("7.5"));
            assert_eq!(parts[1].resources[0].values.get_value(MAX_AMOUNT), Some("10"));
        } else {
            panic!("vessel should stay packed");
        }
    }

    #[test]
    fn test_malformed_unit_stops_exchange() {
        let bad = ConfigNode::new("RESOURCE")
            .with_value(AMOUNT, "??")
            .with_value(MAX_AMOUNT, "10");
        let mut vessel = Vessel::packed(
            2,
            "Derelict",
            vec![ProtoPart {
                name: "tanks".into(),
                resources: vec![
                    ProtoResource::new("Ore", 4.0, 10.0),
                    ProtoResource::from_node("Ore", bad).unwrap(),
                    ProtoResource::new("Ore", 10.0, 10.0),
                ],
            }],
        );
        let err = exchange_resources(&mut vessel, &ore(), -12.0).unwrap_err();
        assert!(matches!(err, LogisticsError::MalformedSnapshot { .. }));
        if let crate::vessel::VesselState::Packed { parts } = &vessel.state {
            assert_eq!(parts[0].resources[0].values.get_value(AMOUNT), Some("0"));
            assert_eq!(parts[0].resources[2].values.get_value(AMOUNT), Some("10"));
        }
    }

    #[test]
    fn test_overfull_unit_is_not_drained_by_deposit() {
        let mut vessel = tanks(&[(12.0, 10.0), (0.0, 10.0)]);
        let applied = exchange_resources(&mut vessel, &ore(), 4.0).unwrap();
        assert_eq!(applied, 4.0);
        assert_eq!(levels(&vessel), vec![12.0, 4.0]);
    }

    #[test]
    fn test_non_finite_amount_is_ignored() {
        let mut vessel = tanks(&[(5.0, 10.0)]);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(exchange_resources(&mut vessel, &ore(), bad).unwrap(), 0.0);
            assert_eq!(levels(&vessel), vec![5.0]);
        }
    }

    #[test]
    fn test_deposit_skips_full_packed_unit_text() {
        let full = ConfigNode::new("RESOURCE")
            .with_value(AMOUNT, "10.0")
            .with_value(MAX_AMOUNT, "10");
        let mut vessel = Vessel::packed(
            3,
            "Silo",
            vec![ProtoPart {
                name: "tanks".into(),
                resources: vec![
                    ProtoResource::from_node("Ore", full).unwrap(),
                    ProtoResource::new("Ore", 0.0, 10.0),
                ],
            }],
        );
        assert_eq!(exchange_resources(&mut vessel, &ore(), 4.0).unwrap(), 4.0);
        if let crate::vessel::VesselState::Packed { parts } = &vessel.state {
            assert_eq!(parts[0].resources[0].values.get_value(AMOUNT), Some("10.0"));
            assert_eq!(parts[0].resources[1].values.get_value(AMOUNT), Some("4"));
        } else {
            panic!("vessel should stay packed");
        }
    }
}
