//! Net resource balance — production minus consumption, per resource.

use std::collections::BTreeSet;

use crate::aggregate::ResourceTotals;
use crate::production::{production, EfficiencySource, RateDirection};
use crate::vessel::Vessel;

/// Full outer join of consumption and production.
///
/// Every resource present on either side appears exactly once, valued at
/// `production - consumption` with a missing side counted as zero.
pub fn calc_balance(consumption: &ResourceTotals, production: &ResourceTotals) -> ResourceTotals {
    let keys: BTreeSet<_> = consumption.keys().chain(production.keys()).collect();
    keys.into_iter()
        .map(|id| {
            let produced = production.get(id).copied().unwrap_or(0.0);
            let consumed = consumption.get(id).copied().unwrap_or(0.0);
            (id.clone(), produced - consumed)
        })
        .collect()
}

/// Converter balance of a vessel: output rates minus input rates.
pub fn vessel_balance<E: EfficiencySource + ?Sized>(vessel: &Vessel, efficiency: &E) -> ResourceTotals {
    let input = production(vessel, RateDirection::Input, efficiency);
    let output = production(vessel, RateDirection::Output, efficiency);
    calc_balance(&input, &output)
}

/// Resources whose balance is below `-threshold` (net drain).
pub fn deficits(balance: &ResourceTotals, threshold: f64) -> Vec<(&str, f64)> {
    balance
        .iter()
        .filter(|(_, v)| **v < -threshold)
        .map(|(id, v)| (id.name(), *v))
        .collect()
}
