//! Converter production and consumption rates.
//!
//! A converter turns input resources into output resources at nominal
//! ratios, scaled by the efficiency of the part it sits on. Only converters
//! that are both enabled and running contribute.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, ResourceTotals};
use crate::resource::{ResourceId, ResourceRecord};
use crate::vessel::{Part, Vessel};

/// Operating status reported by a converter module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConverterStatus {
    Running,
    Inactive,
    /// Stalled for a reason reported by the module (missing input, full output).
    Blocked(String),
}

/// Nominal per-tick ratio of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRatio {
    pub resource: ResourceId,
    pub ratio: f64,
}

impl ResourceRatio {
    pub fn new(resource: impl Into<ResourceId>, ratio: f64) -> Self {
        Self {
            resource: resource.into(),
            ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Converter {
    pub name: String,
    pub enabled: bool,
    pub status: ConverterStatus,
    #[serde(default)]
    pub inputs: Vec<ResourceRatio>,
    #[serde(default)]
    pub outputs: Vec<ResourceRatio>,
}

impl Converter {
    pub fn is_active(&self) -> bool {
        self.enabled && self.status == ConverterStatus::Running
    }

    pub fn ratios(&self, direction: RateDirection) -> &[ResourceRatio] {
        match direction {
            RateDirection::Output => &self.outputs,
            RateDirection::Input => &self.inputs,
        }
    }
}

/// Which side of a converter to total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDirection {
    Output,
    Input,
}

/// Supplies the efficiency multiplier for a converter.
///
/// Implementations may be costly (crew, power lookups); the calculator
/// queries each active converter exactly once per call.
pub trait EfficiencySource {
    fn efficiency(&self, part: &Part, converter: &Converter) -> f64;
}

/// Reads the efficiency rate stored on the owning part.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartEfficiency;

impl EfficiencySource for PartEfficiency {
    fn efficiency(&self, part: &Part, _converter: &Converter) -> f64 {
        part.efficiency_rate
    }
}

/// Converters that are enabled and running, with their owning part.
pub fn active_converters(vessel: &Vessel) -> impl Iterator<Item = (&Part, &Converter)> {
    vessel.converters().filter(|(_, c)| c.is_active())
}

/// Parts carrying at least one converter module.
pub fn converter_parts(vessel: &Vessel) -> impl Iterator<Item = &Part> {
    vessel.parts().iter().filter(|p| !p.converters.is_empty())
}

/// Total efficiency-scaled rates per resource for one direction.
pub fn production<E: EfficiencySource + ?Sized>(
    vessel: &Vessel,
    direction: RateDirection,
    efficiency: &E,
) -> ResourceTotals {
    let mut records = Vec::new();
    for (part, converter) in active_converters(vessel) {
        let rate = efficiency.efficiency(part, converter);
        records.extend(
            converter
                .ratios(direction)
                .iter()
                .map(|r| ResourceRecord::new(r.resource.clone(), r.ratio * rate)),
        );
    }
    aggregate(records)
}
