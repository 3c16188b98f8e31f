//! Transfer planning — validate and run resource transfers between vessels.
//!
//! A transfer names an origin vessel, a destination vessel and a list of
//! resource amounts. Which resources may move is decided by an explicit
//! [`TransferRules`] value owned by the caller. Running a transfer moves, per
//! resource, the smallest of the requested amount, the origin's stock and
//! the destination's free space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::exchange::{exchange_resources, EXCHANGE_EPSILON};
use crate::reader::{resource_amounts, resource_capacities, resource_names};
use crate::resource::ResourceId;
use crate::vessel::{Vessel, VesselId};

/// User-facing reasons a transfer request is refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("origin and destination must be different vessels")]
    SameVessel,

    #[error("transfer amount {0:?} is not a number")]
    NotANumber(String),

    #[error("transfer amount must be positive (got {0})")]
    NonPositiveAmount(f64),

    #[error("{0} cannot be transferred between these vessels")]
    ResourceNotAllowed(ResourceId),

    #[error("transfer has no resources")]
    Empty,

    #[error("transfer was planned for vessels {planned:?}, not {given:?}")]
    VesselMismatch {
        planned: (VesselId, VesselId),
        given: (VesselId, VesselId),
    },
}

/// Which resources may be moved by orbital logistics.
///
/// With no allow-list every resource is allowed except those blocked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRules {
    #[serde(default)]
    pub allowed: Option<Vec<ResourceId>>,
    #[serde(default)]
    pub blocked: Vec<ResourceId>,
}

impl TransferRules {
    pub fn is_allowed(&self, resource: &ResourceId) -> bool {
        if self.blocked.contains(resource) {
            return false;
        }
        match &self.allowed {
            Some(list) => list.contains(resource),
            None => true,
        }
    }
}

/// Resources both vessels carry and the rules allow, in origin order.
pub fn allowed_resources(rules: &TransferRules, origin: &Vessel, destination: &Vessel) -> Vec<ResourceId> {
    let at_destination = resource_names(destination);
    resource_names(origin)
        .into_iter()
        .filter(|id| at_destination.contains(id) && rules.is_allowed(id))
        .collect()
}

/// Parse a user-entered amount. Invalid text is a refused request, never a panic.
pub fn parse_transfer_amount(text: &str) -> std::result::Result<f64, TransferError> {
    let amount = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TransferError::NotANumber(text.to_string()))?;
    if amount <= 0.0 {
        return Err(TransferError::NonPositiveAmount(amount));
    }
    Ok(amount)
}

/// Amount needed to top up the destination, limited by what the origin holds.
/// `None` when the destination is already full.
pub fn fill_amount(origin_available: f64, destination_available: f64, destination_capacity: f64) -> Option<f64> {
    let difference = destination_capacity - destination_available;
    if difference > 0.0 {
        Some(difference.min(origin_available))
    } else {
        None
    }
}

/// One resource line of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub resource: ResourceId,
    pub amount: f64,
}

/// A transfer between two distinct vessels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub origin: VesselId,
    pub destination: VesselId,
    pub resources: Vec<ResourceRequest>,
}

impl TransferRequest {
    pub fn new(origin: &Vessel, destination: &Vessel) -> std::result::Result<Self, TransferError> {
        if origin.id == destination.id {
            return Err(TransferError::SameVessel);
        }
        Ok(Self {
            origin: origin.id,
            destination: destination.id,
            resources: Vec::new(),
        })
    }

    /// Add an amount of a resource. Repeated resources accumulate.
    pub fn add_resource(
        &mut self,
        rules: &TransferRules,
        resource: ResourceId,
        amount: f64,
    ) -> std::result::Result<(), TransferError> {
        if !(amount > 0.0 && amount.is_finite()) {
            return Err(TransferError::NonPositiveAmount(amount));
        }
        if !rules.is_allowed(&resource) {
            return Err(TransferError::ResourceNotAllowed(resource));
        }
        match self.resources.iter_mut().find(|r| r.resource == resource) {
            Some(existing) => existing.amount += amount,
            None => self.resources.push(ResourceRequest { resource, amount }),
        }
        Ok(())
    }

    pub fn remove_resource(&mut self, resource: &ResourceId) -> bool {
        let before = self.resources.len();
        self.resources.retain(|r| &r.resource != resource);
        self.resources.len() != before
    }

    /// Check the request against the vessels it is about to run on.
    pub fn validate(
        &self,
        rules: &TransferRules,
        origin: &Vessel,
        destination: &Vessel,
    ) -> Vec<TransferError> {
        let mut errors = Vec::new();
        if origin.id == destination.id {
            errors.push(TransferError::SameVessel);
        }
        if (origin.id, destination.id) != (self.origin, self.destination) {
            errors.push(TransferError::VesselMismatch {
                planned: (self.origin, self.destination),
                given: (origin.id, destination.id),
            });
        }
        if self.resources.is_empty() {
            errors.push(TransferError::Empty);
        }
        let allowed = allowed_resources(rules, origin, destination);
        for request in &self.resources {
            if !allowed.contains(&request.resource) {
                errors.push(TransferError::ResourceNotAllowed(request.resource.clone()));
            }
        }
        errors
    }
}

/// What happened to one resource line of an executed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub resource: ResourceId,
    pub requested: f64,
    /// Taken out of the origin.
    pub withdrawn: f64,
    /// Stored in the destination.
    pub delivered: f64,
    /// Put back into the origin when the destination stored less than was
    /// withdrawn (rounding across units).
    pub returned: f64,
}

impl TransferOutcome {
    pub fn is_complete(&self) -> bool {
        self.delivered == self.requested
    }
}

/// Run a transfer. Validation happens before any vessel is touched; the
/// first problem found is returned.
///
/// Each line moves at most what the origin holds and the destination has
/// room for, so stock is only withdrawn when it can be stored. Lines whose
/// movable amount is below [`EXCHANGE_EPSILON`] are skipped untouched.
pub fn execute_transfer(
    request: &TransferRequest,
    rules: &TransferRules,
    origin: &mut Vessel,
    destination: &mut Vessel,
) -> Result<Vec<TransferOutcome>> {
    if let Some(err) = request.validate(rules, origin, destination).into_iter().next() {
        log::warn!(
            "transfer {} -> {} refused: {}",
            origin.name,
            destination.name,
            err
        );
        return Err(err.into());
    }
    // Every snapshot value either exchange will read must decode before the
    // first write.
    for vessel in [&*origin, &*destination] {
        resource_amounts(vessel)?;
        resource_capacities(vessel)?;
    }

    let mut outcomes = Vec::with_capacity(request.resources.len());
    for line in &request.resources {
        let available = stored(origin, &line.resource)?;
        let room = free_space(destination, &line.resource)?;
        let movable = line.amount.min(available).min(room);

        let (withdrawn, delivered, returned) = if movable < EXCHANGE_EPSILON {
            (0.0, 0.0, 0.0)
        } else {
            let withdrawn = -exchange_resources(origin, &line.resource, -movable)?;
            let delivered = exchange_resources(destination, &line.resource, withdrawn)?;
            let returned = if withdrawn > delivered {
                exchange_resources(origin, &line.resource, withdrawn - delivered)?
            } else {
                0.0
            };
            (withdrawn, delivered, returned)
        };
        let outcome = TransferOutcome {
            resource: line.resource.clone(),
            requested: line.amount,
            withdrawn,
            delivered,
            returned,
        };
        if outcome.is_complete() {
            log::info!(
                "transferred {} {} from {} to {}",
                delivered,
                line.resource,
                origin.name,
                destination.name
            );
        } else {
            log::warn!(
                "partial transfer of {} from {} to {}: requested {}, delivered {}",
                line.resource,
                origin.name,
                destination.name,
                line.amount,
                delivered
            );
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn stored(vessel: &Vessel, resource: &ResourceId) -> Result<f64> {
    Ok(resource_amounts(vessel)?.get(resource).copied().unwrap_or(0.0))
}

fn free_space(vessel: &Vessel, resource: &ResourceId) -> Result<f64> {
    let capacity = resource_capacities(vessel)?.get(resource).copied().unwrap_or(0.0);
    Ok((capacity - stored(vessel, resource)?).max(0.0))
}
