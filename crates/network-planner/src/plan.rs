//! Network plans
//!
//! A [`NetworkPlan`] is a reservation tagged with exactly one reuse decision.
//! Plans are produced fresh by every reconciliation and never persisted here.

use deployment_model::{DesiredReservation, ExistingReservation, InstanceId, Reservation};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Reuse decision of a plan
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Keep, no IaaS action
    Existing,

    /// Must be newly allocated
    Desired,

    /// Must be released
    Obsolete,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Existing => "existing",
            Classification::Desired => "desired",
            Classification::Obsolete => "obsolete",
        })
    }
}

/// A reservation with its reuse decision
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkPlan {
    /// Reservation kept as is, reported under the desired network
    Existing(ExistingReservation),

    /// Reservation to allocate
    Desired(DesiredReservation),

    /// Reservation to release
    Obsolete(ExistingReservation),
}

impl NetworkPlan {
    /// Underlying reservation
    #[must_use]
    pub fn reservation(&self) -> &Reservation {
        match self {
            NetworkPlan::Existing(reservation) | NetworkPlan::Obsolete(reservation) => reservation,
            NetworkPlan::Desired(reservation) => reservation,
        }
    }

    /// Reuse decision
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self {
            NetworkPlan::Existing(_) => Classification::Existing,
            NetworkPlan::Desired(_) => Classification::Desired,
            NetworkPlan::Obsolete(_) => Classification::Obsolete,
        }
    }

    /// True for kept reservations
    #[must_use]
    pub fn is_existing(&self) -> bool {
        matches!(self, NetworkPlan::Existing(_))
    }

    /// True for reservations to allocate
    #[must_use]
    pub fn is_desired(&self) -> bool {
        matches!(self, NetworkPlan::Desired(_))
    }

    /// True for reservations to release
    #[must_use]
    pub fn is_obsolete(&self) -> bool {
        matches!(self, NetworkPlan::Obsolete(_))
    }
}

impl fmt::Display for NetworkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.classification(), self.reservation())
    }
}

/// Number of plans per classification
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct PlanCounts {
    /// Kept reservations
    pub existing: usize,

    /// Reservations to allocate
    pub desired: usize,

    /// Reservations to release
    pub obsolete: usize,
}

impl PlanCounts {
    /// Count the plans of one reconciliation
    #[must_use]
    pub fn of(plans: &[NetworkPlan]) -> Self {
        plans.iter().fold(Self::default(), |mut counts, plan| {
            match plan.classification() {
                Classification::Existing => counts.existing += 1,
                Classification::Desired => counts.desired += 1,
                Classification::Obsolete => counts.obsolete += 1,
            }
            counts
        })
    }

    /// Add another count into this one
    pub fn add(&mut self, other: PlanCounts) {
        self.existing += other.existing;
        self.desired += other.desired;
        self.obsolete += other.obsolete;
    }
}

/// True when the plans require any allocation or release
///
/// Logs the reservations responsible for the change.
#[must_use]
pub fn networks_changed(instance: &InstanceId, plans: &[NetworkPlan]) -> bool {
    let render = |wanted: Classification| {
        plans
            .iter()
            .filter(|plan| plan.classification() == wanted)
            .map(|plan| plan.reservation().to_string())
            .collect::<Vec<_>>()
    };

    let obsolete = render(Classification::Obsolete);
    if !obsolete.is_empty() {
        debug!("networks_changed {} obsolete reservations: [{}]", instance, obsolete.join(", "));
    }

    let desired = render(Classification::Desired);
    if !desired.is_empty() {
        debug!("networks_changed {} desired reservations: [{}]", instance, desired.join(", "));
    }

    !obsolete.is_empty() || !desired.is_empty()
}
