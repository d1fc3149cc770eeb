//! Plan report.
//!
//! Machine-readable summary of one planning run, consumed by the address
//! allocation step and the agent configuration renderer.

use chrono::{DateTime, Utc};
use deployment_model::{InstanceId, ReservationKind};
use network_planner::{Classification, NetworkPlan, PlanCounts, networks_changed};
use serde::Serialize;
use std::net::IpAddr;

/// Report of one planning run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanReport {
    /// Generation time
    pub generated_at: DateTime<Utc>,

    /// Per instance plans, in declaration order
    pub instances: Vec<InstanceReport>,

    /// Aggregate counts over every instance
    pub totals: PlanCounts,

    /// Dynamic reservations waiting for an external address
    pub pending_dynamic: usize,
}

/// Plans of one instance
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstanceReport {
    /// Instance identity, `group/index`
    pub instance: String,

    /// True when anything must be allocated or released
    pub networks_changed: bool,

    /// Counts per classification
    pub counts: PlanCounts,

    /// Classified reservations
    pub plans: Vec<PlanEntry>,
}

/// One classified reservation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanEntry {
    /// Reuse decision
    pub classification: Classification,

    /// Network the reservation is reported under
    pub network: String,

    /// Reservation kind
    pub kind: ReservationKind,

    /// Address, absent for dynamic reservations still to be assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
}

impl From<&NetworkPlan> for PlanEntry {
    fn from(plan: &NetworkPlan) -> Self {
        let reservation = plan.reservation();
        Self {
            classification: plan.classification(),
            network: reservation.network().name().to_string(),
            kind: reservation.kind(),
            address: reservation.address(),
        }
    }
}

impl InstanceReport {
    /// Summarize the plans of `instance`
    #[must_use]
    pub fn new(instance: &InstanceId, plans: &[NetworkPlan]) -> Self {
        Self {
            instance: instance.to_string(),
            networks_changed: networks_changed(instance, plans),
            counts: PlanCounts::of(plans),
            plans: plans.iter().map(PlanEntry::from).collect(),
        }
    }
}

impl PlanReport {
    /// Assemble the report, stamped now
    #[must_use]
    pub fn new(instances: Vec<InstanceReport>, pending_dynamic: usize) -> Self {
        let totals = instances.iter().fold(PlanCounts::default(), |mut totals, report| {
            totals.add(report.counts);
            totals
        });
        Self {
            generated_at: Utc::now(),
            instances,
            totals,
            pending_dynamic,
        }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
