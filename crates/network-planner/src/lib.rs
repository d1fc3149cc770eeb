//! Network Reservation Planner
//!
//! Pure, synchronous planning of network reservations for one instance at a
//! time. The [`Planner`] packages desired reservations into plans and the
//! [`ReservationReconciler`] compares them against persisted reservations,
//! classifying every reservation as kept, to allocate or to release.
//!
//! Nothing here performs I/O or holds locks, so reconciliations for different
//! instances can run concurrently.
//!
//! # Example
//!
//! ```
//! use deployment_model::{ExistingReservation, InstanceId, Network, ReservationKind};
//! use network_planner::{DesiredInstancePlan, Planner, ReservationReconciler, TracingDiagnostics};
//! use std::sync::Arc;
//!
//! let network = Arc::new(Network::dynamic("dyn", Vec::new())?);
//! let instance = InstanceId::new("web", 0);
//!
//! let mut instance_plan = DesiredInstancePlan::new(instance.clone());
//! let desired = Planner.plan_with_dynamic_reservation(&instance_plan, Arc::clone(&network));
//! instance_plan.push_network_plan(desired);
//!
//! let existing = vec![ExistingReservation::new(instance, network, None, ReservationKind::Dynamic)];
//! let plans = ReservationReconciler::new(&instance_plan, &TracingDiagnostics).reconcile(existing);
//!
//! assert_eq!(plans.len(), 1);
//! assert!(plans[0].is_existing());
//! # Ok::<(), deployment_model::ModelError>(())
//! ```

pub mod diagnostics;
pub mod instance_plan;
pub mod plan;
pub mod planner;
pub mod reconciler;

#[cfg(test)]
mod reconciler_test;

#[cfg(any(test, feature = "test-util"))]
pub use diagnostics::RecordingDiagnostics;
pub use diagnostics::{Diagnostic, Diagnostics, ReplacementReason, TracingDiagnostics};
pub use instance_plan::{DesiredInstancePlan, InstancePlan};
pub use plan::{Classification, NetworkPlan, PlanCounts, networks_changed};
pub use planner::Planner;
pub use reconciler::ReservationReconciler;
