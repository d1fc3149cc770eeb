//! Main controller implementation.
//!
//! The `Controller` plans one deployment state document:
//! 1. builds the current and previous topologies
//! 2. builds desired plans and existing reservations per instance
//! 3. reconciles instances on a bounded worker pool
//! 4. applies releases, then claims, to the address ledger in declaration order
//! 5. assembles the plan report

use crate::error::ControllerError;
use crate::ledger::AddressLedger;
use crate::report::{InstanceReport, PlanReport};
use crate::state::DeploymentState;
use deployment_model::{ExistingReservation, InstanceId};
use futures::{StreamExt, TryStreamExt, stream};
use network_planner::{DesiredInstancePlan, NetworkPlan, Planner, ReservationReconciler, TracingDiagnostics};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Inputs of one instance reconciliation
struct InstanceJob {
    instance: InstanceId,
    plan: DesiredInstancePlan,
    existing: Vec<ExistingReservation>,
}

impl InstanceJob {
    fn reconcile(self) -> (InstanceId, Vec<NetworkPlan>) {
        let plans = ReservationReconciler::new(&self.plan, &TracingDiagnostics).reconcile(self.existing);
        debug!("Reconciled {} into {} plans", self.instance, plans.len());
        (self.instance, plans)
    }
}

/// Plans every instance of a deployment
#[derive(Debug)]
pub struct Controller {
    workers: usize,
    planner: Planner,
    ledger: Arc<Mutex<AddressLedger>>,
}

impl Controller {
    /// Creates a controller running at most `workers` reconciliations at once
    pub fn new(workers: usize) -> Result<Self, ControllerError> {
        if workers == 0 {
            return Err(ControllerError::InvalidConfig(
                "at least one reconciliation worker is required".to_string(),
            ));
        }
        Ok(Self {
            workers,
            planner: Planner,
            ledger: Arc::new(Mutex::new(AddressLedger::new())),
        })
    }

    /// Plan every instance of `state`
    pub async fn run(&self, state: &DeploymentState) -> Result<PlanReport, ControllerError> {
        let topologies = state.topologies()?;
        info!(
            "Planning {} instances with {} workers",
            state.instances.len(),
            self.workers
        );

        let mut jobs = Vec::with_capacity(state.instances.len());
        for instance in &state.instances {
            jobs.push(InstanceJob {
                instance: instance.id(),
                plan: instance.desired_plan(&topologies, self.planner)?,
                existing: instance.existing_reservations(&topologies)?,
            });
        }

        {
            let mut ledger = self.ledger.lock().await;
            for job in &jobs {
                ledger.seed(&job.existing);
            }
        }

        let mut results: Vec<(usize, (InstanceId, Vec<NetworkPlan>))> = stream::iter(jobs.into_iter().enumerate())
            .map(|(position, job)| async move {
                let outcome = tokio::task::spawn_blocking(move || job.reconcile()).await?;
                Ok::<_, ControllerError>((position, outcome))
            })
            .buffer_unordered(self.workers)
            .try_collect()
            .await?;
        results.sort_by_key(|(position, _)| *position);
        let outcomes: Vec<(InstanceId, Vec<NetworkPlan>)> = results.into_iter().map(|(_, outcome)| outcome).collect();

        let pending_dynamic = self.apply_to_ledger(&outcomes).await?;

        let reports = outcomes
            .iter()
            .map(|(instance, plans)| InstanceReport::new(instance, plans))
            .collect();
        let report = PlanReport::new(reports, pending_dynamic);
        info!(
            "Planned {} instances: {} existing, {} desired, {} obsolete",
            report.instances.len(),
            report.totals.existing,
            report.totals.desired,
            report.totals.obsolete
        );
        Ok(report)
    }

    /// Releases first so addresses freed by one instance can be claimed by another
    async fn apply_to_ledger(&self, outcomes: &[(InstanceId, Vec<NetworkPlan>)]) -> Result<usize, ControllerError> {
        let mut ledger = self.ledger.lock().await;
        let mut released = 0;
        for (instance, plans) in outcomes {
            let changes = ledger.apply_releases(instance, plans);
            if changes.released > 0 {
                debug!("{} released {} addresses", instance, changes.released);
            }
            released += changes.released;
        }
        let mut claimed = 0;
        let mut pending_dynamic = 0;
        for (instance, plans) in outcomes {
            let changes = ledger.apply_claims(instance, plans)?;
            debug!(
                "{} claimed {} addresses, {} dynamic pending",
                instance, changes.claimed, changes.pending_dynamic
            );
            claimed += changes.claimed;
            pending_dynamic += changes.pending_dynamic;
        }
        info!(
            "Address ledger: {} released, {} claimed, {} dynamic pending ({} overall), {} tracked",
            released,
            claimed,
            pending_dynamic,
            ledger.pending_dynamic(),
            ledger.len()
        );
        Ok(pending_dynamic)
    }
}
