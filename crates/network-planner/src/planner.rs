//! Desired plan factory

use crate::instance_plan::InstancePlan;
use crate::plan::NetworkPlan;
use deployment_model::{DesiredReservation, Network};
use std::net::IpAddr;
use std::sync::Arc;

/// Packages desired reservations into plans
///
/// No availability checks happen here; address selection is done before the
/// planner is called.
#[derive(Debug, Default, Clone, Copy)]
pub struct Planner;

impl Planner {
    /// Desired plan for an externally assigned address on `network`
    #[must_use]
    pub fn plan_with_dynamic_reservation(&self, instance_plan: &dyn InstancePlan, network: Arc<Network>) -> NetworkPlan {
        NetworkPlan::Desired(DesiredReservation::new_dynamic(instance_plan.instance().clone(), network))
    }

    /// Desired plan for `address` on `network`
    #[must_use]
    pub fn plan_with_static_reservation(
        &self,
        instance_plan: &dyn InstancePlan,
        network: Arc<Network>,
        address: IpAddr,
    ) -> NetworkPlan {
        NetworkPlan::Desired(DesiredReservation::new_static(
            instance_plan.instance().clone(),
            network,
            address,
        ))
    }
}
