//! Instance plan seam
//!
//! The reconciler reads the desired side of one instance through
//! [`InstancePlan`]. The deployment-update phase owns the real plan; this crate
//! ships [`DesiredInstancePlan`] as a plain data implementation.

use crate::plan::NetworkPlan;
use deployment_model::{AvailabilityZone, InstanceId};

/// Read-only view of one instance's desired state
pub trait InstancePlan: Send + Sync {
    /// Instance being planned
    fn instance(&self) -> &InstanceId;

    /// Zone the instance is placed in for this run
    fn desired_az(&self) -> Option<&AvailabilityZone>;

    /// Desired network plans, one per declared network membership
    fn network_plans(&self) -> &[NetworkPlan];

    /// Instance will be recreated whatever its networks look like
    fn recreate_for_non_network_reasons(&self) -> bool;

    /// Instance is updated by creating a replacement before deleting it
    fn should_create_swap_delete(&self) -> bool;
}

/// Plain data [`InstancePlan`]
#[derive(Debug, Clone)]
pub struct DesiredInstancePlan {
    instance: InstanceId,
    desired_az: Option<AvailabilityZone>,
    network_plans: Vec<NetworkPlan>,
    recreate_for_non_network_reasons: bool,
    create_swap_delete: bool,
}

impl DesiredInstancePlan {
    /// Plan without zone, networks or policy flags
    #[must_use]
    pub fn new(instance: InstanceId) -> Self {
        Self {
            instance,
            desired_az: None,
            network_plans: Vec::new(),
            recreate_for_non_network_reasons: false,
            create_swap_delete: false,
        }
    }

    /// Set the desired zone
    #[must_use]
    pub fn with_desired_az(mut self, az: Option<AvailabilityZone>) -> Self {
        self.desired_az = az;
        self
    }

    /// Replace the desired network plans
    #[must_use]
    pub fn with_network_plans(mut self, network_plans: Vec<NetworkPlan>) -> Self {
        self.network_plans = network_plans;
        self
    }

    /// Append one desired network plan
    pub fn push_network_plan(&mut self, plan: NetworkPlan) {
        self.network_plans.push(plan);
    }

    /// Set the non-network recreate flag
    #[must_use]
    pub fn with_recreate_for_non_network_reasons(mut self, recreate: bool) -> Self {
        self.recreate_for_non_network_reasons = recreate;
        self
    }

    /// Set the create-swap-delete flag
    #[must_use]
    pub fn with_create_swap_delete(mut self, create_swap_delete: bool) -> Self {
        self.create_swap_delete = create_swap_delete;
        self
    }
}

impl InstancePlan for DesiredInstancePlan {
    fn instance(&self) -> &InstanceId {
        &self.instance
    }

    fn desired_az(&self) -> Option<&AvailabilityZone> {
        self.desired_az.as_ref()
    }

    fn network_plans(&self) -> &[NetworkPlan] {
        &self.network_plans
    }

    fn recreate_for_non_network_reasons(&self) -> bool {
        self.recreate_for_non_network_reasons
    }

    fn should_create_swap_delete(&self) -> bool {
        self.create_swap_delete
    }
}
