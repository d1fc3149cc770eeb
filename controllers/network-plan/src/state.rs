//! Deployment state document.
//!
//! The state document carries everything one planning run needs: the declared
//! topology, the topology persisted reservations were made under, and per
//! instance the desired memberships plus the persisted reservation rows.
//!
//! ```yaml
//! azs:
//!   - name: z1
//! networks:
//!   - name: private
//!     subnets:
//!       - range: 10.0.0.0/24
//!         static: [10.0.0.10 - 10.0.0.20]
//!         az: z1
//! instances:
//!   - group: web
//!     index: 0
//!     az: z1
//!     networks:
//!       - name: private
//!         static_ip: 10.0.0.10
//!     reservations:
//!       - network: private
//!         ip: 10.0.0.10
//!         type: manual
//! ```

use crate::error::ControllerError;
use deployment_model::{
    AvailabilityZone, DeploymentTopology, ExistingReservation, InstanceId, Network, NetworkSpec, TopologySpec,
    parse_address,
};
use network_planner::{DesiredInstancePlan, Planner};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Root of the state document
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeploymentState {
    /// Declared availability zones
    #[serde(default)]
    pub azs: Vec<AvailabilityZone>,

    /// Declared networks
    #[serde(default)]
    pub networks: Vec<NetworkSpec>,

    /// Networks persisted reservations were made under
    #[serde(default)]
    pub previous_networks: Vec<NetworkSpec>,

    /// Instances to plan, in declaration order
    #[serde(default)]
    pub instances: Vec<InstanceState>,
}

/// One instance of the deployment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceState {
    /// Instance group name
    pub group: String,

    /// Index within the group
    pub index: u32,

    /// Zone the instance is placed in for this run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,

    /// Desired network memberships
    #[serde(default)]
    pub networks: Vec<MembershipState>,

    /// Instance is updated with create-swap-delete
    #[serde(default)]
    pub create_swap_delete: bool,

    /// Instance is recreated for reasons unrelated to networking
    #[serde(default)]
    pub recreate_for_non_network_reasons: bool,

    /// Persisted reservation rows
    #[serde(default)]
    pub reservations: Vec<ReservationRow>,
}

/// Desired membership of one network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipState {
    /// Network name
    pub name: String,

    /// Fixed address, dynamic when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_ip: Option<String>,
}

/// Persisted reservation row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationRow {
    /// Network the reservation was made on
    pub network: String,

    /// Address, absent for unassigned dynamic reservations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Network type tag stored with the row
    #[serde(rename = "type")]
    pub kind: String,
}

/// Topologies one planning run works against
#[derive(Debug)]
pub struct Topologies {
    /// Declared topology
    pub current: DeploymentTopology,

    /// Topology of persisted reservations
    pub previous: DeploymentTopology,
}

impl Topologies {
    /// Network persisted reservations point at, previous topology first
    pub fn persisted_network(&self, name: &str) -> Option<&Arc<Network>> {
        self.previous.network(name).or_else(|| self.current.network(name))
    }
}

impl DeploymentState {
    /// Read and parse the state document at `path`
    pub async fn load(path: &Path) -> Result<Self, ControllerError> {
        let document = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&document)
    }

    /// Parse a state document
    pub fn from_yaml(document: &str) -> Result<Self, ControllerError> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Validate and build both topologies
    pub fn topologies(&self) -> Result<Topologies, ControllerError> {
        let current = TopologySpec {
            azs: self.azs.clone(),
            networks: self.networks.clone(),
        }
        .to_topology()?;
        let previous = TopologySpec {
            azs: self.azs.clone(),
            networks: self.previous_networks.clone(),
        }
        .to_topology()?;

        debug!(
            "Loaded {} networks ({} previous) across {} azs",
            current.networks().len(),
            previous.networks().len(),
            current.azs().len()
        );
        Ok(Topologies { current, previous })
    }
}

impl InstanceState {
    /// Instance identity
    pub fn id(&self) -> InstanceId {
        InstanceId::new(self.group.clone(), self.index)
    }

    /// Desired plan of the instance, built through `planner`
    pub fn desired_plan(&self, topologies: &Topologies, planner: Planner) -> Result<DesiredInstancePlan, ControllerError> {
        let instance = self.id();
        let desired_az = self
            .az
            .as_deref()
            .map(|az| {
                topologies.current.az(az).cloned().ok_or_else(|| ControllerError::UnknownAvailabilityZone {
                    instance: instance.clone(),
                    az: az.to_string(),
                })
            })
            .transpose()?;

        let mut plan = DesiredInstancePlan::new(instance.clone())
            .with_desired_az(desired_az)
            .with_create_swap_delete(self.create_swap_delete)
            .with_recreate_for_non_network_reasons(self.recreate_for_non_network_reasons);

        for membership in &self.networks {
            let network = topologies
                .current
                .network(&membership.name)
                .ok_or_else(|| ControllerError::UnknownNetwork {
                    instance: instance.clone(),
                    network: membership.name.clone(),
                })?;
            let network_plan = match membership.static_ip.as_deref() {
                Some(address) => planner.plan_with_static_reservation(&plan, Arc::clone(network), parse_address(address)?),
                None => planner.plan_with_dynamic_reservation(&plan, Arc::clone(network)),
            };
            plan.push_network_plan(network_plan);
        }

        Ok(plan)
    }

    /// Existing reservations rebuilt from the persisted rows, in row order
    pub fn existing_reservations(&self, topologies: &Topologies) -> Result<Vec<ExistingReservation>, ControllerError> {
        let instance = self.id();
        self.reservations
            .iter()
            .map(|row| -> Result<ExistingReservation, ControllerError> {
                let network = topologies
                    .persisted_network(&row.network)
                    .ok_or_else(|| ControllerError::UnknownNetwork {
                        instance: instance.clone(),
                        network: row.network.clone(),
                    })?;
                Ok(ExistingReservation::from_persisted(
                    instance.clone(),
                    Arc::clone(network),
                    row.ip.as_deref(),
                    &row.kind,
                )?)
            })
            .collect()
    }
}
