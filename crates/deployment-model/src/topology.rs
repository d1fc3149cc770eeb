//! Deployment topology
//!
//! The validated set of availability zones and networks for one
//! deployment-plan evaluation. It is handed explicitly to whatever needs it;
//! nothing in this workspace reads topology from process-wide state.

use crate::availability_zone::AvailabilityZone;
use crate::error::ModelError;
use crate::network::Network;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Declared zones and networks of a deployment
#[derive(Debug, Clone, Default)]
pub struct DeploymentTopology {
    azs: Vec<AvailabilityZone>,
    networks: Vec<Arc<Network>>,
}

impl DeploymentTopology {
    /// Build a topology, checking names and zone references
    ///
    /// # Errors
    ///
    /// - duplicate zone or network names
    /// - a subnet referencing a zone that is not declared
    pub fn new(azs: Vec<AvailabilityZone>, networks: Vec<Network>) -> Result<Self, ModelError> {
        let mut zone_names = BTreeSet::new();
        for az in &azs {
            if !zone_names.insert(az.name.as_str()) {
                return Err(ModelError::DuplicateAvailabilityZone(az.name.clone()));
            }
        }

        let mut network_names = BTreeSet::new();
        for network in &networks {
            if !network_names.insert(network.name()) {
                return Err(ModelError::DuplicateNetwork(network.name().to_string()));
            }
            let unknown = network
                .subnets()
                .iter()
                .flat_map(|subnet| subnet.azs())
                .find(|az| !zone_names.contains(az.as_str()));
            if let Some(az) = unknown {
                return Err(ModelError::UnknownAvailabilityZone {
                    network: network.name().to_string(),
                    az: az.clone(),
                });
            }
        }

        Ok(Self {
            azs,
            networks: networks.into_iter().map(Arc::new).collect(),
        })
    }

    /// Declared zones in order
    #[must_use]
    pub fn azs(&self) -> &[AvailabilityZone] {
        &self.azs
    }

    /// Declared networks in order
    #[must_use]
    pub fn networks(&self) -> &[Arc<Network>] {
        &self.networks
    }

    /// Look up a zone by name
    #[must_use]
    pub fn az(&self, name: &str) -> Option<&AvailabilityZone> {
        self.azs.iter().find(|az| az.name == name)
    }

    /// Look up a network by name
    #[must_use]
    pub fn network(&self, name: &str) -> Option<&Arc<Network>> {
        self.networks.iter().find(|network| network.name() == name)
    }
}
