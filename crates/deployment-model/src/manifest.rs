//! Manifest network specs
//!
//! Serde views of the `azs` and `networks` sections of a deployment manifest,
//! and their conversion into validated model types. Everything that can be
//! malformed is rejected here so later stages only see well-formed data.

use crate::address::{parse_range, parse_static_entries};
use crate::availability_zone::AvailabilityZone;
use crate::error::ModelError;
use crate::network::{Network, NetworkKind, Subnet};
use crate::topology::DeploymentTopology;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `networks[]` entry of a manifest
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct NetworkSpec {
    /// Network name
    pub name: String,

    /// `manual` (default), `dynamic` or `vip`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Subnets; vip networks without subnets are standalone
    #[serde(default)]
    pub subnets: Vec<SubnetSpec>,
}

/// `networks[].subnets[]` entry of a manifest
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct SubnetSpec {
    /// CIDR range (required on manual networks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Static pool: addresses or `start - end` ranges
    #[serde(rename = "static", default)]
    pub static_ips: Vec<String>,

    /// Single zone shorthand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub az: Option<String>,

    /// Zones served by the subnet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azs: Option<Vec<String>>,

    /// Opaque IaaS properties, carried through the document untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub cloud_properties: serde_json::Value,
}

/// Topology sections of a manifest
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct TopologySpec {
    /// Availability zones
    #[serde(default)]
    pub azs: Vec<AvailabilityZone>,

    /// Networks
    #[serde(default)]
    pub networks: Vec<NetworkSpec>,
}

impl NetworkSpec {
    /// Resolved network kind
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownNetworkType`] for unrecognized tags.
    pub fn network_kind(&self) -> Result<NetworkKind, ModelError> {
        self.kind.as_deref().map_or(Ok(NetworkKind::default()), str::parse::<NetworkKind>)
    }

    /// Validate and build the network
    ///
    /// # Errors
    ///
    /// Any [`ModelError`] raised by the subnet or network checks.
    pub fn to_network(&self) -> Result<Network, ModelError> {
        let kind = self.network_kind()?;
        let subnets = self
            .subnets
            .iter()
            .map(|subnet| subnet.to_subnet(&self.name))
            .collect::<Result<Vec<_>, _>>()?;
        Network::new(self.name.clone(), kind, subnets)
    }
}

impl SubnetSpec {
    /// Validate and build the subnet of network `network`
    ///
    /// # Errors
    ///
    /// Unparsable ranges or static entries, or both `az` and `azs` set.
    pub fn to_subnet(&self, network: &str) -> Result<Subnet, ModelError> {
        let azs = match (&self.az, &self.azs) {
            (Some(_), Some(_)) => return Err(ModelError::ConflictingAzKeys(network.to_string())),
            (Some(az), None) => vec![az.clone()],
            (None, Some(azs)) => azs.clone(),
            (None, None) => Vec::new(),
        };
        let range = self.range.as_deref().map(parse_range).transpose()?;
        let static_ips = parse_static_entries(&self.static_ips)?;

        Ok(Subnet::new(range, static_ips, azs))
    }
}

impl TopologySpec {
    /// Parse the topology sections out of a YAML manifest
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Manifest`] when the YAML does not deserialize.
    pub fn from_yaml(manifest: &str) -> Result<Self, ModelError> {
        serde_yaml::from_str(manifest).map_err(|e| ModelError::Manifest(e.to_string()))
    }

    /// Validate and build the topology
    ///
    /// # Errors
    ///
    /// Any [`ModelError`] raised by network or topology validation.
    pub fn to_topology(&self) -> Result<DeploymentTopology, ModelError> {
        let networks = self
            .networks
            .iter()
            .map(NetworkSpec::to_network)
            .collect::<Result<Vec<_>, _>>()?;
        DeploymentTopology::new(self.azs.clone(), networks)
    }
}
