//! Networks and subnets
//!
//! A network is one of a closed set of kinds:
//! - `manual`: subnets carry explicit ranges and static pools, the director
//!   assigns and tracks every address
//! - `dynamic`: addresses come from the IaaS or the guest agent, subnets only
//!   exist for availability zone placement
//! - `vip`: externally routable addresses. Legacy standalone vip networks have
//!   no subnets; global vip networks carry zoned subnets with a static pool
//!
//! Networks are immutable once built for a deployment-plan evaluation.

use crate::error::ModelError;
use ipnetwork::IpNetwork;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Network kind discriminator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Director-managed addresses from explicit subnet ranges
    #[default]
    Manual,

    /// Externally assigned addresses
    Dynamic,

    /// Externally routable floating addresses
    Vip,
}

impl NetworkKind {
    /// Manifest tag for this kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkKind::Manual => "manual",
            NetworkKind::Dynamic => "dynamic",
            NetworkKind::Vip => "vip",
        }
    }
}

impl FromStr for NetworkKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(NetworkKind::Manual),
            "dynamic" => Ok(NetworkKind::Dynamic),
            "vip" => Ok(NetworkKind::Vip),
            other => Err(ModelError::UnknownNetworkType(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address-range partition of a network
#[derive(Debug, Clone, PartialEq)]
pub struct Subnet {
    range: Option<IpNetwork>,
    static_ips: Vec<IpAddr>,
    azs: Vec<String>,
}

impl Subnet {
    /// Create a subnet
    ///
    /// An empty `azs` list means the subnet serves every zone.
    pub fn new(range: Option<IpNetwork>, static_ips: Vec<IpAddr>, azs: Vec<String>) -> Self {
        Self {
            range,
            static_ips,
            azs,
        }
    }

    /// CIDR range, absent for dynamic and vip subnets
    #[must_use]
    pub fn range(&self) -> Option<&IpNetwork> {
        self.range.as_ref()
    }

    /// Ordered static pool
    #[must_use]
    pub fn static_ips(&self) -> &[IpAddr] {
        &self.static_ips
    }

    /// Zones this subnet is restricted to
    #[must_use]
    pub fn azs(&self) -> &[String] {
        &self.azs
    }

    /// True when the subnet is unrestricted or lists `az_name`
    #[must_use]
    pub fn serves_zone(&self, az_name: &str) -> bool {
        self.azs.is_empty() || self.azs.iter().any(|az| az == az_name)
    }

    /// Strict zone check used when reusing a reservation
    ///
    /// With a zone, the subnet must list it. Without one, the subnet must be
    /// unrestricted.
    #[must_use]
    pub fn admits_zone(&self, az_name: Option<&str>) -> bool {
        match az_name {
            Some(az_name) => self.azs.iter().any(|az| az == az_name),
            None => self.azs.is_empty(),
        }
    }

    /// True when `address` is inside the range or listed in the static pool
    #[must_use]
    pub fn contains(&self, address: IpAddr) -> bool {
        self.range.is_some_and(|range| range.contains(address)) || self.is_static(address)
    }

    /// True when `address` is listed in the static pool
    #[must_use]
    pub fn is_static(&self, address: IpAddr) -> bool {
        self.static_ips.contains(&address)
    }
}

/// A named network of the deployment topology
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    name: String,
    kind: NetworkKind,
    subnets: Vec<Subnet>,
}

impl Network {
    /// Build and validate a network
    ///
    /// # Errors
    ///
    /// - manual networks without subnets, or with a subnet lacking a range
    /// - static addresses outside their subnet range
    /// - static addresses listed in more than one place
    pub fn new(name: impl Into<String>, kind: NetworkKind, subnets: Vec<Subnet>) -> Result<Self, ModelError> {
        let name = name.into();

        if kind == NetworkKind::Manual {
            if subnets.is_empty() {
                return Err(ModelError::MissingSubnets(name));
            }
            if subnets.iter().any(|subnet| subnet.range.is_none()) {
                return Err(ModelError::MissingRange(name));
            }
        }

        let mut seen = BTreeSet::new();
        for subnet in &subnets {
            for address in &subnet.static_ips {
                if let Some(range) = subnet.range {
                    if !range.contains(*address) {
                        return Err(ModelError::StaticAddressOutOfRange {
                            network: name,
                            range: range.to_string(),
                            address: address.to_string(),
                        });
                    }
                }
                if !seen.insert(*address) {
                    return Err(ModelError::DuplicateStaticAddress {
                        network: name,
                        address: address.to_string(),
                    });
                }
            }
        }

        Ok(Self { name, kind, subnets })
    }

    /// Shorthand for a manual network
    ///
    /// # Errors
    ///
    /// See [`Network::new`].
    pub fn manual(name: impl Into<String>, subnets: Vec<Subnet>) -> Result<Self, ModelError> {
        Self::new(name, NetworkKind::Manual, subnets)
    }

    /// Shorthand for a dynamic network
    ///
    /// # Errors
    ///
    /// See [`Network::new`].
    pub fn dynamic(name: impl Into<String>, subnets: Vec<Subnet>) -> Result<Self, ModelError> {
        Self::new(name, NetworkKind::Dynamic, subnets)
    }

    /// Shorthand for a vip network, global when `subnets` is non-empty
    ///
    /// # Errors
    ///
    /// See [`Network::new`].
    pub fn vip(name: impl Into<String>, subnets: Vec<Subnet>) -> Result<Self, ModelError> {
        Self::new(name, NetworkKind::Vip, subnets)
    }

    /// Legacy vip network without subnets
    pub fn standalone_vip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NetworkKind::Vip,
            subnets: Vec::new(),
        }
    }

    /// Network name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Network kind
    #[must_use]
    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// Subnets in declaration order
    #[must_use]
    pub fn subnets(&self) -> &[Subnet] {
        &self.subnets
    }

    /// True for dynamic networks
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.kind == NetworkKind::Dynamic
    }

    /// Legacy vip network, no subnet or zone concept
    #[must_use]
    pub fn is_standalone_vip(&self) -> bool {
        self.kind == NetworkKind::Vip && self.subnets.is_empty()
    }

    /// Vip network with zoned subnets
    #[must_use]
    pub fn is_global_vip(&self) -> bool {
        self.kind == NetworkKind::Vip && !self.subnets.is_empty()
    }

    /// True when any subnet has a CIDR range
    #[must_use]
    pub fn has_ranges(&self) -> bool {
        self.subnets.iter().any(|subnet| subnet.range.is_some())
    }

    /// Subnets whose range or static pool holds `address`
    pub fn subnets_containing(&self, address: IpAddr) -> impl Iterator<Item = &Subnet> {
        self.subnets.iter().filter(move |subnet| subnet.contains(address))
    }

    /// True when any subnet holds `address`
    #[must_use]
    pub fn contains(&self, address: IpAddr) -> bool {
        self.subnets_containing(address).next().is_some()
    }

    /// True when any subnet lists `address` in its static pool
    #[must_use]
    pub fn is_static_address(&self, address: IpAddr) -> bool {
        self.subnets.iter().any(|subnet| subnet.is_static(address))
    }

    /// Subnets a reservation at `address` is placed in
    ///
    /// Those holding the address, or every subnet when there is no address
    /// or no subnet holds it.
    #[must_use]
    pub fn placement_subnets(&self, address: Option<IpAddr>) -> Vec<&Subnet> {
        match address {
            Some(address) if self.contains(address) => self.subnets_containing(address).collect(),
            _ => self.subnets.iter().collect(),
        }
    }

    /// True when a placement subnet for `address` admits `az_name`
    ///
    /// Networks without subnets carry no zone information and admit any zone.
    #[must_use]
    pub fn admits_zone(&self, address: Option<IpAddr>, az_name: Option<&str>) -> bool {
        self.subnets.is_empty()
            || self
                .placement_subnets(address)
                .into_iter()
                .any(|subnet| subnet.admits_zone(az_name))
    }

    /// Zone names of the placement subnets for `address`, deduplicated, in order
    #[must_use]
    pub fn az_names_for(&self, address: Option<IpAddr>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for subnet in self.placement_subnets(address) {
            for az in &subnet.azs {
                if !names.contains(az) {
                    names.push(az.clone());
                }
            }
        }
        names
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
