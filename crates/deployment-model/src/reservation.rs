//! Network reservations
//!
//! A reservation binds one instance to one network. Its kind is fixed when
//! the reservation is built, from one of two sources:
//! - [`ExistingReservation`]: rebuilt from persisted deployment state
//! - [`DesiredReservation`]: built fresh for the current deployment run
//!
//! Both expose the shared fields through [`Reservation`].

use crate::address::parse_address;
use crate::error::ModelError;
use crate::network::{Network, NetworkKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

/// Identity of the instance owning a reservation, `<group>/<index>`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId {
    /// Instance group name
    pub group: String,

    /// Index within the group
    pub index: u32,
}

impl InstanceId {
    /// Create an identity
    pub fn new(group: impl Into<String>, index: u32) -> Self {
        Self {
            group: group.into(),
            index,
        }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.index)
    }
}

impl FromStr for InstanceId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidInstanceId(value.to_string());
        let (group, index) = value.rsplit_once('/').ok_or_else(invalid)?;
        if group.is_empty() {
            return Err(invalid());
        }
        let index = index.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(group, index))
    }
}

/// Reservation kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    /// Director-assigned fixed address
    Static,

    /// Externally assigned address
    Dynamic,

    /// Externally routable floating address
    Vip,
}

impl ReservationKind {
    /// Tag used in logs and reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationKind::Static => "static",
            ReservationKind::Dynamic => "dynamic",
            ReservationKind::Vip => "vip",
        }
    }

    /// Resolve the kind of a persisted reservation row
    ///
    /// Rows store the network type they were made under. Manual networks hand
    /// out both static addresses (from the static pool) and dynamic ones
    /// (from the rest of the range), so `manual` rows resolve by pool
    /// membership.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownReservationType`] for unrecognized tags.
    pub fn from_persisted(tag: &str, network: &Network, address: Option<IpAddr>) -> Result<Self, ModelError> {
        match tag {
            "static" => Ok(ReservationKind::Static),
            "dynamic" => Ok(ReservationKind::Dynamic),
            "vip" => Ok(ReservationKind::Vip),
            "manual" => Ok(match address {
                Some(address) if network.is_static_address(address) => ReservationKind::Static,
                _ => ReservationKind::Dynamic,
            }),
            other => Err(ModelError::UnknownReservationType(other.to_string())),
        }
    }
}

impl fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by existing and desired reservations
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    instance: InstanceId,
    network: Arc<Network>,
    address: Option<IpAddr>,
    kind: ReservationKind,
}

impl Reservation {
    /// Owning instance
    #[must_use]
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    /// Network the reservation is reported under
    #[must_use]
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Address, absent for desired dynamic reservations
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        self.address
    }

    /// Reservation kind
    #[must_use]
    pub fn kind(&self) -> ReservationKind {
        self.kind
    }

    /// True for static reservations
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.kind == ReservationKind::Static
    }

    /// True for dynamic reservations
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.kind == ReservationKind::Dynamic
    }

    /// True for vip reservations
    #[must_use]
    pub fn is_vip(&self) -> bool {
        self.kind == ReservationKind::Vip
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{type={}, ip={}, network={}, instance={}}}",
            self.kind,
            self.address.map_or_else(|| "none".to_string(), |address| address.to_string()),
            self.network.name(),
            self.instance,
        )
    }
}

/// Reservation recovered from persisted deployment state
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingReservation(Reservation);

impl ExistingReservation {
    /// Build with an already known kind
    pub fn new(instance: InstanceId, network: Arc<Network>, address: Option<IpAddr>, kind: ReservationKind) -> Self {
        Self(Reservation {
            instance,
            network,
            address,
            kind,
        })
    }

    /// Build from a persisted row: address text and stored network type tag
    ///
    /// # Errors
    ///
    /// Returns an error when the address does not parse or the tag is unknown.
    pub fn from_persisted(
        instance: InstanceId,
        network: Arc<Network>,
        address: Option<&str>,
        tag: &str,
    ) -> Result<Self, ModelError> {
        let address = address.map(parse_address).transpose()?;
        let kind = ReservationKind::from_persisted(tag, &network, address)?;
        Ok(Self::new(instance, network, address, kind))
    }

    /// Same reservation, reported under `network`
    #[must_use]
    pub fn rebind(mut self, network: Arc<Network>) -> Self {
        self.0.network = network;
        self
    }
}

impl Deref for ExistingReservation {
    type Target = Reservation;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ExistingReservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Reservation requested by the current deployment run
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredReservation(Reservation);

impl DesiredReservation {
    /// Reservation whose address is assigned later by the IaaS or agent
    pub fn new_dynamic(instance: InstanceId, network: Arc<Network>) -> Self {
        Self(Reservation {
            instance,
            network,
            address: None,
            kind: ReservationKind::Dynamic,
        })
    }

    /// Reservation for a fixed address; vip on vip networks, static otherwise
    pub fn new_static(instance: InstanceId, network: Arc<Network>, address: IpAddr) -> Self {
        let kind = match network.kind() {
            NetworkKind::Vip => ReservationKind::Vip,
            NetworkKind::Manual | NetworkKind::Dynamic => ReservationKind::Static,
        };
        Self(Reservation {
            instance,
            network,
            address: Some(address),
            kind,
        })
    }
}

impl Deref for DesiredReservation {
    type Target = Reservation;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for DesiredReservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
