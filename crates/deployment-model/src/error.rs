//! Deployment model errors
//!
//! Every variant describes upstream data that must be rejected before it can
//! reach the reservation reconciler.

use thiserror::Error;

/// Errors raised while building networks, topologies and reservations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Address could not be parsed
    #[error("Invalid IP address '{0}'")]
    InvalidAddress(String),

    /// Subnet range could not be parsed
    #[error("Invalid subnet range '{0}'")]
    InvalidRange(String),

    /// Static range is reversed or mixes address families
    #[error("Invalid static range '{0}'")]
    InvalidStaticRange(String),

    /// Static range expands to more addresses than we are willing to track
    #[error("Static range '{range}' expands to more than {limit} addresses")]
    StaticRangeTooLarge {
        /// Range as written in the manifest
        range: String,
        /// Maximum number of addresses accepted
        limit: u128,
    },

    /// Same static address listed twice within one network
    #[error("Static IP '{address}' is listed more than once in network '{network}'")]
    DuplicateStaticAddress {
        /// Network name
        network: String,
        /// Offending address
        address: String,
    },

    /// Static address outside of its subnet range
    #[error("Static IP '{address}' is out of subnet range '{range}' in network '{network}'")]
    StaticAddressOutOfRange {
        /// Network name
        network: String,
        /// Subnet range
        range: String,
        /// Offending address
        address: String,
    },

    /// Manual subnet declared without a range
    #[error("Subnet in manual network '{0}' is missing a range")]
    MissingRange(String),

    /// Manual network declared without subnets
    #[error("Manual network '{0}' must declare at least one subnet")]
    MissingSubnets(String),

    /// Network type tag not recognized
    #[error("Unknown network type '{0}'")]
    UnknownNetworkType(String),

    /// Persisted reservation type tag not recognized
    #[error("Unknown reservation type '{0}'")]
    UnknownReservationType(String),

    /// Subnet references an availability zone that is not declared
    #[error("Network '{network}' references unknown availability zone '{az}'")]
    UnknownAvailabilityZone {
        /// Network name
        network: String,
        /// Referenced zone
        az: String,
    },

    /// Availability zone declared twice
    #[error("Duplicate availability zone '{0}'")]
    DuplicateAvailabilityZone(String),

    /// Network declared twice
    #[error("Duplicate network '{0}'")]
    DuplicateNetwork(String),

    /// Subnet sets both `az` and `azs`
    #[error("Subnet in network '{0}' sets both 'az' and 'azs'")]
    ConflictingAzKeys(String),

    /// Manifest document did not deserialize
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Instance identity could not be parsed
    #[error("Invalid instance identity '{0}', expected '<group>/<index>'")]
    InvalidInstanceId(String),
}
