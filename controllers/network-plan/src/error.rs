//! Controller-specific error types.
//!
//! Upstream data problems surface as [`ModelError`]; everything the
//! controller itself can trip over is listed here.

use deployment_model::{InstanceId, ModelError};
use std::net::IpAddr;
use thiserror::Error;

/// Errors that can occur while planning a deployment
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Topology or persisted reservation rejected by the model
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// State document or report could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State document is not valid YAML for the expected shape
    #[error("Invalid deployment state: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report could not be serialized
    #[error("Report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Instance references a network that is not declared
    #[error("Instance {instance} references unknown network '{network}'")]
    UnknownNetwork {
        /// Referencing instance
        instance: InstanceId,
        /// Network name
        network: String,
    },

    /// Instance is placed in a zone that is not declared
    #[error("Instance {instance} is placed in unknown availability zone '{az}'")]
    UnknownAvailabilityZone {
        /// Instance
        instance: InstanceId,
        /// Zone name
        az: String,
    },

    /// Two instances want the same address
    #[error("Address {address} wanted by {claimant} is owned by {owner}")]
    AddressConflict {
        /// Contested address
        address: IpAddr,
        /// Instance holding the address
        owner: InstanceId,
        /// Instance asking for it
        claimant: InstanceId,
    },

    /// Reconciliation worker panicked or was cancelled
    #[error("Reconciliation worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
