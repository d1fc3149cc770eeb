//! Deployment Network Model
//!
//! Value types describing a deployment's network topology and the
//! reservations binding instances to it:
//! - [`AvailabilityZone`], [`Subnet`], [`Network`] and [`DeploymentTopology`]
//! - [`ExistingReservation`] and [`DesiredReservation`], sharing [`Reservation`]
//! - manifest specs ([`TopologySpec`], [`NetworkSpec`], [`SubnetSpec`]) that
//!   validate raw input into the types above
//!
//! # Example
//!
//! ```
//! use deployment_model::TopologySpec;
//!
//! let manifest = r#"
//! azs:
//!   - name: z1
//! networks:
//!   - name: private
//!     type: manual
//!     subnets:
//!       - range: 10.0.0.0/24
//!         static: ["10.0.0.10 - 10.0.0.20"]
//!         az: z1
//! "#;
//!
//! let topology = TopologySpec::from_yaml(manifest)?.to_topology()?;
//! let private = topology.network("private").expect("declared above");
//! assert!(private.subnets()[0].serves_zone("z1"));
//! # Ok::<(), deployment_model::ModelError>(())
//! ```

pub mod address;
pub mod availability_zone;
pub mod error;
pub mod manifest;
pub mod network;
pub mod reservation;
pub mod topology;


pub use address::{parse_address, parse_range, parse_static_entries};
pub use availability_zone::AvailabilityZone;
pub use error::ModelError;
pub use manifest::{NetworkSpec, SubnetSpec, TopologySpec};
pub use network::{Network, NetworkKind, Subnet};
pub use reservation::{DesiredReservation, ExistingReservation, InstanceId, Reservation, ReservationKind};
pub use topology::DeploymentTopology;
