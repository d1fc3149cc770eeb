//! Reconciliation diagnostics
//!
//! Every decision the reconciler takes is reported as a [`Diagnostic`]
//! through an injected [`Diagnostics`] sink. Production code forwards them to
//! `tracing` at debug level; tests record them and assert on the reasons.

use deployment_model::{InstanceId, NetworkKind, ReservationKind};
use std::fmt;
use std::net::IpAddr;
use tracing::debug;

/// Why a create-swap-delete instance gets all-new reservations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementReason {
    /// Instance is recreated for reasons unrelated to networking
    RecreateForNonNetworkReasons,

    /// Desired reservations differ in count or kinds from existing ones
    ShapeMismatch {
        /// Number of existing reservations
        existing: usize,
        /// Number of desired reservations
        desired: usize,
    },

    /// Matching left some reservations unpaired
    PartialMatch,
}

impl fmt::Display for ReplacementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementReason::RecreateForNonNetworkReasons => f.write_str("instance is recreated for non-network reasons"),
            ReplacementReason::ShapeMismatch { existing, desired } => write!(
                f,
                "desired reservations ({desired}) do not have the shape of existing reservations ({existing})"
            ),
            ReplacementReason::PartialMatch => f.write_str("only some reservations could be reused"),
        }
    }
}

/// One reconciliation decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Bulk-dynamic shortcut kept every existing reservation
    BulkDynamicReuse {
        /// Instance being reconciled
        instance: InstanceId,
        /// Number of reservations kept
        reused: usize,
    },

    /// Create-swap-delete instance gets all-new reservations
    CreateSwapDeleteReplacement {
        /// Instance being reconciled
        instance: InstanceId,
        /// Why partial reuse was not attempted or abandoned
        reason: ReplacementReason,
    },

    /// Existing reservation zones do not admit the desired zone
    AzMismatch {
        /// Existing reservation
        reservation: String,
        /// Zones of the subnets the reservation falls into
        reservation_azs: Vec<String>,
        /// Zone the instance is placed in for this run
        desired_az: Option<String>,
    },

    /// Network types differ
    NetworkTypeMismatch {
        /// Existing reservation
        reservation: String,
        /// Existing network type
        existing: NetworkKind,
        /// Desired network type
        desired: NetworkKind,
    },

    /// Reservation kinds differ
    KindMismatch {
        /// Existing reservation
        reservation: String,
        /// Existing kind
        existing: ReservationKind,
        /// Desired kind
        desired: ReservationKind,
    },

    /// Literal addresses differ
    AddressMismatch {
        /// Existing reservation
        reservation: String,
        /// Desired address
        desired: Option<IpAddr>,
    },

    /// Existing address does not belong to the desired network
    AddressOutsideNetwork {
        /// Existing reservation
        reservation: String,
        /// Desired network name
        network: String,
    },

    /// Existing reservation reused for a desired one
    Reused {
        /// Existing reservation
        reservation: String,
        /// Desired reservation it satisfies
        desired: String,
    },

    /// Desired reservation has no existing counterpart
    NewReservation {
        /// Desired reservation
        reservation: String,
    },

    /// Existing reservation is no longer needed
    Unneeded {
        /// Existing reservation
        reservation: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::BulkDynamicReuse { instance, reused } => write!(
                f,
                "Instance {instance} is only on dynamic networks, reusing {reused} existing reservation(s)"
            ),
            Diagnostic::CreateSwapDeleteReplacement { instance, reason } => write!(
                f,
                "Not reusing reservations of create-swap-delete instance {instance}: {reason}"
            ),
            Diagnostic::AzMismatch { reservation, reservation_azs, desired_az } => write!(
                f,
                "Can't reuse reservation {reservation}, existing reservation belongs to azs: {reservation_azs:?}, desired az is {}",
                desired_az.as_deref().map_or_else(|| "nil".to_string(), |az| format!("'{az}'"))
            ),
            Diagnostic::NetworkTypeMismatch { reservation, existing, desired } => write!(
                f,
                "Can't reuse reservation {reservation}, network type changed from {existing} to {desired}"
            ),
            Diagnostic::KindMismatch { reservation, existing, desired } => write!(
                f,
                "Can't reuse reservation {reservation}, reservation type changed from {existing} to {desired}"
            ),
            Diagnostic::AddressMismatch { reservation, desired } => write!(
                f,
                "Can't reuse reservation {reservation}, desired ip is {}",
                desired.map_or_else(|| "none".to_string(), |address| address.to_string())
            ),
            Diagnostic::AddressOutsideNetwork { reservation, network } => write!(
                f,
                "Can't reuse reservation {reservation}, ip is not part of network '{network}'"
            ),
            Diagnostic::Reused { reservation, desired } => {
                write!(f, "Reusing existing reservation {reservation} for {desired}")
            }
            Diagnostic::NewReservation { reservation } => {
                write!(f, "No existing reservation found for {reservation}")
            }
            Diagnostic::Unneeded { reservation } => write!(f, "Unneeded reservation {reservation}"),
        }
    }
}

/// Sink for reconciliation decisions
pub trait Diagnostics: Send + Sync {
    /// Record one decision
    fn record(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use recording::RecordingDiagnostics;

#[cfg(any(test, feature = "test-util"))]
mod recording {
    use super::{Diagnostic, Diagnostics};
    use std::sync::{Mutex, PoisonError};

    /// Keeps every diagnostic in memory for assertions
    #[derive(Debug, Default)]
    pub struct RecordingDiagnostics {
        entries: Mutex<Vec<Diagnostic>>,
    }

    impl RecordingDiagnostics {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Recorded diagnostics in order
        pub fn entries(&self) -> Vec<Diagnostic> {
            self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Rendered messages in order
        pub fn messages(&self) -> Vec<String> {
            self.entries().iter().map(ToString::to_string).collect()
        }
    }

    impl Diagnostics for RecordingDiagnostics {
        fn record(&self, diagnostic: Diagnostic) {
            self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(diagnostic);
        }
    }
}
