//! In-memory address ledger.
//!
//! Tracks which instance owns each address so that two instances never end
//! up with the same static or vip address. The ledger only checks claims; it
//! never picks addresses and never persists anything.

use crate::error::ControllerError;
use deployment_model::{ExistingReservation, InstanceId, ReservationKind};
use network_planner::NetworkPlan;
use std::collections::HashMap;
use std::net::IpAddr;
use tracing::{debug, warn};

/// What applying one instance's plans changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LedgerChanges {
    /// Addresses claimed
    pub claimed: usize,

    /// Addresses released
    pub released: usize,

    /// Dynamic reservations waiting for an external address
    pub pending_dynamic: usize,
}

/// Address to owner map
#[derive(Debug, Default)]
pub struct AddressLedger {
    owners: HashMap<IpAddr, InstanceId>,
    pending_dynamic: usize,
}

impl AddressLedger {
    /// Empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record persisted reservations as owned
    pub fn seed<'a>(&mut self, reservations: impl IntoIterator<Item = &'a ExistingReservation>) {
        for reservation in reservations {
            if let Some(address) = reservation.address() {
                if let Some(previous) = self.owners.insert(address, reservation.instance().clone()) {
                    if &previous != reservation.instance() {
                        warn!(
                            "Persisted address {} is recorded for both {} and {}",
                            address,
                            previous,
                            reservation.instance()
                        );
                    }
                }
            }
        }
    }

    /// Current owner of `address`
    #[must_use]
    pub fn owner(&self, address: IpAddr) -> Option<&InstanceId> {
        self.owners.get(&address)
    }

    /// Number of tracked addresses
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// True when no address is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Dynamic reservations waiting for an external address
    #[must_use]
    pub fn pending_dynamic(&self) -> usize {
        self.pending_dynamic
    }

    /// Claim `address` for `instance`
    ///
    /// Re-claiming an address the instance already owns is a no-op.
    pub fn claim(&mut self, instance: &InstanceId, address: IpAddr) -> Result<bool, ControllerError> {
        match self.owner(address) {
            Some(owner) if owner == instance => Ok(false),
            Some(owner) => Err(ControllerError::AddressConflict {
                address,
                owner: owner.clone(),
                claimant: instance.clone(),
            }),
            None => {
                self.owners.insert(address, instance.clone());
                Ok(true)
            }
        }
    }

    /// Release `address` if `instance` owns it
    pub fn release(&mut self, instance: &InstanceId, address: IpAddr) -> bool {
        match self.owners.get(&address) {
            Some(owner) if owner == instance => {
                self.owners.remove(&address);
                true
            }
            Some(owner) => {
                warn!("{} released {} which is owned by {}, ignoring", instance, address, owner);
                false
            }
            None => false,
        }
    }

    /// Apply the releases of one instance's plans
    pub fn apply_releases(&mut self, instance: &InstanceId, plans: &[NetworkPlan]) -> LedgerChanges {
        let mut changes = LedgerChanges::default();
        for plan in plans.iter().filter(|plan| plan.is_obsolete()) {
            if let Some(address) = plan.reservation().address() {
                if self.release(instance, address) {
                    debug!("Released {} from {}", address, instance);
                    changes.released += 1;
                }
            }
        }
        changes
    }

    /// Apply the claims of one instance's plans
    pub fn apply_claims(&mut self, instance: &InstanceId, plans: &[NetworkPlan]) -> Result<LedgerChanges, ControllerError> {
        let mut changes = LedgerChanges::default();
        for plan in plans.iter().filter(|plan| plan.is_desired()) {
            let reservation = plan.reservation();
            match (reservation.kind(), reservation.address()) {
                (ReservationKind::Static | ReservationKind::Vip, Some(address)) => {
                    if self.claim(instance, address)? {
                        debug!("Claimed {} for {}", address, instance);
                        changes.claimed += 1;
                    }
                }
                (ReservationKind::Dynamic, _) | (ReservationKind::Static | ReservationKind::Vip, None) => {
                    self.pending_dynamic += 1;
                    changes.pending_dynamic += 1;
                }
            }
        }
        Ok(changes)
    }
}
