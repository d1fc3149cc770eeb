//! Reservation reconciliation
//!
//! Decides, for one instance, which persisted reservations are kept, which
//! desired reservations must be allocated and which persisted reservations
//! must be released. The decision procedure runs in order:
//! 1. bulk-dynamic shortcut: an instance only on dynamic networks keeps what it has
//! 2. create-swap-delete: reuse is all or nothing
//! 3. general matching: greedy, one-to-one, in persisted order
//! 4. residuals: unmatched desired are allocated, unclaimed existing released
//!
//! Non-matches are routine output, never errors. Every decision goes to the
//! injected [`Diagnostics`] sink.

use crate::diagnostics::{Diagnostic, Diagnostics, ReplacementReason};
use crate::instance_plan::InstancePlan;
use crate::plan::NetworkPlan;
use deployment_model::{
    AvailabilityZone, DesiredReservation, ExistingReservation, Network, NetworkKind, ReservationKind,
};
use std::fmt;
use std::sync::Arc;

/// Result of pairing desired reservations with existing ones
struct Matching {
    kept: Vec<ExistingReservation>,
    unmatched: Vec<DesiredReservation>,
    unclaimed: Vec<ExistingReservation>,
}

impl Matching {
    fn is_complete(&self) -> bool {
        self.unmatched.is_empty() && self.unclaimed.is_empty()
    }

    fn into_plans(self) -> Vec<NetworkPlan> {
        self.kept
            .into_iter()
            .map(NetworkPlan::Existing)
            .chain(self.unmatched.into_iter().map(NetworkPlan::Desired))
            .chain(self.unclaimed.into_iter().map(NetworkPlan::Obsolete))
            .collect()
    }
}

/// Reconciles the reservations of one instance
pub struct ReservationReconciler<'a> {
    instance_plan: &'a dyn InstancePlan,
    diagnostics: &'a dyn Diagnostics,
}

impl fmt::Debug for ReservationReconciler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReservationReconciler")
            .field("instance", self.instance_plan.instance())
            .finish_non_exhaustive()
    }
}

impl<'a> ReservationReconciler<'a> {
    /// Bind a reconciler to one instance plan and a diagnostics sink
    pub fn new(instance_plan: &'a dyn InstancePlan, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            instance_plan,
            diagnostics,
        }
    }

    /// Classify every desired and existing reservation of the instance
    ///
    /// Output order is kept plans, then plans to allocate, then plans to
    /// release. Identical inputs always yield identical output.
    #[must_use]
    pub fn reconcile(&self, existing: Vec<ExistingReservation>) -> Vec<NetworkPlan> {
        let desired = self.desired_reservations();

        // dynamic-only instance: keep everything, addresses are external
        if Self::bulk_dynamic_applies(&desired, &existing) {
            self.diagnostics.record(Diagnostic::BulkDynamicReuse {
                instance: self.instance_plan.instance().clone(),
                reused: existing.len(),
            });
            return existing.into_iter().map(NetworkPlan::Existing).collect();
        }

        // create-swap-delete: reuse all or nothing
        if self.instance_plan.should_create_swap_delete() {
            return self.reconcile_create_swap_delete(desired, existing);
        }

        // in-place update: greedy one-to-one matching
        let matching = self.match_reservations(desired, existing);
        self.report_residuals(&matching);
        matching.into_plans()
    }

    fn desired_reservations(&self) -> Vec<DesiredReservation> {
        self.instance_plan
            .network_plans()
            .iter()
            .filter_map(|plan| match plan {
                NetworkPlan::Desired(reservation) => Some(reservation.clone()),
                NetworkPlan::Existing(_) | NetworkPlan::Obsolete(_) => None,
            })
            .collect()
    }

    fn bulk_dynamic_applies(desired: &[DesiredReservation], existing: &[ExistingReservation]) -> bool {
        !desired.is_empty()
            && desired.iter().all(|reservation| reservation.network().is_dynamic())
            && existing
                .iter()
                .any(|reservation| reservation.is_dynamic() && reservation.network().is_dynamic())
    }

    fn reconcile_create_swap_delete(
        &self,
        desired: Vec<DesiredReservation>,
        existing: Vec<ExistingReservation>,
    ) -> Vec<NetworkPlan> {
        let reason = if self.instance_plan.recreate_for_non_network_reasons() {
            Some(ReplacementReason::RecreateForNonNetworkReasons)
        } else if !Self::same_shape(&desired, &existing) {
            Some(ReplacementReason::ShapeMismatch {
                existing: existing.len(),
                desired: desired.len(),
            })
        } else {
            None
        };

        if let Some(reason) = reason {
            return self.replace_all(desired, existing, reason);
        }

        // same shape, accept only a complete pairing
        let matching = self.match_reservations(desired.clone(), existing.clone());
        if matching.is_complete() {
            return matching.into_plans();
        }
        self.replace_all(desired, existing, ReplacementReason::PartialMatch)
    }

    fn same_shape(desired: &[DesiredReservation], existing: &[ExistingReservation]) -> bool {
        if desired.len() != existing.len() {
            return false;
        }
        let mut desired_kinds: Vec<ReservationKind> = desired.iter().map(|reservation| reservation.kind()).collect();
        let mut existing_kinds: Vec<ReservationKind> = existing.iter().map(|reservation| reservation.kind()).collect();
        desired_kinds.sort_unstable();
        existing_kinds.sort_unstable();
        desired_kinds == existing_kinds
    }

    fn replace_all(
        &self,
        desired: Vec<DesiredReservation>,
        existing: Vec<ExistingReservation>,
        reason: ReplacementReason,
    ) -> Vec<NetworkPlan> {
        self.diagnostics.record(Diagnostic::CreateSwapDeleteReplacement {
            instance: self.instance_plan.instance().clone(),
            reason,
        });
        let matching = Matching {
            kept: Vec::new(),
            unmatched: desired,
            unclaimed: existing,
        };
        self.report_residuals(&matching);
        matching.into_plans()
    }

    fn match_reservations(&self, desired: Vec<DesiredReservation>, existing: Vec<ExistingReservation>) -> Matching {
        let mut unclaimed: Vec<Option<ExistingReservation>> = existing.into_iter().map(Some).collect();
        let mut kept = Vec::new();
        let mut unmatched = Vec::new();

        for wanted in desired {
            match self.find_equivalent(&unclaimed, &wanted) {
                Some(position) => {
                    if let Some(found) = unclaimed[position].take() {
                        self.diagnostics.record(Diagnostic::Reused {
                            reservation: found.to_string(),
                            desired: wanted.to_string(),
                        });
                        kept.push(found.rebind(Arc::clone(wanted.network())));
                    }
                }
                None => unmatched.push(wanted),
            }
        }

        Matching {
            kept,
            unmatched,
            unclaimed: unclaimed.into_iter().flatten().collect(),
        }
    }

    /// Position of the existing reservation that satisfies `desired`
    ///
    /// An equivalent candidate with the exact desired address wins; otherwise
    /// the first equivalent candidate in persisted order.
    fn find_equivalent(&self, candidates: &[Option<ExistingReservation>], desired: &DesiredReservation) -> Option<usize> {
        let mut first = None;
        for (position, candidate) in candidates.iter().enumerate() {
            let Some(candidate) = candidate else {
                continue;
            };
            if !self.equivalent(candidate, desired) {
                continue;
            }
            if desired.address().is_some() && candidate.address() == desired.address() {
                return Some(position);
            }
            if first.is_none() {
                first = Some(position);
            }
        }
        first
    }

    fn equivalent(&self, existing: &ExistingReservation, desired: &DesiredReservation) -> bool {
        match (existing.network().kind(), desired.network().kind()) {
            // legacy rows on a standalone vip network carry any kind
            (NetworkKind::Vip, NetworkKind::Vip)
                if desired.network().is_global_vip() && (existing.is_vip() || existing.network().is_standalone_vip()) =>
            {
                self.check_global_vip(existing, desired)
            }
            (NetworkKind::Manual, NetworkKind::Manual)
            | (NetworkKind::Dynamic, NetworkKind::Dynamic)
            | (NetworkKind::Vip, NetworkKind::Vip) => self.check_same_network_type(existing, desired),
            (NetworkKind::Manual, NetworkKind::Dynamic | NetworkKind::Vip)
            | (NetworkKind::Dynamic, NetworkKind::Manual | NetworkKind::Vip)
            | (NetworkKind::Vip, NetworkKind::Manual | NetworkKind::Dynamic) => {
                self.diagnostics.record(Diagnostic::NetworkTypeMismatch {
                    reservation: existing.to_string(),
                    existing: existing.network().kind(),
                    desired: desired.network().kind(),
                });
                false
            }
        }
    }

    /// Vip reservation moving onto a zoned vip network
    fn check_global_vip(&self, existing: &ExistingReservation, desired: &DesiredReservation) -> bool {
        let Some(address) = existing.address() else {
            self.diagnostics.record(Diagnostic::AddressMismatch {
                reservation: existing.to_string(),
                desired: desired.address(),
            });
            return false;
        };

        if desired.address().is_some_and(|wanted| wanted != address) {
            self.diagnostics.record(Diagnostic::AddressMismatch {
                reservation: existing.to_string(),
                desired: desired.address(),
            });
            return false;
        }

        if !desired.network().contains(address) {
            self.diagnostics.record(Diagnostic::AddressOutsideNetwork {
                reservation: existing.to_string(),
                network: desired.network().name().to_string(),
            });
            return false;
        }

        // standalone vip networks carry no zone information
        existing.network().is_standalone_vip() || self.az_compatible(existing, desired.network())
    }

    fn check_same_network_type(&self, existing: &ExistingReservation, desired: &DesiredReservation) -> bool {
        if existing.kind() != desired.kind() {
            self.diagnostics.record(Diagnostic::KindMismatch {
                reservation: existing.to_string(),
                existing: existing.kind(),
                desired: desired.kind(),
            });
            return false;
        }

        match existing.kind() {
            ReservationKind::Static | ReservationKind::Vip => {
                if existing.address() != desired.address() {
                    self.diagnostics.record(Diagnostic::AddressMismatch {
                        reservation: existing.to_string(),
                        desired: desired.address(),
                    });
                    return false;
                }
            }
            ReservationKind::Dynamic => {
                let network = desired.network();
                if let Some(address) = existing.address() {
                    if network.has_ranges() && !network.contains(address) {
                        self.diagnostics.record(Diagnostic::AddressOutsideNetwork {
                            reservation: existing.to_string(),
                            network: network.name().to_string(),
                        });
                        return false;
                    }
                }
            }
        }

        self.az_compatible(existing, desired.network())
    }

    /// Zone gate, evaluated against the subnets of the desired network
    fn az_compatible(&self, existing: &ExistingReservation, network: &Network) -> bool {
        let desired_az = self.instance_plan.desired_az().map(AvailabilityZone::name);
        if network.admits_zone(existing.address(), desired_az) {
            return true;
        }

        self.diagnostics.record(Diagnostic::AzMismatch {
            reservation: existing.to_string(),
            reservation_azs: network.az_names_for(existing.address()),
            desired_az: desired_az.map(str::to_string),
        });
        false
    }

    fn report_residuals(&self, matching: &Matching) {
        for reservation in &matching.unmatched {
            self.diagnostics.record(Diagnostic::NewReservation {
                reservation: reservation.to_string(),
            });
        }
        for reservation in &matching.unclaimed {
            self.diagnostics.record(Diagnostic::Unneeded {
                reservation: reservation.to_string(),
            });
        }
    }
}
