//! Unit tests for the reservation reconciler
//!
//! Fixtures mirror a two-subnet manual network:
//! - `192.168.1.0/24` in `zone_1`, static pool `192.168.1.10`
//! - `192.168.2.0/24` in `zone_2`, static pool `192.168.2.10`

#[cfg(test)]
mod tests {
    use crate::*;
    use deployment_model::{
        AvailabilityZone, DesiredReservation, ExistingReservation, InstanceId, Network, ReservationKind, Subnet,
        parse_address, parse_range,
    };
    use std::net::IpAddr;
    use std::sync::Arc;

    fn ip(value: &str) -> IpAddr {
        parse_address(value).expect("test address")
    }

    fn instance() -> InstanceId {
        InstanceId::new("web", 0)
    }

    fn subnet(range: &str, statics: &[&str], azs: &[&str]) -> Subnet {
        Subnet::new(
            Some(parse_range(range).expect("test range")),
            statics.iter().map(|s| ip(s)).collect(),
            azs.iter().map(ToString::to_string).collect(),
        )
    }

    fn zoned_subnets() -> Vec<Subnet> {
        vec![
            subnet("192.168.1.0/24", &["192.168.1.10"], &["zone_1"]),
            subnet("192.168.2.0/24", &["192.168.2.10"], &["zone_2"]),
        ]
    }

    fn unzoned_subnets() -> Vec<Subnet> {
        vec![subnet("192.168.1.0/24", &["192.168.1.10"], &[])]
    }

    fn manual(name: &str, subnets: Vec<Subnet>) -> Arc<Network> {
        Arc::new(Network::manual(name, subnets).expect("valid manual network"))
    }

    fn dynamic(name: &str, subnets: Vec<Subnet>) -> Arc<Network> {
        Arc::new(Network::dynamic(name, subnets).expect("valid dynamic network"))
    }

    fn existing(network: &Arc<Network>, address: &str, kind: ReservationKind) -> ExistingReservation {
        ExistingReservation::new(instance(), Arc::clone(network), Some(ip(address)), kind)
    }

    fn desired_dynamic(network: &Arc<Network>) -> NetworkPlan {
        NetworkPlan::Desired(DesiredReservation::new_dynamic(instance(), Arc::clone(network)))
    }

    fn desired_static(network: &Arc<Network>, address: &str) -> NetworkPlan {
        NetworkPlan::Desired(DesiredReservation::new_static(instance(), Arc::clone(network), ip(address)))
    }

    fn instance_plan(desired_az: Option<&str>, desired: Vec<NetworkPlan>) -> DesiredInstancePlan {
        DesiredInstancePlan::new(instance())
            .with_desired_az(desired_az.map(AvailabilityZone::new))
            .with_network_plans(desired)
    }

    fn reconcile(plan: &DesiredInstancePlan, existing: Vec<ExistingReservation>) -> (Vec<NetworkPlan>, RecordingDiagnostics) {
        let diagnostics = RecordingDiagnostics::new();
        let plans = ReservationReconciler::new(plan, &diagnostics).reconcile(existing);
        (plans, diagnostics)
    }

    fn split(plans: &[NetworkPlan]) -> (Vec<&NetworkPlan>, Vec<&NetworkPlan>, Vec<&NetworkPlan>) {
        (
            plans.iter().filter(|plan| plan.is_existing()).collect(),
            plans.iter().filter(|plan| plan.is_desired()).collect(),
            plans.iter().filter(|plan| plan.is_obsolete()).collect(),
        )
    }

    fn counts(plans: &[NetworkPlan]) -> (usize, usize, usize) {
        let counts = PlanCounts::of(plans);
        (counts.existing, counts.desired, counts.obsolete)
    }

    #[test]
    fn test_dynamic_network_keeps_existing_reservation() {
        let network = dynamic("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        assert!(
            matches!(diagnostics.entries()[0], Diagnostic::BulkDynamicReuse { reused: 1, .. }),
            "Shortcut must be reported"
        );
    }

    #[test]
    fn test_all_dynamic_shortcut_ignores_membership_count() {
        let first = dynamic("dyn-a", Vec::new());
        let second = dynamic("dyn-b", Vec::new());
        let plan = instance_plan(None, vec![desired_dynamic(&first), desired_dynamic(&second)]);
        let persisted = ExistingReservation::new(instance(), Arc::clone(&first), None, ReservationKind::Dynamic);

        let (plans, _) = reconcile(&plan, vec![persisted.clone()]);

        assert_eq!(counts(&plans), (1, 0, 0));
        assert_eq!(plans[0], NetworkPlan::Existing(persisted), "Shortcut keeps reservations unmodified");
    }

    #[test]
    fn test_create_swap_delete_reuses_matching_dynamic() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network)]).with_create_swap_delete(true);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
    }

    #[test]
    fn test_create_swap_delete_kind_change_replaces() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network)]).with_create_swap_delete(true);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Static)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        assert!(
            diagnostics.entries().iter().any(|entry| matches!(
                entry,
                Diagnostic::CreateSwapDeleteReplacement {
                    reason: ReplacementReason::ShapeMismatch { .. },
                    ..
                }
            )),
            "Kind multiset mismatch is a shape mismatch"
        );
    }

    #[test]
    fn test_create_swap_delete_recreate_for_non_network_reasons() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network)])
            .with_create_swap_delete(true)
            .with_recreate_for_non_network_reasons(true);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        assert_eq!(
            diagnostics.entries()[0],
            Diagnostic::CreateSwapDeleteReplacement {
                instance: instance(),
                reason: ReplacementReason::RecreateForNonNetworkReasons,
            }
        );
    }

    #[test]
    fn test_create_swap_delete_new_networks_added() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network), desired_dynamic(&network)])
            .with_create_swap_delete(true);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (0, 2, 1), "Growing a create-swap-delete instance must not reuse partially");
    }

    #[test]
    fn test_create_swap_delete_fewer_desired_networks() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network)]).with_create_swap_delete(true);

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Dynamic),
                existing(&network, "192.168.1.3", ReservationKind::Dynamic),
            ],
        );

        assert_eq!(counts(&plans), (0, 1, 2));
    }

    #[test]
    fn test_create_swap_delete_partial_match_replaces_everything() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![desired_static(&network, "192.168.1.2"), desired_static(&network, "192.168.1.5")],
        )
        .with_create_swap_delete(true);

        let (plans, diagnostics) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Static),
            ],
        );

        assert_eq!(counts(&plans), (0, 2, 2));
        assert!(
            diagnostics.entries().iter().any(|entry| matches!(
                entry,
                Diagnostic::CreateSwapDeleteReplacement {
                    reason: ReplacementReason::PartialMatch,
                    ..
                }
            )),
            "Partial reuse must fall back to full replacement"
        );
    }

    #[test]
    fn test_global_vip_reuses_standalone_vip_reservation() {
        let standalone = Arc::new(Network::standalone_vip("static-vip-network"));
        let global = Arc::new(
            Network::vip(
                "global-vip-network",
                vec![Subnet::new(None, vec![ip("192.168.1.1"), ip("192.168.1.2")], vec!["zone_1".to_string()])],
            )
            .expect("valid vip network"),
        );
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&global)]);

        let (plans, _) = reconcile(&plan, vec![existing(&standalone, "192.168.1.2", ReservationKind::Vip)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        let kept = plans[0].reservation();
        assert_eq!(kept.network().name(), "global-vip-network", "Reuse reports the global network");
        assert_eq!(kept.instance(), &instance());
        assert_eq!(kept.address(), Some(ip("192.168.1.2")));
    }

    #[test]
    fn test_global_vip_rejects_address_outside_pool() {
        let standalone = Arc::new(Network::standalone_vip("static-vip-network"));
        let global = Arc::new(
            Network::vip("global-vip-network", vec![Subnet::new(None, vec![ip("192.168.1.1")], Vec::new())])
                .expect("valid vip network"),
        );
        let plan = instance_plan(None, vec![desired_dynamic(&global)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&standalone, "192.168.1.2", ReservationKind::Vip)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        assert!(
            diagnostics
                .entries()
                .iter()
                .any(|entry| matches!(entry, Diagnostic::AddressOutsideNetwork { .. })),
            "Address outside the global pool must be explained"
        );
    }

    fn global_vip_in_zone_1() -> Arc<Network> {
        Arc::new(
            Network::vip(
                "global-vip-network",
                vec![Subnet::new(None, vec![ip("192.168.1.1"), ip("192.168.1.2")], vec!["zone_1".to_string()])],
            )
            .expect("valid vip network"),
        )
    }

    #[test]
    fn test_global_vip_reuses_legacy_dynamic_row() {
        let standalone = Arc::new(Network::standalone_vip("static-vip-network"));
        let global = global_vip_in_zone_1();
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&global)]);

        let (plans, _) = reconcile(&plan, vec![existing(&standalone, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        let kept = plans[0].reservation();
        assert_eq!(kept.network().name(), "global-vip-network");
        assert_eq!(kept.address(), Some(ip("192.168.1.2")));
        assert_eq!(kept.kind(), ReservationKind::Dynamic, "Reuse keeps the persisted kind");
    }

    #[test]
    fn test_global_vip_rejects_legacy_dynamic_row_outside_pool() {
        let standalone = Arc::new(Network::standalone_vip("static-vip-network"));
        let global = global_vip_in_zone_1();
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&global)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&standalone, "192.168.1.99", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        let (_, wanted, released) = split(&plans);
        assert_eq!(wanted[0].reservation().network().name(), "global-vip-network");
        assert_eq!(released[0].reservation().address(), Some(ip("192.168.1.99")));
        assert!(
            diagnostics
                .entries()
                .iter()
                .any(|entry| matches!(entry, Diagnostic::AddressOutsideNetwork { .. })),
            "Address outside the global pool must not be reused"
        );
    }

    #[test]
    fn test_renamed_network_keeps_reservation() {
        let network = manual("my-network", zoned_subnets());
        let renamed = manual("my-network-2", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&renamed)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        let kept = plans[0].reservation();
        assert_eq!(kept.network().name(), "my-network-2");
        assert_eq!(kept.address(), Some(ip("192.168.1.2")));
    }

    #[test]
    fn test_renamed_network_in_other_az_replaces() {
        let network = manual("my-network", zoned_subnets());
        let renamed = manual("my-network-2", zoned_subnets());
        let plan = instance_plan(Some("zone_2"), vec![desired_dynamic(&renamed)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        let (kept, wanted, released) = split(&plans);
        assert!(kept.is_empty());
        assert_eq!(released.len(), 1);
        assert_eq!(wanted.len(), 1);
        assert_eq!(wanted[0].reservation().network().name(), "my-network-2");
        assert_eq!(wanted[0].reservation().instance(), &instance());
    }

    #[test]
    fn test_renamed_network_without_az_replaces_zoned_instance() {
        let network = manual("my-network", unzoned_subnets());
        let renamed = manual("my-network-2", unzoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&renamed)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        let (_, wanted, _) = split(&plans);
        assert_eq!(counts(&plans), (0, 1, 1), "Zone-pinned instance must not reuse an unzoned subnet");
        assert_eq!(wanted[0].reservation().network().name(), "my-network-2");
    }

    #[test]
    fn test_unzoned_instance_reuses_unzoned_subnet() {
        let network = manual("my-network", unzoned_subnets());
        let renamed = manual("my-network-2", unzoned_subnets());
        let plan = instance_plan(None, vec![desired_dynamic(&renamed)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        assert_eq!(plans[0].reservation().network().name(), "my-network-2");
    }

    #[test]
    fn test_network_type_changes_to_dynamic() {
        let network = manual("my-network", zoned_subnets());
        let changed = dynamic("my-network-2", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&changed)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        let (kept, wanted, released) = split(&plans);
        assert!(kept.is_empty());
        assert_eq!(released[0].reservation().network().name(), "my-network");
        assert_eq!(wanted[0].reservation().network().name(), "my-network-2");
        assert!(
            diagnostics.entries().iter().any(|entry| matches!(
                entry,
                Diagnostic::NetworkTypeMismatch {
                    existing: deployment_model::NetworkKind::Manual,
                    desired: deployment_model::NetworkKind::Dynamic,
                    ..
                }
            )),
            "Type change must be explained"
        );
    }

    #[test]
    fn test_network_type_changes_to_manual() {
        let network = dynamic("my-network", zoned_subnets());
        let changed = manual("my-network-2", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&changed)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        let (_, wanted, released) = split(&plans);
        assert_eq!(counts(&plans), (0, 1, 1));
        assert_eq!(released[0].reservation().network().name(), "my-network");
        assert_eq!(wanted[0].reservation().network().name(), "my-network-2");
    }

    #[test]
    fn test_same_reservations_are_kept() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![desired_static(&network, "192.168.1.2"), desired_dynamic(&network)],
        );

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Dynamic),
            ],
        );

        assert_eq!(counts(&plans), (2, 0, 0));
    }

    #[test]
    fn test_static_reuse_by_address_when_order_changes() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![desired_static(&network, "192.168.1.4"), desired_static(&network, "192.168.1.3")],
        );

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Static),
            ],
        );

        let (kept, wanted, released) = split(&plans);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].reservation().address(), Some(ip("192.168.1.2")));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].reservation().address(), Some(ip("192.168.1.3")));
        assert_eq!(wanted.len(), 1);
        assert_eq!(wanted[0].reservation().address(), Some(ip("192.168.1.4")));
    }

    #[test]
    fn test_az_mismatch_releases_reservation() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_2"), vec![desired_dynamic(&network)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        let (kept, wanted, released) = split(&plans);
        assert!(kept.is_empty());
        assert_eq!(released[0].reservation().address(), Some(ip("192.168.1.2")));
        assert_eq!(wanted[0].reservation().kind(), ReservationKind::Dynamic);
    }

    #[test]
    fn test_az_mismatch_without_desired_az_is_explained() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(None, vec![desired_dynamic(&network)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        let mismatch = diagnostics
            .entries()
            .into_iter()
            .find(|entry| matches!(entry, Diagnostic::AzMismatch { .. }))
            .expect("AZ mismatch diagnostic");
        assert_eq!(
            mismatch,
            Diagnostic::AzMismatch {
                reservation: existing(&network, "192.168.1.2", ReservationKind::Dynamic).to_string(),
                reservation_azs: vec!["zone_1".to_string()],
                desired_az: None,
            }
        );
        assert!(
            mismatch.to_string().ends_with(r#"existing reservation belongs to azs: ["zone_1"], desired az is nil"#),
            "Unexpected message: {mismatch}"
        );
    }

    #[test]
    fn test_no_az_anywhere_reuses_reservation() {
        let network = manual("my-network", unzoned_subnets());
        let plan = instance_plan(None, vec![desired_dynamic(&network)]);

        let (plans, _) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (1, 0, 0));
        assert_eq!(plans[0].reservation().address(), Some(ip("192.168.1.2")));
    }

    #[test]
    fn test_new_reservations_are_desired() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![
                desired_static(&network, "192.168.1.2"),
                desired_static(&network, "192.168.1.4"),
                desired_dynamic(&network),
            ],
        );

        let (plans, diagnostics) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Dynamic),
            ],
        );

        assert_eq!(counts(&plans), (2, 1, 0));
        assert!(
            diagnostics
                .entries()
                .iter()
                .any(|entry| matches!(entry, Diagnostic::KindMismatch { .. })),
            "Static desired vs dynamic existing must be explained"
        );
    }

    #[test]
    fn test_no_desired_reservations_releases_everything() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(Some("zone_1"), Vec::new());

        let (plans, diagnostics) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Dynamic),
            ],
        );

        assert_eq!(counts(&plans), (0, 0, 2));
        assert_eq!(
            diagnostics
                .entries()
                .iter()
                .filter(|entry| matches!(entry, Diagnostic::Unneeded { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_dynamic_address_outside_desired_network() {
        let network = manual("my-network", zoned_subnets());
        let moved = manual("moved", vec![subnet("10.0.0.0/24", &[], &["zone_1"])]);
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&moved)]);

        let (plans, diagnostics) = reconcile(&plan, vec![existing(&network, "192.168.1.2", ReservationKind::Dynamic)]);

        assert_eq!(counts(&plans), (0, 1, 1));
        assert!(
            diagnostics
                .entries()
                .iter()
                .any(|entry| matches!(entry, Diagnostic::AddressOutsideNetwork { .. })),
            "Dynamic address outside the new ranges must be explained"
        );
    }

    #[test]
    fn test_output_order_is_existing_desired_obsolete() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![desired_static(&network, "192.168.1.4"), desired_static(&network, "192.168.1.3")],
        );

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.2", ReservationKind::Static),
                existing(&network, "192.168.1.3", ReservationKind::Static),
            ],
        );

        let classifications: Vec<Classification> = plans.iter().map(NetworkPlan::classification).collect();
        assert_eq!(
            classifications,
            vec![Classification::Existing, Classification::Desired, Classification::Obsolete]
        );
    }

    #[test]
    fn test_vip_reuse_by_address() {
        let standalone = Arc::new(Network::standalone_vip("public"));
        let plan = instance_plan(None, vec![desired_static(&standalone, "203.0.113.9")]);

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&standalone, "203.0.113.8", ReservationKind::Vip),
                existing(&standalone, "203.0.113.9", ReservationKind::Vip),
            ],
        );

        let (kept, _, released) = split(&plans);
        assert_eq!(kept[0].reservation().address(), Some(ip("203.0.113.9")));
        assert_eq!(released[0].reservation().address(), Some(ip("203.0.113.8")));
    }

    #[test]
    fn test_first_recovered_dynamic_wins() {
        let network = manual("my-network", zoned_subnets());
        let other = dynamic("other", Vec::new());
        let plan = instance_plan(Some("zone_1"), vec![desired_dynamic(&network), desired_dynamic(&other)]);

        let (plans, _) = reconcile(
            &plan,
            vec![
                existing(&network, "192.168.1.7", ReservationKind::Dynamic),
                existing(&network, "192.168.1.5", ReservationKind::Dynamic),
            ],
        );

        let (kept, wanted, released) = split(&plans);
        assert_eq!(kept[0].reservation().address(), Some(ip("192.168.1.7")), "Persisted order breaks ties");
        assert_eq!(released[0].reservation().address(), Some(ip("192.168.1.5")));
        assert_eq!(wanted[0].reservation().network().name(), "other");
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let network = manual("my-network", zoned_subnets());
        let plan = instance_plan(
            Some("zone_1"),
            vec![
                desired_static(&network, "192.168.1.3"),
                desired_static(&network, "192.168.1.4"),
                desired_dynamic(&network),
            ],
        );
        let persisted = vec![
            existing(&network, "192.168.1.2", ReservationKind::Static),
            existing(&network, "192.168.1.3", ReservationKind::Static),
            existing(&network, "192.168.1.9", ReservationKind::Dynamic),
        ];

        let (first, first_diagnostics) = reconcile(&plan, persisted.clone());
        let (second, second_diagnostics) = reconcile(&plan, persisted);

        assert_eq!(first, second);
        assert_eq!(first_diagnostics.entries(), second_diagnostics.entries());
    }
}
