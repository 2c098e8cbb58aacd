use estimate_core::calculations::excavation::{self, DiggingMethod, ExcavationInput, SoilType};
use estimate_core::calculations::kerbs::{self, HunchLevel, HunchSides, KerbInput, KerbType};
use estimate_core::calculations::mortar::MortarRequirement;
use estimate_core::matching::NormalizedName;
use estimate_core::transport::TransportOptions;
use estimate_core::units::CubicMeters;
use estimate_core::{match_template, transport_time, Estimate, EstimationConfig, MatchStrategy, RateTemplate};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn soil() -> impl Strategy<Value = SoilType> {
    prop::sample::select(SoilType::ALL.to_vec())
}

fn method() -> impl Strategy<Value = DiggingMethod> {
    prop::sample::select(DiggingMethod::ALL.to_vec())
}

fn template_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn excavation_volume_is_exact(l in 0.1f64..100.0, w in 5.0f64..300.0, d in 5.0f64..300.0, soil in soil()) {
        let input = ExcavationInput::new("p", l, w, d, DiggingMethod::Shovel, soil);
        let result = excavation::calculate(&input, &EstimationConfig::default()).unwrap();
        prop_assert!(close(result.volume_m3, l * (w / 100.0) * (d / 100.0)));
    }

    #[test]
    fn excavation_volume_is_linear_in_length(
        l in 0.1f64..100.0,
        w in 5.0f64..300.0,
        d in 5.0f64..300.0,
        k in 1.0f64..10.0,
    ) {
        let config = EstimationConfig::default();
        let base = excavation::calculate(
            &ExcavationInput::new("p", l, w, d, DiggingMethod::Shovel, SoilType::Clay),
            &config,
        ).unwrap();
        let scaled = excavation::calculate(
            &ExcavationInput::new("p", l * k, w, d, DiggingMethod::Shovel, SoilType::Clay),
            &config,
        ).unwrap();
        prop_assert!(close(scaled.volume_m3, base.volume_m3 * k));
    }

    #[test]
    fn loose_volume_never_below_volume(
        l in 0.1f64..100.0,
        w in 5.0f64..300.0,
        d in 5.0f64..300.0,
        soil in soil(),
        method in method(),
    ) {
        let input = ExcavationInput::new("p", l, w, d, method, soil);
        let result = excavation::calculate(&input, &EstimationConfig::default()).unwrap();
        prop_assert!(result.loose_volume_m3 >= result.volume_m3);
        prop_assert!(result.labor_hours >= 0.0);
    }

    #[test]
    fn trips_are_the_ceiling_and_at_least_one(
        quantity in 0.001f64..1000.0,
        capacity in 0.1f64..100.0,
        speed in 1000.0f64..10000.0,
        distance in 1.0f64..500.0,
    ) {
        let estimate = transport_time(quantity, capacity, speed, distance);
        prop_assert!(estimate.trips >= 1);
        prop_assert_eq!(estimate.trips as f64, (quantity / capacity).ceil().max(1.0));
        prop_assert!(close(estimate.total_time_h, estimate.trips as f64 * estimate.time_per_trip_h));
        prop_assert!(close(estimate.normalized_time_h, estimate.total_time_h * 30.0 / distance));
    }

    #[test]
    fn total_time_is_linear_in_distance(
        quantity in 0.001f64..1000.0,
        capacity in 0.1f64..100.0,
        distance in 1.0f64..500.0,
        k in 1.0f64..10.0,
    ) {
        let near = transport_time(quantity, capacity, 4000.0, distance);
        let far = transport_time(quantity, capacity, 4000.0, distance * k);
        prop_assert_eq!(near.trips, far.trips);
        prop_assert!(close(far.total_time_h, near.total_time_h * k));
    }

    #[test]
    fn cement_bags_cover_the_cement(volume in 0.001f64..50.0) {
        let mix = MortarRequirement::for_volume(CubicMeters(volume));
        let bags = mix.cement_bags as f64;
        prop_assert!(bags * 25.0 + 1e-6 >= mix.cement_kg);
        prop_assert!((bags - 1.0) * 25.0 < mix.cement_kg);
    }

    #[test]
    fn whole_bag_volumes_need_exactly_that_many_bags(bags in 1u32..400) {
        let volume = bags as f64 * 25.0 / 350.0;
        prop_assert_eq!(MortarRequirement::for_volume(CubicMeters(volume)).cement_bags, bags);
    }

    #[test]
    fn kerb_breakdowns_have_no_empty_transport_legs(
        length in 0.5f64..200.0,
        bed_cm in 1.0f64..20.0,
        distance in 0.0f64..200.0,
        kerb in prop::sample::select(KerbType::ALL.to_vec()),
    ) {
        let input = KerbInput::new("p", length, kerb, bed_cm)
            .with_hunch(HunchLevel::Pct20, HunchSides::One)
            .with_transport(TransportOptions::new(1.0, distance));
        let estimate = Estimate::from(kerbs::calculate(&input, &EstimationConfig::default()).unwrap());
        for task in &estimate.task_breakdown {
            prop_assert!(task.hours >= 0.0);
            if task.name.starts_with("Transport ") {
                prop_assert!(task.hours > 0.0);
            }
        }
        prop_assert!(estimate.quantity.quantity >= 0.0);
    }

    #[test]
    fn matching_is_deterministic(task in template_name(), names in prop::collection::vec(template_name(), 0..8)) {
        let catalog: Vec<RateTemplate> = names
            .iter()
            .enumerate()
            .map(|(i, n)| RateTemplate::new(format!("t{}", i), n.clone(), "m", Some(1.0)))
            .collect();
        prop_assert_eq!(match_template(&task, &catalog), match_template(&task, &catalog));
    }

    #[test]
    fn exact_match_always_wins(
        task in template_name(),
        names in prop::collection::vec(template_name(), 0..8),
        position in 0usize..8,
    ) {
        let mut catalog: Vec<RateTemplate> = names
            .iter()
            .enumerate()
            .map(|(i, n)| RateTemplate::new(format!("t{}", i), n.clone(), "m", Some(1.0)))
            .collect();
        let position = position.min(catalog.len());
        catalog.insert(position, RateTemplate::new("exact", task.to_uppercase(), "m", Some(1.0)));

        let wanted = NormalizedName::new(&task).text;
        let first_exact = catalog
            .iter()
            .find(|t| NormalizedName::new(&t.name).text == wanted)
            .map(|t| t.id.clone());

        let result = match_template(&task, &catalog);
        prop_assert_eq!(result.strategy, MatchStrategy::Exact);
        prop_assert_eq!(result.template.map(|t| t.id), first_exact);
    }

    #[test]
    fn word_order_beats_partial_regardless_of_position(swap in any::<bool>()) {
        let mut catalog = vec![
            RateTemplate::new("partial", "Sand transport", "t", Some(0.3)),
            RateTemplate::new("ordered", "Transport of sand by dumper", "t", Some(0.1)),
        ];
        if swap {
            catalog.reverse();
        }
        let result = match_template("transport sand", &catalog);
        prop_assert_eq!(result.strategy, MatchStrategy::WordOrder);
        prop_assert_eq!(result.template.map(|t| t.id), Some("ordered".to_string()));
    }
}
