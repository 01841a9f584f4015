use periodic_review::{simulate, HorizonPolicy, PeriodSeries, PolicyConfig, SimulationReport};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Case {
    config: PolicyConfig,
    series: PeriodSeries,
}

fn case_strategy() -> impl Strategy<Value = Case> {
    (
        prop::collection::vec((0u32..40, 0u32..40), 1..40),
        prop::collection::vec(0u32..40, 0..6),
        0usize..4,
        1usize..6,
        0.0f64..3.0,
        0u32..120,
        prop::option::of(1usize..8),
    )
        .prop_map(
            |(history, future, lead_time, review_period, z, initial, window)| {
                let demand: Vec<f64> = history.iter().map(|(d, _)| *d as f64).collect();
                let mut forecast: Vec<f64> = history.iter().map(|(_, f)| *f as f64).collect();
                forecast.extend(future.iter().map(|f| *f as f64));

                let mut config = PolicyConfig::new(lead_time, review_period, z, initial as f64);
                if let Some(window) = window {
                    config = config.with_rolling_window(window);
                }
                let series = PeriodSeries::new(demand, forecast).unwrap();
                Case { config, series }
            },
        )
}

fn run(case: &Case) -> SimulationReport {
    simulate(&case.config, &case.series, HorizonPolicy::Truncate).unwrap()
}

proptest! {
    #[test]
    fn position_is_on_hand_plus_pipeline(case in case_strategy()) {
        for r in &run(&case).records {
            prop_assert_eq!(r.inventory_position, r.on_hand_start + r.in_transit);
        }
    }

    #[test]
    fn on_hand_never_negative(case in case_strategy()) {
        for r in &run(&case).records {
            prop_assert!(r.on_hand >= 0.0);
            prop_assert!(r.on_hand_start >= 0.0);
            prop_assert!(r.stockout_quantity >= 0.0);
        }
    }

    #[test]
    fn orders_only_at_review_periods(case in case_strategy()) {
        let review_period = case.config.review_period;
        for r in &run(&case).records {
            if r.order_quantity > 0.0 {
                prop_assert_eq!(r.period % review_period, 0);
            }
            prop_assert_eq!(r.order_up_to_level.is_some(), r.period % review_period == 0);
        }
    }

    #[test]
    fn orders_arrive_exactly_one_lead_time_later(case in case_strategy()) {
        let lead_time = case.config.lead_time;
        let records = run(&case).records;
        for r in &records {
            let expected = if r.period >= lead_time {
                records[r.period - lead_time].order_quantity
            } else {
                0.0
            };
            prop_assert_eq!(r.received, expected);
        }
    }

    #[test]
    fn fixed_safety_stock_is_constant(case in case_strategy()) {
        let mut case = case;
        case.config.use_rolling_ss = false;
        let records = run(&case).records;
        let first = records[0].safety_stock;
        prop_assert!(records.iter().all(|r| r.safety_stock == first));
    }

    #[test]
    fn below_safety_stock_flag_matches_levels(case in case_strategy()) {
        for r in &run(&case).records {
            prop_assert_eq!(r.below_safety_stock, r.on_hand < r.safety_stock);
            prop_assert_eq!(r.stockout, r.stockout_quantity > 0.0);
        }
    }

    #[test]
    fn reruns_are_identical(case in case_strategy()) {
        prop_assert_eq!(run(&case), run(&case));
    }
}
