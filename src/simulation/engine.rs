// src/simulation/engine.rs

use crate::error::InventoryResult;
use crate::io::demand::{PeriodDemand, PeriodSeries};
use crate::model::inventory::InventoryState;
use crate::simulation::config::{HorizonPolicy, PolicyConfig};
use crate::simulation::metrics::{MetricsRecorder, PeriodRecord, SimulationReport};
use crate::strategy::safety_stock::{FixedSafetyStock, RollingSafetyStock};
use crate::strategy::scheduler::OrderScheduler;
use crate::strategy::traits::SafetyStockEstimator;
use tracing::{debug, info};

/// One (R,S) simulation run over a demand/forecast series.
///
/// `run` consumes the simulation, so state is never carried into another run.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    config: &'a PolicyConfig,
    series: &'a PeriodSeries,
    horizon: HorizonPolicy,
}

impl<'a> Simulation<'a> {
    /// Validates the configuration; nothing is simulated if it is rejected.
    pub fn new(config: &'a PolicyConfig, series: &'a PeriodSeries) -> InventoryResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            series,
            horizon: HorizonPolicy::default(),
        })
    }

    pub fn with_horizon(mut self, horizon: HorizonPolicy) -> Self {
        self.horizon = horizon;
        self
    }

    fn build_estimator(&self) -> InventoryResult<Box<dyn SafetyStockEstimator>> {
        let errors = self.series.historical_errors()?;
        let fixed = FixedSafetyStock::from_history(&errors, self.series.forecast());
        if self.config.use_rolling_ss {
            Ok(Box::new(RollingSafetyStock::new(
                self.config.rolling_window,
                fixed.std_error(),
            )))
        } else {
            Ok(Box::new(fixed))
        }
    }

    /// Steps through every period in order. Any error aborts the run.
    pub fn run(self) -> InventoryResult<SimulationReport> {
        let config = self.config;
        let series = self.series;
        let mut estimator = self.build_estimator()?;
        let scheduler = OrderScheduler::new(config, series.forecast(), self.horizon);

        info!(
            periods = series.len(),
            history = series.history_len(),
            lead_time = config.lead_time,
            review_period = config.review_period,
            safety_factor = config.safety_factor,
            estimator = estimator.name(),
            "starting simulation"
        );

        let mut state = InventoryState::new(config.initial_inventory);
        let mut recorder = MetricsRecorder::with_capacity(series.len());
        let mut safety_stock = 0.0;

        for period in 0..series.len() {
            // =============================================================
            // PHASE 1: Arrivals
            // =============================================================
            let mut received = state.receive_arrivals(period);
            let on_hand_start = state.on_hand();
            let in_transit = state.in_transit();
            let inventory_position = state.position();

            // =============================================================
            // PHASE 2: Review
            // =============================================================
            let decision = if scheduler.is_review_period(period) {
                let std_error = estimator.std_error();
                let decision = scheduler.review(period, inventory_position, std_error)?;
                safety_stock = decision.safety_stock;
                state.place_order(decision.quantity, period, config.lead_time);
                if decision.quantity > 0.0 {
                    debug!(
                        period,
                        quantity = decision.quantity,
                        order_up_to = decision.order_up_to_level,
                        std_error,
                        arrival = period.saturating_add(config.lead_time),
                        "order placed"
                    );
                }
                Some(decision)
            } else {
                None
            };
            let order_quantity = decision.map_or(0.0, |d| d.quantity);
            let position_after_order = state.position();

            // Zero lead time: the order lands before demand.
            received += state.receive_arrivals(period);

            // =============================================================
            // PHASE 3: Demand
            // =============================================================
            let demand = series.demand_at(period)?;
            let forecast = series.forecast()[period];
            let fulfillment = state.consume(demand.value());

            let forecast_error = match demand {
                PeriodDemand::Observed(actual) => {
                    let error = forecast - actual;
                    estimator.observe(error);
                    Some(error)
                }
                PeriodDemand::Projected(_) => None,
            };

            // =============================================================
            // PHASE 4: Record
            // =============================================================
            let on_hand = state.on_hand();
            recorder.observe(PeriodRecord {
                period,
                demand: demand.value(),
                forecast,
                forecast_error,
                received,
                on_hand_start,
                in_transit,
                inventory_position,
                order_quantity,
                position_after_order,
                order_up_to_level: decision.map(|d| d.order_up_to_level),
                horizon_periods: decision.map(|d| d.horizon_periods),
                safety_stock,
                on_hand,
                stockout: fulfillment.is_stockout(),
                stockout_quantity: fulfillment.shortfall,
                below_safety_stock: on_hand < safety_stock,
                is_projection: demand.is_projection(),
            });
        }

        let report = recorder.finish();
        let total = report.summary.total();
        info!(
            periods = total.periods,
            stockouts = total.stockout_periods,
            stockout_quantity = total.stockout_quantity,
            below_safety_stock = total.below_safety_stock_periods,
            orders = report.summary.orders_placed,
            "simulation finished"
        );
        Ok(report)
    }
}

/// Validates, runs, and returns the report in one call.
pub fn simulate(
    config: &PolicyConfig,
    series: &PeriodSeries,
    horizon: HorizonPolicy,
) -> InventoryResult<SimulationReport> {
    Simulation::new(config, series)?.with_horizon(horizon).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::io::demand::generate_constant_series;
    use approx::assert_relative_eq;

    #[test]
    fn invalid_config_simulates_nothing() {
        let series = generate_constant_series(5, 0, 1.0).unwrap();
        let config = PolicyConfig::new(1, 0, 1.0, 0.0);
        assert!(matches!(
            Simulation::new(&config, &series),
            Err(InventoryError::Config { .. })
        ));
    }

    #[test]
    fn zero_lead_time_order_arrives_before_demand() {
        let series = generate_constant_series(3, 0, 10.0).unwrap();
        let config = PolicyConfig::new(0, 1, 0.0, 0.0);
        let report = simulate(&config, &series, HorizonPolicy::Strict).unwrap();

        for record in &report.records {
            assert_eq!(record.order_quantity, 10.0);
            assert_eq!(record.received, 10.0);
            assert_eq!(record.on_hand, 0.0);
            assert!(!record.stockout);
        }
    }

    #[test]
    fn lead_time_delays_receipt() {
        let series = generate_constant_series(6, 2, 5.0).unwrap();
        let config = PolicyConfig::new(2, 2, 0.0, 0.0);
        let report = simulate(&config, &series, HorizonPolicy::Truncate).unwrap();

        let first = &report.records[0];
        assert_eq!(first.order_quantity, 20.0);
        assert_eq!(first.position_after_order, 20.0);
        assert!(first.stockout);
        assert!(report.records[1].stockout);
        assert_eq!(report.records[2].received, 20.0);
        assert!(!report.records[2].stockout);
    }

    #[test]
    fn missing_historical_demand_fails_the_whole_run() {
        let series = PeriodSeries::from_options(
            vec![Some(1.0), None, Some(1.0)],
            vec![1.0; 3],
        )
        .unwrap();
        let config = PolicyConfig::new(0, 1, 1.0, 5.0);
        assert!(matches!(
            simulate(&config, &series, HorizonPolicy::Truncate),
            Err(InventoryError::MissingDemand { period: 1 })
        ));
    }

    #[test]
    fn strict_horizon_fails_instead_of_truncating() {
        let series = generate_constant_series(5, 0, 1.0).unwrap();
        let config = PolicyConfig::new(1, 2, 1.0, 0.0);
        let result = simulate(&config, &series, HorizonPolicy::Strict);
        assert!(matches!(
            result,
            Err(InventoryError::ForecastHorizon { period: 4, .. })
        ));
    }

    #[test]
    fn rolling_safety_stock_tracks_recent_errors() {
        // Errors alternate +-2 for four periods, then the forecast is exact.
        let demand = vec![8.0, 12.0, 8.0, 12.0, 10.0, 10.0, 10.0, 10.0];
        let forecast = vec![10.0; 12];
        let series = PeriodSeries::new(demand, forecast).unwrap();
        let config = PolicyConfig::new(0, 2, 1.0, 50.0).with_rolling_window(2);
        let report = simulate(&config, &series, HorizonPolicy::Truncate).unwrap();
        let ss: Vec<f64> = report.records.iter().map(|r| r.safety_stock).collect();

        // Period 0 has no realized errors and uses the full-history seed:
        // std of [2,-2,2,-2,0,0,0,0] = sqrt(2), times sqrt(L + R) = sqrt(2).
        assert_relative_eq!(ss[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(ss[2], 2.0 * 2f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(ss[6], 0.0, epsilon = 1e-9);
        // Projection periods add no errors: the last window stays in effect.
        assert_relative_eq!(ss[10], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn rolling_window_far_beyond_the_series_uses_all_errors() {
        let demand = vec![8.0, 12.0, 8.0, 12.0, 10.0, 10.0, 10.0, 10.0];
        let series = PeriodSeries::new(demand, vec![10.0; 12]).unwrap();
        let run = |window: usize| {
            let config = PolicyConfig::new(0, 2, 1.0, 50.0).with_rolling_window(window);
            simulate(&config, &series, HorizonPolicy::Truncate).unwrap()
        };

        let huge = run(1 << 40);
        let full = run(series.len());
        assert_eq!(huge, full);
        // After four realized errors [2,-2,2,-2]: std 2, times sqrt(2).
        assert_relative_eq!(huge.records[4].safety_stock, 2.0 * 2f64.sqrt(), epsilon = 1e-9);
    }
}
