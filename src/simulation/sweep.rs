// src/simulation/sweep.rs

use crate::error::InventoryResult;
use crate::io::demand::PeriodSeries;
use crate::simulation::config::{HorizonPolicy, PolicyConfig};
use crate::simulation::engine::simulate;
use serde::Serialize;
use tracing::info;

/// Cartesian grid of policy parameters. Empty axes keep the base value.
#[derive(Debug, Clone, Default)]
pub struct SweepGrid {
    pub lead_times: Vec<usize>,
    pub review_periods: Vec<usize>,
    pub safety_factors: Vec<f64>,
    /// Each window switches the rolling estimator on.
    pub rolling_windows: Vec<usize>,
}

impl SweepGrid {
    /// Expands the grid around `base`.
    pub fn configurations(&self, base: &PolicyConfig) -> Vec<PolicyConfig> {
        let lead_times = axis(&self.lead_times, base.lead_time);
        let review_periods = axis(&self.review_periods, base.review_period);
        let safety_factors = axis(&self.safety_factors, base.safety_factor);
        let windows: Vec<Option<usize>> = if self.rolling_windows.is_empty() {
            vec![None]
        } else {
            self.rolling_windows.iter().copied().map(Some).collect()
        };

        let mut configs = Vec::new();
        for &lead_time in &lead_times {
            for &review_period in &review_periods {
                for &safety_factor in &safety_factors {
                    for window in &windows {
                        let mut config = PolicyConfig {
                            lead_time,
                            review_period,
                            safety_factor,
                            ..base.clone()
                        };
                        if let Some(window) = window {
                            config = config.with_rolling_window(*window);
                        }
                        configs.push(config);
                    }
                }
            }
        }
        configs
    }
}

fn axis<T: Copy>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

/// One sweep result row, flat so it can go straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub lead_time: usize,
    pub review_period: usize,
    pub safety_factor: f64,
    pub use_rolling_ss: bool,
    pub rolling_window: usize,
    pub include_review_period_in_ss: bool,
    pub periods: usize,
    pub stockout_periods: usize,
    pub stockout_quantity: f64,
    pub below_safety_stock_periods: usize,
    pub fill_rate: f64,
    pub projected_stockout_periods: usize,
    pub orders_placed: usize,
    pub total_ordered: f64,
    pub average_on_hand: f64,
    pub average_safety_stock: f64,
}

/// Runs every configuration on a fresh simulation. Stops at the first failure.
pub fn run_sweep(
    configs: &[PolicyConfig],
    series: &PeriodSeries,
    horizon: HorizonPolicy,
) -> InventoryResult<Vec<SweepRow>> {
    info!(runs = configs.len(), "starting parameter sweep");
    configs
        .iter()
        .map(|config| {
            let report = simulate(config, series, horizon)?;
            let summary = &report.summary;
            let average_safety_stock = if report.records.is_empty() {
                0.0
            } else {
                report.records.iter().map(|r| r.safety_stock).sum::<f64>()
                    / report.records.len() as f64
            };
            Ok(SweepRow {
                lead_time: config.lead_time,
                review_period: config.review_period,
                safety_factor: config.safety_factor,
                use_rolling_ss: config.use_rolling_ss,
                rolling_window: config.rolling_window,
                include_review_period_in_ss: config.include_review_period_in_ss,
                periods: summary.total().periods,
                stockout_periods: summary.observed.stockout_periods,
                stockout_quantity: summary.observed.stockout_quantity,
                below_safety_stock_periods: summary.observed.below_safety_stock_periods,
                fill_rate: summary.observed.fill_rate(),
                projected_stockout_periods: summary.projected.stockout_periods,
                orders_placed: summary.orders_placed,
                total_ordered: summary.total_ordered,
                average_on_hand: summary.average_on_hand,
                average_safety_stock,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::generate_step_series;

    #[test]
    fn empty_grid_is_the_base_config() {
        let base = PolicyConfig::new(1, 2, 1.0, 0.0);
        let configs = SweepGrid::default().configurations(&base);
        assert_eq!(configs, vec![base]);
    }

    #[test]
    fn grid_expands_every_axis() {
        let base = PolicyConfig::new(1, 2, 1.0, 0.0);
        let grid = SweepGrid {
            lead_times: vec![0, 1],
            review_periods: vec![1, 2, 4],
            safety_factors: vec![],
            rolling_windows: vec![3, 6],
        };
        let configs = grid.configurations(&base);
        assert_eq!(configs.len(), 12);
        assert!(configs.iter().all(|c| c.use_rolling_ss));
        assert!(configs.iter().all(|c| c.safety_factor == 1.0));
    }

    #[test]
    fn higher_safety_factor_never_serves_less() {
        let series = generate_step_series(40, 0, 10.0, 20.0, 15).unwrap();
        let base = PolicyConfig::new(1, 2, 0.0, 20.0);
        let grid = SweepGrid {
            safety_factors: vec![0.0, 3.0],
            ..SweepGrid::default()
        };
        let rows = run_sweep(
            &grid.configurations(&base),
            &series,
            HorizonPolicy::Truncate,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].average_safety_stock > rows[0].average_safety_stock);
        assert!(rows[1].stockout_quantity <= rows[0].stockout_quantity);
    }
}
