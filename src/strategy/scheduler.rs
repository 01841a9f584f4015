// src/strategy/scheduler.rs

use crate::error::{InventoryError, InventoryResult};
use crate::simulation::config::{HorizonPolicy, PolicyConfig};
use crate::strategy::optimization::safety_stock;
use tracing::warn;

/// Everything decided at one review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderDecision {
    pub safety_stock: f64,
    /// Forecast demand summed over the protection horizon.
    pub horizon_forecast: f64,
    /// Periods actually summed; below L + R only when truncated.
    pub horizon_periods: usize,
    pub order_up_to_level: f64,
    /// max(0, order-up-to level - inventory position).
    pub quantity: f64,
}

/// The (R,S) decision rule: at every R-th period, order up to
/// forecast(L + R) + safety stock.
#[derive(Debug, Clone, Copy)]
pub struct OrderScheduler<'a> {
    config: &'a PolicyConfig,
    forecast: &'a [f64],
    horizon: HorizonPolicy,
}

impl<'a> OrderScheduler<'a> {
    pub fn new(config: &'a PolicyConfig, forecast: &'a [f64], horizon: HorizonPolicy) -> Self {
        Self {
            config,
            forecast,
            horizon,
        }
    }

    pub fn is_review_period(&self, period: usize) -> bool {
        self.config.is_review_period(period)
    }

    /// Sum of `forecast[period .. period + L + R)` and the number of periods summed.
    ///
    /// The position is observed before this period's demand, so the
    /// current period is part of what it has to cover.
    pub fn horizon_forecast(&self, period: usize) -> InventoryResult<(f64, usize)> {
        let required_until = period.saturating_add(self.config.protection_horizon());
        let available = self.forecast.len();

        let end = if required_until <= available {
            required_until
        } else {
            match self.horizon {
                HorizonPolicy::Strict => {
                    return Err(InventoryError::ForecastHorizon {
                        period,
                        required_until,
                        available,
                    });
                }
                HorizonPolicy::Truncate => {
                    warn!(
                        period,
                        required_until, available, "forecast horizon truncated"
                    );
                    available
                }
            }
        };

        let start = period.min(end);
        let slice = &self.forecast[start..end];
        Ok((slice.iter().sum(), slice.len()))
    }

    /// Runs the review at `period` against the current position.
    pub fn review(
        &self,
        period: usize,
        inventory_position: f64,
        std_error: f64,
    ) -> InventoryResult<OrderDecision> {
        let safety_stock = safety_stock(
            self.config.safety_factor,
            std_error,
            self.config.time_factor(),
        );
        let (horizon_forecast, horizon_periods) = self.horizon_forecast(period)?;
        let order_up_to_level = horizon_forecast + safety_stock;
        let quantity = (order_up_to_level - inventory_position).max(0.0);

        Ok(OrderDecision {
            safety_stock,
            horizon_forecast,
            horizon_periods,
            order_up_to_level,
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orders_up_to_forecast_plus_buffer() {
        let config = PolicyConfig::new(1, 2, 2.0, 0.0);
        let forecast = [5.0, 6.0, 7.0, 8.0, 9.0];
        let scheduler = OrderScheduler::new(&config, &forecast, HorizonPolicy::Strict);

        let decision = scheduler.review(0, 4.0, 1.5).unwrap();
        assert_eq!(decision.horizon_forecast, 18.0);
        assert_eq!(decision.horizon_periods, 3);
        assert_relative_eq!(decision.safety_stock, 2.0 * 1.5 * 3f64.sqrt());
        assert_relative_eq!(decision.quantity, 18.0 + decision.safety_stock - 4.0);
    }

    #[test]
    fn never_orders_negative_quantities() {
        let config = PolicyConfig::new(0, 1, 0.0, 0.0);
        let forecast = [5.0; 3];
        let scheduler = OrderScheduler::new(&config, &forecast, HorizonPolicy::Strict);
        let decision = scheduler.review(1, 100.0, 0.0).unwrap();
        assert_eq!(decision.quantity, 0.0);
        assert_eq!(decision.order_up_to_level, 5.0);
    }

    #[test]
    fn horizon_ignores_ss_time_factor_flag() {
        let config = PolicyConfig::new(1, 2, 1.0, 0.0).with_review_period_in_ss(false);
        let forecast = [1.0; 6];
        let scheduler = OrderScheduler::new(&config, &forecast, HorizonPolicy::Strict);
        let decision = scheduler.review(0, 0.0, 4.0).unwrap();
        assert_eq!(decision.horizon_periods, 3);
        assert_relative_eq!(decision.safety_stock, 4.0);
    }

    #[test]
    fn strict_horizon_fails_past_the_forecast() {
        let config = PolicyConfig::new(2, 2, 1.0, 0.0);
        let forecast = [1.0; 5];
        let scheduler = OrderScheduler::new(&config, &forecast, HorizonPolicy::Strict);
        assert!(scheduler.review(0, 0.0, 0.0).is_ok());
        match scheduler.review(2, 0.0, 0.0) {
            Err(InventoryError::ForecastHorizon {
                period,
                required_until,
                available,
            }) => {
                assert_eq!(period, 2);
                assert_eq!(required_until, 6);
                assert_eq!(available, 5);
            }
            other => panic!("expected ForecastHorizon, got {other:?}"),
        }
    }

    #[test]
    fn truncated_horizon_sums_what_exists() {
        let config = PolicyConfig::new(2, 2, 1.0, 0.0);
        let forecast = [1.0, 2.0, 3.0, 4.0, 5.0];
        let scheduler = OrderScheduler::new(&config, &forecast, HorizonPolicy::Truncate);
        let (sum, periods) = scheduler.horizon_forecast(3).unwrap();
        assert_eq!(sum, 9.0);
        assert_eq!(periods, 2);
    }

    #[test]
    fn horizon_near_usize_max_saturates() {
        let config = PolicyConfig::new(usize::MAX - 2, 1, 1.0, 0.0);
        let forecast = [2.0; 4];

        let strict = OrderScheduler::new(&config, &forecast, HorizonPolicy::Strict);
        assert!(matches!(
            strict.horizon_forecast(3),
            Err(InventoryError::ForecastHorizon {
                required_until: usize::MAX,
                ..
            })
        ));

        let truncate = OrderScheduler::new(&config, &forecast, HorizonPolicy::Truncate);
        assert_eq!(truncate.horizon_forecast(3).unwrap(), (2.0, 1));
    }
}
