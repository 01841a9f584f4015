// src/strategy/safety_stock.rs

use crate::strategy::traits::SafetyStockEstimator;
use std::collections::VecDeque;
use tracing::warn;

/// Share of the mean forecast used as std error when no demand has been observed.
pub const NO_HISTORY_ERROR_RATIO: f64 = 0.2;

/// Population standard deviation (ddof = 0). `None` for an empty sample.
///
/// A single value yields `Some(0.0)`: one error carries no spread, so it
/// contributes no buffer.
pub fn population_std_dev<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let n = iter.clone().count();
    if n == 0 {
        return None;
    }
    let mean = iter.clone().sum::<f64>() / n as f64;
    let variance = iter.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    Some(variance.sqrt())
}

// =========================================================================
// 1. Fixed (full history)
// =========================================================================

/// Std error computed once from every historical forecast error.
#[derive(Debug, Clone)]
pub struct FixedSafetyStock {
    std_error: f64,
}

impl FixedSafetyStock {
    pub fn new(std_error: f64) -> Self {
        Self { std_error }
    }

    /// Builds the estimate from the historical errors.
    ///
    /// With no history at all (every period is a projection), the std error
    /// falls back to `NO_HISTORY_ERROR_RATIO` times the mean forecast, or 0
    /// if that mean is not positive.
    pub fn from_history(errors: &[f64], forecast: &[f64]) -> Self {
        if let Some(std_error) = population_std_dev(errors) {
            return Self::new(std_error);
        }

        let mean_forecast = if forecast.is_empty() {
            0.0
        } else {
            forecast.iter().sum::<f64>() / forecast.len() as f64
        };
        let proxy = if mean_forecast > 0.0 {
            NO_HISTORY_ERROR_RATIO * mean_forecast
        } else {
            0.0
        };
        warn!(
            mean_forecast,
            proxy, "no observed demand, using forecast-based std error proxy"
        );
        Self::new(proxy)
    }
}

impl SafetyStockEstimator for FixedSafetyStock {
    fn std_error(&self) -> f64 {
        self.std_error
    }

    fn observe(&mut self, _error: f64) {}

    fn name(&self) -> &'static str {
        "fixed"
    }
}

// =========================================================================
// 2. Rolling (trailing window)
// =========================================================================

/// Std error over the last `window` realized errors.
///
/// Holds at most `window` errors. Until the first error is realized the
/// estimate is `seed` (the full-history value); with fewer than `window`
/// errors, all of them are used.
#[derive(Debug, Clone)]
pub struct RollingSafetyStock {
    window: usize,
    errors: VecDeque<f64>,
    seed: f64,
}

impl RollingSafetyStock {
    pub fn new(window: usize, seed: f64) -> Self {
        Self {
            window,
            errors: VecDeque::new(),
            seed,
        }
    }
}

impl SafetyStockEstimator for RollingSafetyStock {
    fn std_error(&self) -> f64 {
        population_std_dev(&self.errors).unwrap_or(self.seed)
    }

    fn observe(&mut self, error: f64) {
        if self.errors.len() == self.window {
            self.errors.pop_front();
        }
        self.errors.push_back(error);
    }

    fn name(&self) -> &'static str {
        "rolling"
    }
}
