// src/simulation/config.rs

use crate::error::{InventoryError, InventoryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of an (R,S) periodic-review policy. Immutable for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Periods between placing an order and receiving it.
    pub lead_time: usize,
    /// Interval between order opportunities (R).
    pub review_period: usize,
    /// Service-level z-score, e.g. 1.645 for 95%.
    pub safety_factor: f64,
    /// On-hand stock at period 0.
    pub initial_inventory: f64,
    #[serde(default)]
    pub use_rolling_ss: bool,
    /// Trailing number of realized errors used by the rolling estimator.
    pub rolling_window: usize,
    /// Use sqrt(L + R) instead of sqrt(L) in the safety stock formula.
    #[serde(default = "default_include_review_period")]
    pub include_review_period_in_ss: bool,
}

fn default_include_review_period() -> bool {
    true
}

impl PolicyConfig {
    /// Fixed safety stock, review period included in the time factor,
    /// rolling window of two review periods.
    pub fn new(
        lead_time: usize,
        review_period: usize,
        safety_factor: f64,
        initial_inventory: f64,
    ) -> Self {
        Self {
            lead_time,
            review_period,
            safety_factor,
            initial_inventory,
            use_rolling_ss: false,
            rolling_window: review_period.saturating_mul(2),
            include_review_period_in_ss: true,
        }
    }

    /// Switches to the rolling estimator with the given window.
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.use_rolling_ss = true;
        self.rolling_window = window;
        self
    }

    pub fn with_review_period_in_ss(mut self, include: bool) -> Self {
        self.include_review_period_in_ss = include;
        self
    }

    /// Reads a JSON policy file and validates it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameters that make the policy meaningless.
    pub fn validate(&self) -> InventoryResult<()> {
        if self.review_period == 0 {
            return Err(InventoryError::config("review_period must be at least 1"));
        }
        if self.lead_time.checked_add(self.review_period).is_none() {
            return Err(InventoryError::config(format!(
                "lead_time + review_period overflows ({} + {})",
                self.lead_time, self.review_period
            )));
        }
        if self.rolling_window == 0 {
            return Err(InventoryError::config("rolling_window must be at least 1"));
        }
        if !self.initial_inventory.is_finite() || self.initial_inventory < 0.0 {
            return Err(InventoryError::config(format!(
                "initial_inventory must be finite and >= 0, got {}",
                self.initial_inventory
            )));
        }
        if !self.safety_factor.is_finite() {
            return Err(InventoryError::config(format!(
                "safety_factor must be finite, got {}",
                self.safety_factor
            )));
        }
        Ok(())
    }

    /// Number of periods the order-up-to level must cover: L + R.
    pub fn protection_horizon(&self) -> usize {
        self.lead_time.saturating_add(self.review_period)
    }

    /// Periods entering the safety stock square root.
    pub fn time_factor(&self) -> usize {
        if self.include_review_period_in_ss {
            self.protection_horizon()
        } else {
            self.lead_time
        }
    }

    pub fn is_review_period(&self, period: usize) -> bool {
        period % self.review_period == 0
    }
}

/// What to do when a review's horizon runs past the last forecast.
///
/// This is a property of the run, not of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizonPolicy {
    /// Fail the run with `ForecastHorizon`.
    #[default]
    Strict,
    /// Sum only the forecasts that exist.
    Truncate,
}
