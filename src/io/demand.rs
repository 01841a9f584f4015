// src/io/demand.rs

use crate::error::{InventoryError, InventoryResult};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One input row: `period,demand,forecast`. Demand is empty for future periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub period: i64,
    pub demand: Option<f64>,
    pub forecast: Option<f64>,
}

/// Demand to apply in a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeriodDemand {
    /// Actual demand was recorded.
    Observed(f64),
    /// Future period, the forecast stands in for demand.
    Projected(f64),
}

impl PeriodDemand {
    pub fn value(&self) -> f64 {
        match self {
            PeriodDemand::Observed(v) | PeriodDemand::Projected(v) => *v,
        }
    }

    pub fn is_projection(&self) -> bool {
        matches!(self, PeriodDemand::Projected(_))
    }
}

/// Demand and forecast aligned by period index, starting at period 0.
///
/// The forecast covers every simulated period; demand covers a prefix of
/// them (the historical range) and may have gaps, which are reported
/// when the gap is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSeries {
    demand: Vec<Option<f64>>,
    forecast: Vec<f64>,
    history_len: usize,
}

impl PeriodSeries {
    /// Historical demand followed by projection-only periods.
    ///
    /// `demand` may be shorter than `forecast`; the remaining periods are projections.
    pub fn new(demand: Vec<f64>, forecast: Vec<f64>) -> InventoryResult<Self> {
        Self::from_options(demand.into_iter().map(Some).collect(), forecast)
    }

    /// Same as `new`, with possibly missing demand values.
    pub fn from_options(
        mut demand: Vec<Option<f64>>,
        forecast: Vec<f64>,
    ) -> InventoryResult<Self> {
        if forecast.is_empty() {
            return Err(InventoryError::EmptySeries);
        }
        if demand.len() > forecast.len() {
            return Err(InventoryError::MissingForecast {
                period: forecast.len(),
            });
        }
        for (period, value) in forecast.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(InventoryError::InvalidForecast {
                    period,
                    value: *value,
                });
            }
        }
        for (period, value) in demand.iter().enumerate() {
            if let Some(value) = value {
                if !value.is_finite() || *value < 0.0 {
                    return Err(InventoryError::InvalidDemand {
                        period,
                        value: *value,
                    });
                }
            }
        }

        demand.resize(forecast.len(), None);
        let history_len = demand
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);

        Ok(Self {
            demand,
            forecast,
            history_len,
        })
    }

    /// Builds a series from rows sorted by period, starting at 0 with no gaps.
    pub fn from_records(records: Vec<InputRecord>) -> InventoryResult<Self> {
        let mut demand = Vec::with_capacity(records.len());
        let mut forecast = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.period != index as i64 {
                return Err(InventoryError::NonContiguousPeriods {
                    index,
                    expected: index as i64,
                    found: record.period,
                });
            }
            let value = record
                .forecast
                .ok_or(InventoryError::MissingForecast { period: index })?;
            forecast.push(value);
            demand.push(record.demand);
        }

        Self::from_options(demand, forecast)
    }

    pub fn from_reader<R: Read>(reader: R) -> InventoryResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = rdr
            .deserialize()
            .collect::<Result<Vec<InputRecord>, csv::Error>>()?;
        Self::from_records(records)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> InventoryResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Total periods to simulate: historical plus projection.
    pub fn len(&self) -> usize {
        self.forecast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast.is_empty()
    }

    /// Periods up to and including the last one with recorded demand.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn projection_len(&self) -> usize {
        self.forecast.len() - self.history_len
    }

    pub fn forecast(&self) -> &[f64] {
        &self.forecast
    }

    /// Demand for `period`, or its forecast once past the historical range.
    pub fn demand_at(&self, period: usize) -> InventoryResult<PeriodDemand> {
        if period >= self.history_len {
            return self
                .forecast
                .get(period)
                .map(|f| PeriodDemand::Projected(*f))
                .ok_or(InventoryError::MissingForecast { period });
        }
        match self.demand.get(period).copied().flatten() {
            Some(value) => Ok(PeriodDemand::Observed(value)),
            None => Err(InventoryError::MissingDemand { period }),
        }
    }

    /// `forecast - demand` for every historical period.
    pub fn historical_errors(&self) -> InventoryResult<Vec<f64>> {
        (0..self.history_len)
            .map(|period| match self.demand_at(period)? {
                PeriodDemand::Observed(actual) => Ok(self.forecast[period] - actual),
                PeriodDemand::Projected(_) => Err(InventoryError::MissingDemand { period }),
            })
            .collect()
    }

    /// Back to input rows, demand left empty for projection periods.
    pub fn to_records(&self) -> Vec<InputRecord> {
        self.forecast
            .iter()
            .enumerate()
            .map(|(period, forecast)| InputRecord {
                period: period as i64,
                demand: self.demand.get(period).copied().flatten(),
                forecast: Some(*forecast),
            })
            .collect()
    }
}

// =========================================================================
// Synthetic series
// =========================================================================

/// Demand and forecast are the same constant, every period.
pub fn generate_constant_series(
    periods: usize,
    future_periods: usize,
    value: f64,
) -> InventoryResult<PeriodSeries> {
    PeriodSeries::new(
        vec![value; periods],
        vec![value; periods + future_periods],
    )
}

/// Demand and forecast drawn independently around the same mean.
///
/// Negative draws are clamped to 0 and values rounded to whole units.
pub fn generate_normal_series<R: Rng + ?Sized>(
    rng: &mut R,
    periods: usize,
    future_periods: usize,
    mean: f64,
    demand_std_dev: f64,
    forecast_std_dev: f64,
) -> InventoryResult<PeriodSeries> {
    let demand_dist = Normal::new(mean, demand_std_dev)
        .map_err(|e| InventoryError::config(format!("demand distribution: {e}")))?;
    let forecast_dist = Normal::new(mean, forecast_std_dev)
        .map_err(|e| InventoryError::config(format!("forecast distribution: {e}")))?;

    let demand: Vec<f64> = (0..periods)
        .map(|_| demand_dist.sample(rng).round().max(0.0))
        .collect();
    let forecast: Vec<f64> = (0..periods + future_periods)
        .map(|_| forecast_dist.sample(rng).round().max(0.0))
        .collect();

    PeriodSeries::new(demand, forecast)
}

/// Demand steps from `low` to `high` at `step_at`; the forecast is naive
/// (last period's demand), so forecast accuracy degrades right after the step.
pub fn generate_step_series(
    periods: usize,
    future_periods: usize,
    low: f64,
    high: f64,
    step_at: usize,
) -> InventoryResult<PeriodSeries> {
    let demand: Vec<f64> = (0..periods)
        .map(|t| if t < step_at { low } else { high })
        .collect();

    let mut forecast = Vec::with_capacity(periods + future_periods);
    for t in 0..periods + future_periods {
        let value = match t {
            0 => low,
            t if t <= periods => demand[t - 1],
            _ => demand.last().copied().unwrap_or(low),
        };
        forecast.push(value);
    }

    PeriodSeries::new(demand, forecast)
}
