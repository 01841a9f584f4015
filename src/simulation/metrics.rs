// src/simulation/metrics.rs

use serde::Serialize;

/// One output row per simulated period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub period: usize,
    /// Demand applied this period: actual, or the forecast in projection periods.
    pub demand: f64,
    pub forecast: f64,
    /// forecast - demand, empty for projection periods.
    pub forecast_error: Option<f64>,
    /// Quantity that arrived this period.
    pub received: f64,
    /// On-hand after arrivals, before this period's order and demand.
    pub on_hand_start: f64,
    /// Pipeline quantity at decision time.
    pub in_transit: f64,
    /// Inventory position at decision time (before ordering).
    pub inventory_position: f64,
    pub order_quantity: f64,
    pub position_after_order: f64,
    /// Set on review periods only.
    pub order_up_to_level: Option<f64>,
    pub horizon_periods: Option<usize>,
    pub safety_stock: f64,
    /// On-hand after demand.
    pub on_hand: f64,
    pub stockout: bool,
    pub stockout_quantity: f64,
    pub below_safety_stock: bool,
    /// Forecast used as demand; signals are projections, not observations.
    pub is_projection: bool,
}

/// Service statistics over one kind of period (observed or projected).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ServiceStats {
    pub periods: usize,
    pub stockout_periods: usize,
    pub stockout_quantity: f64,
    pub below_safety_stock_periods: usize,
    pub demand: f64,
    pub served: f64,
}

impl ServiceStats {
    fn observe(&mut self, record: &PeriodRecord) {
        self.periods += 1;
        self.demand += record.demand;
        self.served += record.demand - record.stockout_quantity;
        if record.stockout {
            self.stockout_periods += 1;
            self.stockout_quantity += record.stockout_quantity;
        }
        if record.below_safety_stock {
            self.below_safety_stock_periods += 1;
        }
    }

    /// Share of demand served from stock. 1.0 when there was no demand.
    pub fn fill_rate(&self) -> f64 {
        if self.demand > 0.0 {
            self.served / self.demand
        } else {
            1.0
        }
    }

    fn combined(&self, other: &ServiceStats) -> ServiceStats {
        ServiceStats {
            periods: self.periods + other.periods,
            stockout_periods: self.stockout_periods + other.stockout_periods,
            stockout_quantity: self.stockout_quantity + other.stockout_quantity,
            below_safety_stock_periods: self.below_safety_stock_periods
                + other.below_safety_stock_periods,
            demand: self.demand + other.demand,
            served: self.served + other.served,
        }
    }
}

/// Aggregates over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub observed: ServiceStats,
    pub projected: ServiceStats,
    pub orders_placed: usize,
    pub total_ordered: f64,
    pub average_on_hand: f64,
}

impl RunSummary {
    /// Observed and projected periods together.
    pub fn total(&self) -> ServiceStats {
        self.observed.combined(&self.projected)
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub records: Vec<PeriodRecord>,
    pub summary: RunSummary,
}

/// Append-only observer of the period loop.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    records: Vec<PeriodRecord>,
    summary: RunSummary,
    on_hand_sum: f64,
}

impl MetricsRecorder {
    pub fn with_capacity(periods: usize) -> Self {
        Self {
            records: Vec::with_capacity(periods),
            ..Self::default()
        }
    }

    pub fn observe(&mut self, record: PeriodRecord) {
        if record.is_projection {
            self.summary.projected.observe(&record);
        } else {
            self.summary.observed.observe(&record);
        }
        if record.order_quantity > 0.0 {
            self.summary.orders_placed += 1;
            self.summary.total_ordered += record.order_quantity;
        }
        self.on_hand_sum += record.on_hand;
        self.records.push(record);
    }

    pub fn finish(mut self) -> SimulationReport {
        if !self.records.is_empty() {
            self.summary.average_on_hand = self.on_hand_sum / self.records.len() as f64;
        }
        SimulationReport {
            records: self.records,
            summary: self.summary,
        }
    }
}
