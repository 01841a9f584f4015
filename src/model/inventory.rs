// src/model/inventory.rs

use crate::model::queues::PipelineQueue;

/// Outcome of applying one period's demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fulfillment {
    pub served: f64,
    /// Unmet demand, lost (not backordered).
    pub shortfall: f64,
}

impl Fulfillment {
    pub fn is_stockout(&self) -> bool {
        self.shortfall > 0.0
    }
}

/// On-hand stock plus the pipeline of outstanding orders.
#[derive(Debug, Clone)]
pub struct InventoryState {
    on_hand: f64,
    pipeline: PipelineQueue,
}

impl InventoryState {
    pub fn new(initial_inventory: f64) -> Self {
        Self {
            on_hand: initial_inventory,
            pipeline: PipelineQueue::new(),
        }
    }

    pub fn on_hand(&self) -> f64 {
        self.on_hand
    }

    pub fn in_transit(&self) -> f64 {
        self.pipeline.total()
    }

    /// On-hand plus everything still in the pipeline. Always derived, never stored.
    pub fn position(&self) -> f64 {
        self.on_hand + self.pipeline.total()
    }

    /// Step 1: move orders due this period into on-hand stock.
    ///
    /// Returns the quantity received.
    pub fn receive_arrivals(&mut self, period: usize) -> f64 {
        let received = self.pipeline.pop_arrivals(period);
        self.on_hand += received;
        received
    }

    /// Step 2: record an order placed at `period`.
    pub fn place_order(&mut self, quantity: f64, period: usize, lead_time: usize) {
        if quantity > 0.0 {
            self.pipeline
                .push_departure(quantity, period.saturating_add(lead_time));
        }
    }

    /// Step 3: consume demand. On-hand is clipped at zero and the excess is lost.
    pub fn consume(&mut self, demand: f64) -> Fulfillment {
        let shortfall = (demand - self.on_hand).max(0.0);
        let served = demand - shortfall;
        self.on_hand = (self.on_hand - demand).max(0.0);
        Fulfillment { served, shortfall }
    }
}
