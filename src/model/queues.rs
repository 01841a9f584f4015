// src/model/queues.rs

use std::collections::VecDeque;

/// An order that has been placed but not yet received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InTransitOrder {
    pub quantity: f64,
    pub arrival_period: usize,
}

/// Orders in the pipeline, kept in placement order.
///
/// With a constant lead time, placement order is also arrival order, so
/// due orders are always at the front.
#[derive(Debug, Clone, Default)]
pub struct PipelineQueue {
    orders: VecDeque<InTransitOrder>,
}

impl PipelineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items enter the pipeline.
    pub fn push_departure(&mut self, quantity: f64, arrival_period: usize) {
        self.orders.push_back(InTransitOrder {
            quantity,
            arrival_period,
        });
    }

    /// Removes every order due at or before `period` and returns the total quantity.
    pub fn pop_arrivals(&mut self, period: usize) -> f64 {
        let mut received = 0.0;
        while let Some(order) = self.orders.front() {
            if order.arrival_period > period {
                break;
            }
            received += order.quantity;
            self.orders.pop_front();
        }
        received
    }

    /// Total quantity still in transit.
    pub fn total(&self) -> f64 {
        self.orders.iter().map(|order| order.quantity).sum()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrivals_pop_only_when_due() {
        let mut queue = PipelineQueue::new();
        queue.push_departure(10.0, 2);
        queue.push_departure(5.0, 4);

        assert_eq!(queue.pop_arrivals(1), 0.0);
        assert_eq!(queue.total(), 15.0);
        assert_eq!(queue.pop_arrivals(2), 10.0);
        assert_eq!(queue.total(), 5.0);
        assert_eq!(queue.pop_arrivals(4), 5.0);
        assert_eq!(queue.orders.len(), 0);
    }

    #[test]
    fn same_period_arrivals_accumulate() {
        let mut queue = PipelineQueue::new();
        queue.push_departure(3.0, 0);
        queue.push_departure(4.0, 0);
        assert_eq!(queue.pop_arrivals(0), 7.0);
        assert_eq!(queue.total(), 0.0);
    }
}
