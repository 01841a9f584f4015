// src/strategy/traits.rs

use std::fmt::Debug;

/// Supplies the forecast-error standard deviation that sizes the safety stock.
///
/// Implementations are fed realized errors (forecast - demand) once per
/// period with real demand, after that period's outcome is known.
///
/// `Send` + `Sync` so independent runs can be moved across threads.
pub trait SafetyStockEstimator: Debug + Send + Sync {
    /// Standard deviation to use for a review happening now.
    fn std_error(&self) -> f64;

    /// Records the error of a period that has just been realized.
    fn observe(&mut self, error: f64);

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
