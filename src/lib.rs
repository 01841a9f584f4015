//! Periodic-review (R,S) inventory simulation driven by demand forecasts.
//!
//! Every `review_period` periods an order is placed to bring the inventory
//! position up to the forecast demand over lead time plus review period,
//! plus a safety stock sized from forecast error. Unmet demand is lost.
//! Forecasts that run past the last observed demand are simulated as
//! projections, with the forecast standing in for demand.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{InventoryError, InventoryResult};
pub use io::demand::{PeriodDemand, PeriodSeries};
pub use simulation::config::{HorizonPolicy, PolicyConfig};
pub use simulation::engine::{simulate, Simulation};
pub use simulation::metrics::{PeriodRecord, RunSummary, SimulationReport};
