pub mod optimization;
pub mod safety_stock;
pub mod scheduler;
pub mod traits;
