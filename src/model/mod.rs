pub mod inventory;
pub mod queues;
