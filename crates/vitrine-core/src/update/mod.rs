//! Re-render update distribution.

pub mod bus;

pub use bus::{SessionSubscription, UpdateBus};
