//! Health monitoring subsystem.

pub mod monitor;
pub mod state;

pub use monitor::{HealthHandle, HealthMonitor};
pub use state::HealthState;
