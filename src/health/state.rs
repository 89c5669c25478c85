//! Gateway reachability state.
//!
//! # States
//! - Checking: before the first probe settles
//! - Online: last probe succeeded
//! - Offline: last probe failed
//!
//! Owned by the monitor; mutated only by its poll cycle or a manual recheck.

/// Reachability of the gateway/backend chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Checking,
    Online,
    Offline,
}

impl HealthState {
    pub fn is_online(self) -> bool {
        matches!(self, HealthState::Online)
    }
}
