//! Request-forwarding core.
//!
//! # Data Flow
//! ```text
//! inbound request (/gateway/<path>)
//!     → candidates.rs (override + config → ordered origin list)
//!     → headers.rs (allow-listed header subset)
//!     → forward.rs (deadline-bound upstream call)
//!     → pass-through response | 503 failure envelope
//! ```

pub mod candidates;
pub mod forward;
pub mod headers;

pub use candidates::resolve_candidates;
pub use forward::{forward, ForwardRequest, UpstreamClient};
pub use headers::{OVERRIDE_HEADER, WORKSPACE_HEADER};
