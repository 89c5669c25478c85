//! Client request layer.
//!
//! # Data Flow
//! ```text
//! caller (action wrapper, health monitor, services)
//!     → api.rs (credential, override, workspace headers; deadline)
//!     → same-origin gateway (/gateway/<path>)
//!     → error.rs (every failure normalized into ApiError)
//! ```
//!
//! # Design Decisions
//! - Session token and backend override are injected seams, never ambient
//!   globals, so both are swappable in tests
//! - Errors are a single tagged type; no raw transport error escapes

pub mod api;
pub mod error;
pub mod overrides;
pub mod session;

pub use api::{ApiCall, ApiClient, DEFAULT_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT};
pub use error::ApiError;
pub use overrides::OverrideStore;
pub use session::{SessionProvider, StaticSession};
