//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, /gateway/{*path} route)
//!     → gateway handler (candidate resolution, header filter)
//!     → forwarding engine
//!     → response to client
//! ```

pub mod server;

pub use server::{AppState, HttpServer, GATEWAY_PREFIX};
