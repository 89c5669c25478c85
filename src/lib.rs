//! Same-origin request-forwarding gateway for the seller dashboard,
//! plus the client-side request layer that consumes it.
//!
//! # Architecture Overview
//!
//! ```text
//! UI action
//!     → action (loading/error/data state machine)
//!     → client (bearer credential, override header, deadline)
//!     → http + gateway (candidate resolution, header filter, forward)
//!     → backend origin
//! ```
//!
//! Every layer normalizes failures before handing them up: the gateway
//! answers a structured 503 envelope, the client raises `ApiError`, the
//! action wrapper turns that into UI-visible state.

// Core subsystems
pub mod config;
pub mod gateway;
pub mod http;

// Client side
pub mod action;
pub mod client;
pub mod health;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
