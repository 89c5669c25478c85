//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway handler
//! - Wire up middleware (tracing)
//! - Dispatch inbound requests to the forwarding engine
//! - Serve with graceful shutdown

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{GatewayConfig, TimeoutConfig, UpstreamConfig};
use crate::gateway::{
    forward, headers, resolve_candidates, ForwardRequest, UpstreamClient, OVERRIDE_HEADER,
};

/// Path prefix all forwarded requests arrive under.
pub const GATEWAY_PREFIX: &str = "/gateway";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamConfig,
    pub timeouts: TimeoutConfig,
    pub max_body_bytes: usize,
    pub client: UpstreamClient,
}

/// HTTP server hosting the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let client: UpstreamClient = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            upstream: config.upstream.clone(),
            timeouts: config.timeouts.clone(),
            max_body_bytes: config.listener.max_body_bytes,
            client,
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(&format!("{GATEWAY_PREFIX}/{{*path}}"), any(gateway_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Resolves candidates, filters headers, and hands off to the forwarding engine.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();

    let path = parts
        .uri
        .path()
        .strip_prefix(GATEWAY_PREFIX)
        .unwrap_or(parts.uri.path())
        .trim_start_matches('/')
        .to_string();
    let query = parts
        .uri
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();

    let override_origin = parts
        .headers
        .get(OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok());
    let candidates = resolve_candidates(override_origin, &state.upstream);

    let deadline = if headers::is_multipart(&parts.headers) {
        Duration::from_secs(state.timeouts.upload_secs)
    } else {
        Duration::from_secs(state.timeouts.forward_secs)
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path,
        backend = candidates.first().map(String::as_str).unwrap_or("none"),
        "Forwarding request"
    );

    let body = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejecting oversized or unreadable body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let forward_request = ForwardRequest {
        method: parts.method,
        path,
        query,
        headers: headers::filter_request_headers(&parts.headers),
        body,
    };

    forward(forward_request, &candidates, &state.client, deadline)
        .await
        .into_response()
}
