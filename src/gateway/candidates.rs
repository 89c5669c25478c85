//! Candidate origin resolution.
//!
//! # Responsibilities
//! - Build the ordered list of possible backend origins for one request
//! - Validate the caller-supplied override (scheme allow-list)
//! - Strip trailing slashes, drop empties, dedup while preserving order
//!
//! The list is recomputed per request. The override can change at runtime,
//! so caching it across calls would serve a stale target.

use std::collections::HashSet;

use crate::config::UpstreamConfig;

/// Fixed last-resort origins for local deployments.
pub const LOOPBACK_FALLBACKS: [&str; 2] = ["http://127.0.0.1:8000", "http://localhost:8000"];

/// Resolve the candidate origin list for one request.
///
/// Priority order: validated override, configured primary, configured
/// secondary, loopback fallbacks. An override with a scheme other than
/// `http`/`https` is discarded entirely, not deprioritized.
pub fn resolve_candidates(override_origin: Option<&str>, upstream: &UpstreamConfig) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(4);

    if let Some(raw) = override_origin {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            candidates.push(raw.trim_end_matches('/').to_string());
        } else if !raw.is_empty() {
            tracing::warn!(
                override_origin = %raw,
                "Ignoring backend override with unsupported scheme"
            );
        }
    }

    for origin in [upstream.primary.as_deref(), upstream.secondary.as_deref()]
        .into_iter()
        .flatten()
    {
        let trimmed = origin.trim_end_matches('/');
        if !trimmed.is_empty() {
            candidates.push(trimmed.to_string());
        }
    }

    if upstream.loopback_fallback {
        for fallback in LOOPBACK_FALLBACKS {
            candidates.push(fallback.to_string());
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|origin| seen.insert(origin.clone()));
    candidates
}
