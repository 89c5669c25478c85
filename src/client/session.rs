//! Bearer credential source.
//!
//! The client layer never authenticates anything itself; it only asks an
//! external session provider for the current token. The trait exists so
//! tests (and alternative session backends) can be injected.

/// Source of the current bearer credential.
pub trait SessionProvider: Send + Sync {
    /// The current access token, or `None` when the session is gone.
    fn access_token(&self) -> Option<String>;
}

/// A fixed-token provider, for tests and CLI usage.
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider with no session at all.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl SessionProvider for StaticSession {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
