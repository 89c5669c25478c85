//! User-chosen backend override.
//!
//! The one piece of mutable shared state in the system: a single origin
//! string the settings surface can write and every call reads. Kept behind
//! an explicit handle (not ambient global state) so tests can inject their
//! own. Reads are lock-free; a write takes effect for calls issued after it.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Shared handle to the persisted backend override.
#[derive(Clone, Default)]
pub struct OverrideStore {
    inner: Arc<ArcSwapOption<String>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current override, if any.
    pub fn get(&self) -> Option<String> {
        self.inner.load_full().map(|origin| (*origin).clone())
    }

    /// Set the override for all subsequent calls.
    pub fn set(&self, origin: impl Into<String>) {
        self.inner.store(Some(Arc::new(origin.into())));
    }

    /// Remove the override.
    pub fn clear(&self) {
        self.inner.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let store = OverrideStore::new();
        assert_eq!(store.get(), None);

        store.set("http://alt:9000");
        assert_eq!(store.get().as_deref(), Some("http://alt:9000"));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn clones_share_state() {
        let store = OverrideStore::new();
        let other = store.clone();
        store.set("http://alt:9000");
        assert_eq!(other.get().as_deref(), Some("http://alt:9000"));
    }
}
