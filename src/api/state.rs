//! Application state for the work signup API.

use std::sync::Arc;

use crate::store::WorkStore;

/// Shared application state.
///
/// Every handler works against the same store; cloning the state only
/// clones the `Arc`.
#[derive(Clone)]
pub struct AppState {
    store: Arc<WorkStore>,
}

impl AppState {
    /// Creates a new application state over the given store.
    pub fn new(store: Arc<WorkStore>) -> Self {
        Self { store }
    }

    /// Returns the store.
    pub fn store(&self) -> &WorkStore {
        &self.store
    }

    /// Returns a new handle to the store, e.g. for the auto-open sweep.
    pub fn shared_store(&self) -> Arc<WorkStore> {
        Arc::clone(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
