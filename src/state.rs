//! Shared application state for all routes.

use crate::store::PersonStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersonStore>,
}

impl AppState {
    pub fn new(store: impl PersonStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
