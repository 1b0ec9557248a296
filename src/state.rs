//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the resolved configuration and the account index. Both are
//! behind `Arc` so cloning the state per request is cheap.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::accounts::AccountIndex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub accounts: Arc<AccountIndex>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let accounts = Arc::new(AccountIndex::new(&config.public_dir));
        Self { config: Arc::new(config), accounts }
    }
}
