//! Application state shared by every handler.
//!
//! `AppState` holds the session registry (which owns the re-render update
//! bus) and the loaded config. Handlers receive it via axum's `State`
//! extractor; nothing here is ambient or global, each session's state is
//! reached only through the registry handle.

use std::sync::Arc;

use vitrine_core::session::SessionRegistry;
use vitrine_core::update::UpdateBus;
use vitrine_types::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub config: ServerConfig,
}

impl AppState {
    /// Wire up a fresh registry and update bus from the given config.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new(UpdateBus::new(config.update_capacity))),
            config,
        }
    }
}
