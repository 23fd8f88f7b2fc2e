// Shared application state handed to every transport handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;

use super::registry::SessionRegistry;
use super::stats::StatsBook;
use super::subscriptions::Subscriptions;

/// Shared application state exposed to handlers.
///
/// Cloning is cheap; all clones point at the same registries.
#[derive(Clone)]
pub struct AppState {
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) subscriptions: Arc<Subscriptions>,
    pub(crate) stats: Arc<StatsBook>,
    /// Configuration the server was started with.
    pub config: Arc<Config>,
    /// Optional path to the TOML config file used by the running server.
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Create a new AppState with the given config and optional config path
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            subscriptions: Arc::new(Subscriptions::new()),
            stats: Arc::new(StatsBook::new()),
            config: Arc::new(config),
            config_path,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), None)
    }
}
