use cinema_core::{Catalog, Config, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn Catalog>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }
}
