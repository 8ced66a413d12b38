use std::sync::Arc;

use salvo::async_trait;
pub use clientbook_core::config::*;

use crate::error::{AppError, AppResult};

/// Shares one loaded `Settings` with every request.
pub struct ConfigHandler {
    settings: Arc<Settings>,
}

impl ConfigHandler {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl salvo::Handler for ConfigHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.settings));
    }
}

/// ## Summary
/// Retrieves the application configuration from the depot.
///
/// ## Errors
/// Returns an error if the configuration is not found in the depot.
pub fn get_config_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Settings>> {
    depot.obtain::<Arc<Settings>>().cloned().map_err(|_err| {
        AppError::CoreError(clientbook_core::error::CoreError::InvariantViolation(
            "Configuration not found in depot",
        ))
    })
}

/// ## Summary
/// Client defaults from the injected configuration, or the built-in defaults
/// when the router runs without a `ConfigHandler`.
#[must_use]
pub fn clients_config_from_depot(depot: &salvo::Depot) -> ClientsConfig {
    get_config_from_depot(depot).map_or_else(
        |_err| {
            tracing::debug!("No configuration in depot, using client defaults");
            ClientsConfig::default()
        },
        |settings| settings.clients.clone(),
    )
}
