//! Shared application state

use crate::auth::{JwksVerifier, TokenVerifier};
use crate::database::DrinkDatabase;
use crate::WebResult;
use coffeeshop_core::{CoffeeShopConfig, DrinkStore};
use std::sync::Arc;
use tracing::info;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CoffeeShopConfig>,
    pub drinks: Arc<dyn DrinkStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Open the configured database and verify tokens against the
    /// configured issuer
    pub async fn new(config: CoffeeShopConfig) -> WebResult<Self> {
        let database = DrinkDatabase::connect(&config.database).await?;

        if config.database.reset_on_startup {
            let seeded = database.drop_and_create_all().await?;
            info!("Database reset, seeded drink {} ({})", seeded.id, seeded.title);
        }

        let verifier = JwksVerifier::new(&config.auth);
        Ok(Self::with_components(
            config,
            Arc::new(database),
            Arc::new(verifier),
        ))
    }

    pub fn with_components(
        config: CoffeeShopConfig,
        drinks: Arc<dyn DrinkStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            drinks,
            verifier,
        }
    }

    /// Release storage resources
    pub async fn shutdown(&self) {
        self.drinks.close().await;
    }
}
