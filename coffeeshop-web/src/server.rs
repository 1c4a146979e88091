//! Coffee Shop Web Server
//!
//! Binds the listener, serves the router and closes storage once the
//! shutdown signal arrives.

use crate::{create_app, AppState, WebError, WebResult};
use coffeeshop_core::{AuthConfig, CoffeeShopConfig};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main coffee shop server
pub struct CoffeeShopServer {
    config: CoffeeShopConfig,
    state: AppState,
}

impl CoffeeShopServer {
    /// Validate the configuration and open storage
    pub async fn new(config: CoffeeShopConfig) -> WebResult<Self> {
        config.validate()?;
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Serve prebuilt state, e.g. with a custom store or verifier
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.as_ref().clone(),
            state,
        }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Coffee Shop Server");
        info!("🔐 Token issuer: {}", self.config.auth.issuer);

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> WebResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener.local_addr().map_err(WebError::Server)?;
        let app = create_app(self.state.clone());

        info!("✅ Server listening on http://{}", address);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        self.state.shutdown().await;

        if let Err(e) = result {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        info!("Server stopped");
        Ok(())
    }

    pub fn config(&self) -> &CoffeeShopConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for CoffeeShopServer
pub struct CoffeeShopServerBuilder {
    config: CoffeeShopConfig,
}

impl CoffeeShopServerBuilder {
    pub fn new() -> Self {
        Self {
            config: CoffeeShopConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: CoffeeShopConfig) -> Self {
        Self { config }
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.database.url = database_url.into();
        self
    }

    /// Wipe and reseed the drink table on startup
    pub fn reset_database(mut self, reset: bool) -> Self {
        self.config.database.reset_on_startup = reset;
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    pub async fn build(self) -> WebResult<CoffeeShopServer> {
        CoffeeShopServer::new(self.config).await
    }
}

impl Default for CoffeeShopServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
