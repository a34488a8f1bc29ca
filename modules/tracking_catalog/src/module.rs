//! Module wiring: database, repositories, service and HTTP router

use crate::api::rest::{auth::Authenticator, routes};
use crate::config::Config;
use crate::domain::Service;
use crate::infra::{db, storage};
use anyhow::Result;
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Tracking catalog module
pub struct CatalogModule {
    config: Config,
    db: Arc<DatabaseConnection>,
    service: Arc<Service>,
}

impl CatalogModule {
    /// Connect to the configured database and build the module
    pub async fn init(config: Config) -> Result<Self> {
        let conn = db::connect(&config.database).await?;
        let module = Self::with_connection(config, conn);

        if module.config.database.run_migrations {
            module.migrate().await?;
        }

        tracing::info!(
            auth_enabled = module.config.auth.enabled(),
            race_retries = module.config.composer.race_retries,
            "tracking catalog initialized"
        );
        Ok(module)
    }

    /// Build the module on an existing connection; migrations are not run
    pub fn with_connection(config: Config, conn: DatabaseConnection) -> Self {
        let conn = Arc::new(conn);

        // Build repositories
        let event_repo = Arc::new(storage::SeaOrmEventRepository::new(conn.clone()));
        let property_repo = Arc::new(storage::SeaOrmPropertyRepository::new(conn.clone()));
        let plan_repo = Arc::new(storage::SeaOrmTrackingPlanRepository::new(conn.clone()));
        let tx_manager = Arc::new(storage::SeaOrmTransactionManager::new(conn.clone()));

        let service = Arc::new(Service::new(
            event_repo,
            property_repo,
            plan_repo,
            tx_manager,
            config.composer.race_retries,
        ));

        Self {
            config,
            db: conn,
            service,
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        db::migrate(&self.db).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// HTTP router with tracing, request ids, panic recovery, body limit and timeout applied
    pub fn router(&self) -> Router {
        let auth = Authenticator::from_config(&self.config.auth);
        if auth.is_none() {
            tracing::warn!("authentication disabled: no jwt_secret configured");
        }

        let server = &self.config.server;
        tracing::info!(prefix = %server.api_prefix, "registering tracking catalog REST routes");

        let router = routes::register_routes(
            Router::new(),
            &server.api_prefix,
            self.service.clone(),
            auth,
        );
        routes::apply_middleware(router, server)
    }
}
