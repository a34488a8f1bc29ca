//! Database connection and schema management

use crate::config::DatabaseConfig;
use crate::infra::storage::migrations::Migrator;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Open a connection pool described by `config`
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("failed to connect to catalog database")?;

    tracing::info!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "database connected"
    );
    Ok(db)
}

/// Apply all pending migrations
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("failed to apply catalog migrations")?;
    tracing::info!("tracking catalog migrations completed");
    Ok(())
}
