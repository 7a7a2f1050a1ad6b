use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info};

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db: DatabaseConnection = Database::connect(database_url).await.inspect_err(|e| {
        error!("Failed to connect to database '{}': {}", database_url, e);
    })?;

    info!("Running database migrations");
    Migrator::up(&db, None).await.inspect_err(|e| {
        error!("Failed to run database migrations: {}", e);
    })?;

    info!("Database initialization completed successfully");
    Ok(())
}
