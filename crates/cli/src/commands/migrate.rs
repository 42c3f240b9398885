//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! eco-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ECOLETA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/` and are embedded at compile
//! time:
//! ```text
//! migrations/
//! ├── 20260301000001_create_items.sql
//! ├── 20260301000002_create_points.sql
//! └── 20260301000003_create_points_items.sql
//! ```

use thiserror::Error;

use ecoleta_api::db::{self, MIGRATOR};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns error if the database URL is missing, the connection fails, or a
/// migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()
        .map_err(|_| MigrationError::MissingEnvVar("ECOLETA_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Running migrations..."
    );
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
