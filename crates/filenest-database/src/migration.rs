//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use filenest_core::error::{AppError, ErrorKind};
use filenest_core::result::AppResult;

/// Migrations compiled into the binary from the workspace `migrations/`
/// directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date.
pub async fn apply(pool: &PgPool) -> AppResult<()> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to run migrations", e)
    })?;
    info!("Schema migrations applied");
    Ok(())
}
