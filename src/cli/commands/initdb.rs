use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, info, trace};

/// Bring the users and investors tables up to the latest schema.
///
/// Already-applied migrations are skipped, so this is safe on every start.
pub async fn apply_migrations(db: &DatabaseConnection) -> Result<()> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .context("Failed to read migration status")?
        .len();
    info!("Applying {} pending migration(s)", pending);

    Migrator::up(db, None)
        .await
        .context("Failed to run database migrations")?;
    debug!("Schema is up to date");
    Ok(())
}

/// Create the registry schema without starting the server
pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Preparing registry schema");
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    apply_migrations(&db).await?;
    db.close().await?;

    info!("Registry database ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database_on_memory_sqlite() {
        init_database("sqlite::memory:").await.unwrap();
    }

    #[tokio::test]
    async fn test_init_database_reports_bad_url() {
        let err = init_database("nosuchdriver://nowhere").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to connect"));
    }

    #[tokio::test]
    async fn test_apply_migrations_twice_is_a_no_op() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        apply_migrations(&db).await.unwrap();
        apply_migrations(&db).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    }
}
