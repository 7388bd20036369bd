//! Conexión a PostgreSQL
//!
//! Este módulo crea el pool de conexiones y ejecuta las migraciones
//! embebidas al arrancar.

use anyhow::Result;
use sqlx::PgPool;

use crate::config::database::DatabaseConfig;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool() -> Result<PgPool> {
    let config = DatabaseConfig::default();
    let pool = config.create_pool().await?;

    Ok(pool)
}

/// Ejecutar migraciones embebidas de `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
