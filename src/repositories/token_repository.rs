//! Repositorio de refresh tokens pendientes
//!
//! Tabla explícita de credenciales emitidas y aún no invalidadas. Un
//! refresh token solo se acepta si su `jti` sigue aquí; sign-in y sign-out
//! retiran las filas del usuario.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::utils::errors::AppError;

pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        jti: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO refresh_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(jti)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Retira todas las credenciales pendientes del usuario.
    /// Que no hubiera ninguna no es un error.
    pub async fn revoke_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Consume la credencial: la retira y devuelve su dueño si seguía
    /// pendiente y sin expirar. La rotación reinserta una nueva después.
    pub async fn consume(&self, jti: Uuid) -> Result<Option<Uuid>, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM refresh_tokens WHERE jti = $1 AND expires_at > NOW() RETURNING user_id",
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}
