//! Repositorio de usuarios

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::AppError;

const USER_COLUMNS: &str = "id, username, password_hash, balance, is_admin, created_at";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        balance: Decimal,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, balance, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, balance, is_admin, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(balance)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// El username ya está en uso por otro usuario distinto de `exclude`
    pub async fn username_taken(
        &self,
        username: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn list(&self, start: i64, count: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at OFFSET $1 LIMIT $2",
            USER_COLUMNS
        ))
        .bind(start)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Reemplazo completo del registro (vía administrativa)
    pub async fn update(
        &self,
        id: Uuid,
        username: &str,
        password_hash: &str,
        balance: Decimal,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, balance = $4, is_admin = $5
            WHERE id = $1
            RETURNING id, username, password_hash, balance, is_admin, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(balance)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Actualización de la cuenta propia: solo username y credencial
    pub async fn update_credentials(
        &self,
        id: Uuid,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3
            WHERE id = $1
            RETURNING id, username, password_hash, balance, is_admin, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Abona `amount` al balance del usuario. Devuelve false si no existe.
    pub async fn credit_balance(&self, id: Uuid, amount: Decimal) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET balance = balance + $2 WHERE id = $1")
            .bind(id)
            .bind(amount)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Borrado duro; los transportes del dueño caen en cascada
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
