//! Modelo de User
//!
//! Este módulo contiene el struct User y los requests/responses de cuenta.
//! Mapea exactamente a la tabla `users`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub balance: Decimal,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Request de registro
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Request de sign-in
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Request de actualización de la cuenta propia
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Request de creación de cuenta por un administrador
#[derive(Debug, Deserialize, Validate)]
pub struct AdminAccountRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    pub balance: Option<Decimal>,
    pub is_admin: Option<bool>,
}

/// Response de usuario para la API - nunca expone la credencial
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub balance: Decimal,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            balance: user.balance,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
