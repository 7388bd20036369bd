//! Handlers de pagos
//!
//! Por ahora el único movimiento disponible es el abono fijo de saldo.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::auth::{auth_middleware, AuthenticatedUser},
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

/// Monto fijo que acredita cada top-up
const TOP_UP_AMOUNT: i64 = 250_000;

/// Abonar el monto fijo a la cuenta indicada.
///
/// Un usuario solo puede abonarse a sí mismo; un administrador puede
/// abonar a cualquier cuenta.
pub async fn top_up(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if account_id != user.user_id && !user.is_admin {
        return Err(AppError::Forbidden(
            "Solo puedes abonar a tu propia cuenta".to_string(),
        ));
    }

    let credited = UserRepository::new(state.pool.clone())
        .credit_balance(account_id, Decimal::from(TOP_UP_AMOUNT))
        .await?;

    if !credited {
        return Err(AppError::NotFound("Usuario no encontrado".to_string()));
    }

    info!("💰 Top-up de {} aplicado a la cuenta {}", TOP_UP_AMOUNT, account_id);

    Ok(Json(json!({
        "message": "Saldo abonado",
        "amount": TOP_UP_AMOUNT,
    })))
}

/// Crear el router de pagos
pub fn create_payment_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/top-up/:account_id", post(top_up))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
