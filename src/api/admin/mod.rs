//! Rutas administrativas
//!
//! Espejos administrativos de cuentas, transportes y rentas. Todo el
//! árbol pasa por `auth_middleware` y después por `admin_only_middleware`.

pub mod account;
pub mod rent;
pub mod transport;

use axum::{middleware, Router};
use serde::Deserialize;

use crate::{
    middleware::auth::{admin_only_middleware, auth_middleware},
    state::AppState,
    utils::errors::{AppError, AppResult},
    utils::validation::validate_non_negative,
};

/// Parámetros de paginación de los listados administrativos
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub start: i64,
    pub count: i64,
}

impl PageParams {
    pub fn validated(&self) -> AppResult<()> {
        let mut errors = validator::ValidationErrors::new();
        if let Err(e) = validate_non_negative(self.start) {
            errors.add("start", e);
        }
        if let Err(e) = validate_non_negative(self.count) {
            errors.add("count", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Crear el router administrativo completo
pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/account", account::create_admin_account_router())
        .nest("/transport", transport::create_admin_transport_router())
        .merge(rent::create_admin_rent_router())
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
