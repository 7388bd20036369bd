//! API REST del sistema
//!
//! Este módulo arma el árbol de rutas bajo `/api`.

pub mod account;
pub mod admin;
pub mod payment;
pub mod rent;
pub mod transport;

use axum::Router;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/account", account::create_account_router(state.clone()))
        .nest("/transport", transport::create_transport_router(state.clone()))
        .nest("/rent", rent::create_rent_router(state.clone()))
        .nest("/payment", payment::create_payment_router(state.clone()))
        .nest("/admin", admin::create_admin_router(state));

    Router::new().nest("/api", api)
}
