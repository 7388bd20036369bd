//! Handlers administrativos de rentas
//!
//! Incluye el CRUD crudo sobre registros de renta y el cierre
//! administrativo, que no exige ser el arrendatario.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::rent::{AdminRentRequest, RentResponse},
    repositories::rent_repository::RentRepository,
    repositories::transport_repository::TransportRepository,
    repositories::user_repository::UserRepository,
    services::rent_service::RentService,
    state::AppState,
    utils::errors::{validation_error, AppError, AppResult},
    utils::validation::validate_coordinates,
};

#[derive(Debug, Deserialize)]
pub struct EndParams {
    pub lat: f64,
    pub long: f64,
}

async fn require_references(state: &AppState, data: &AdminRentRequest) -> AppResult<()> {
    let renter_exists = UserRepository::new(state.pool.clone())
        .find_by_id(data.renter_id)
        .await?
        .is_some();

    if !renter_exists {
        return Err(validation_error("renter_id", "renter does not exist"));
    }

    if let Some(transport_id) = data.transport_id {
        let transport_exists = TransportRepository::new(state.pool.clone())
            .find_by_id(transport_id)
            .await?
            .is_some();

        if !transport_exists {
            return Err(validation_error("transport_id", "transport does not exist"));
        }
    }

    Ok(())
}

/// Detalle de cualquier renta
pub async fn get_rent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RentResponse>> {
    let rent = RentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Renta no encontrada".to_string()))?;

    Ok(Json(RentResponse::from(rent)))
}

/// Historial de rentas de cualquier usuario
pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<RentResponse>>> {
    UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    let rents = RentRepository::new(state.pool.clone())
        .list_by_renter(user_id)
        .await?;

    Ok(Json(rents.into_iter().map(RentResponse::from).collect()))
}

/// Historial de rentas de cualquier transporte
pub async fn transport_history(
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<Vec<RentResponse>>> {
    TransportRepository::new(state.pool.clone())
        .find_by_id(transport_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    let rents = RentRepository::new(state.pool.clone())
        .list_by_transport(transport_id)
        .await?;

    Ok(Json(rents.into_iter().map(RentResponse::from).collect()))
}

/// Alta cruda de un registro de renta, sin transición de estado
pub async fn create_rent(
    State(state): State<AppState>,
    Json(data): Json<AdminRentRequest>,
) -> AppResult<(StatusCode, Json<RentResponse>)> {
    data.validate().map_err(AppError::Validation)?;

    require_references(&state, &data).await?;

    let rent = RentRepository::new(state.pool.clone())
        .create_raw(&data)
        .await?;

    Ok((StatusCode::CREATED, Json(RentResponse::from(rent))))
}

/// Reescritura cruda de un registro de renta
pub async fn update_rent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<AdminRentRequest>,
) -> AppResult<Json<RentResponse>> {
    data.validate().map_err(AppError::Validation)?;

    let rents = RentRepository::new(state.pool.clone());

    rents
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Renta no encontrada".to_string()))?;

    require_references(&state, &data).await?;

    let rent = rents.update_raw(id, &data).await?;

    Ok(Json(RentResponse::from(rent)))
}

/// Cierre administrativo de una renta activa.
///
/// El cargo cae sobre el arrendatario salvo que `ADMIN_END_BILLS_ACTOR`
/// esté activo, en cuyo caso se cobra al administrador que cierra.
pub async fn end_rent(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(rent_id): Path<Uuid>,
    Query(params): Query<EndParams>,
) -> AppResult<Json<RentResponse>> {
    let mut errors = validator::ValidationErrors::new();
    if let Err(e) = validate_coordinates(params.lat, params.long) {
        errors.add("coordinates", e);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let bill_actor = state.config.admin_end_bills_actor;

    let rent = RentService::new(state.pool.clone())
        .end(rent_id, user.user_id, params.lat, params.long, false, bill_actor)
        .await?;

    Ok(Json(RentResponse::from(rent)))
}

/// Borrado de un registro de renta
pub async fn delete_rent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = RentRepository::new(state.pool.clone()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Renta no encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub fn create_admin_rent_router() -> Router<AppState> {
    Router::new()
        .route("/rent", post(create_rent))
        .route("/rent/end/:rent_id", post(end_rent))
        .route("/rent/:id", get(get_rent))
        .route("/rent/:id", put(update_rent))
        .route("/rent/:id", delete(delete_rent))
        .route("/user-history/:user_id", get(user_history))
        .route("/transport-history/:transport_id", get(transport_history))
}
