//! Handlers administrativos de transportes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::transport::ensure_not_mid_rental,
    models::transport::{
        derived_can_be_rented, AdminTransportRequest, TransportResponse, TransportTypeFilter,
    },
    repositories::transport_repository::{TransportRecord, TransportRepository},
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::errors::{validation_error, AppError, AppResult},
    utils::validation::validate_non_negative,
};

/// Parámetros del listado administrativo de transportes
#[derive(Debug, Deserialize)]
pub struct TransportPageParams {
    pub start: i64,
    pub count: i64,
    pub transport_type: String,
}

async fn require_owner(state: &AppState, owner_id: Uuid) -> AppResult<()> {
    let exists = UserRepository::new(state.pool.clone())
        .find_by_id(owner_id)
        .await?
        .is_some();

    if !exists {
        return Err(validation_error("owner_id", "owner does not exist"));
    }
    Ok(())
}

/// Listado paginado con filtro de tipo (`Car|Bike|Scooter|All`)
pub async fn list_transports(
    State(state): State<AppState>,
    Query(params): Query<TransportPageParams>,
) -> AppResult<Json<Vec<TransportResponse>>> {
    let mut errors = validator::ValidationErrors::new();
    if let Err(e) = validate_non_negative(params.start) {
        errors.add("start", e);
    }
    if let Err(e) = validate_non_negative(params.count) {
        errors.add("count", e);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let filter: TransportTypeFilter = params
        .transport_type
        .parse()
        .map_err(|_| AppError::BadRequest("Tipo de transporte desconocido".to_string()))?;

    let transports = TransportRepository::new(state.pool.clone())
        .list(params.start, params.count, filter)
        .await?;

    Ok(Json(
        transports.into_iter().map(TransportResponse::from).collect(),
    ))
}

/// Detalle de cualquier transporte
pub async fn get_transport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TransportResponse>> {
    let transport = TransportRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    Ok(Json(TransportResponse::from(transport)))
}

/// Alta de transporte a nombre de cualquier dueño
pub async fn create_transport(
    State(state): State<AppState>,
    Json(data): Json<AdminTransportRequest>,
) -> AppResult<(StatusCode, Json<TransportResponse>)> {
    data.validate().map_err(AppError::Validation)?;

    require_owner(&state, data.owner_id).await?;

    let transports = TransportRepository::new(state.pool.clone());

    if transports.identifier_taken(&data.identifier, None).await? {
        return Err(validation_error("identifier", "identifier already in use"));
    }

    let can_be_rented = derived_can_be_rented(
        data.can_be_rented.unwrap_or(true),
        &data.minute_price,
        &data.day_price,
    );

    let transport = transports
        .create(TransportRecord {
            owner_id: data.owner_id,
            transport_type: data.transport_type,
            model: &data.model,
            color: &data.color,
            identifier: &data.identifier,
            description: data.description.as_deref(),
            latitude: data.latitude,
            longitude: data.longitude,
            minute_price: data.minute_price,
            day_price: data.day_price,
            can_be_rented,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TransportResponse::from(transport))))
}

/// Reescritura administrativa completa, incluidos dueño y tipo
pub async fn update_transport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<AdminTransportRequest>,
) -> AppResult<Json<TransportResponse>> {
    data.validate().map_err(AppError::Validation)?;

    require_owner(&state, data.owner_id).await?;

    let transports = TransportRepository::new(state.pool.clone());

    let existing = transports
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    // la reescritura pisaría la ubicación en NULL que marca la renta activa
    ensure_not_mid_rental(&existing)?;

    if transports.identifier_taken(&data.identifier, Some(id)).await? {
        return Err(validation_error("identifier", "identifier already in use"));
    }

    let can_be_rented = derived_can_be_rented(
        data.can_be_rented.unwrap_or(true),
        &data.minute_price,
        &data.day_price,
    );

    let transport = transports
        .replace(
            id,
            TransportRecord {
                owner_id: data.owner_id,
                transport_type: data.transport_type,
                model: &data.model,
                color: &data.color,
                identifier: &data.identifier,
                description: data.description.as_deref(),
                latitude: data.latitude,
                longitude: data.longitude,
                minute_price: data.minute_price,
                day_price: data.day_price,
                can_be_rented,
            },
        )
        .await?;

    Ok(Json(TransportResponse::from(transport)))
}

/// Borrado administrativo; rechazado si el transporte está en renta activa
pub async fn delete_transport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let transports = TransportRepository::new(state.pool.clone());

    let existing = transports
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    ensure_not_mid_rental(&existing)?;

    transports.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn create_admin_transport_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transports))
        .route("/", post(create_transport))
        .route("/:id", get(get_transport))
        .route("/:id", put(update_transport))
        .route("/:id", delete(delete_transport))
}
