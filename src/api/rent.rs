//! Handlers de Rent
//!
//! Este módulo maneja la búsqueda por proximidad (pública), el historial
//! y las transiciones de ciclo de vida de las rentas.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    middleware::auth::{auth_middleware, AuthenticatedUser},
    models::rent::{RentResponse, RentType},
    models::transport::{TransportResponse, TransportTypeFilter},
    repositories::rent_repository::RentRepository,
    repositories::transport_repository::TransportRepository,
    services::rent_service::RentService,
    state::AppState,
    utils::errors::{AppError, AppResult},
    utils::geo,
    utils::validation::{validate_coordinates, validate_non_negative},
};

/// Parámetros de la búsqueda por proximidad
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub lat: f64,
    pub long: f64,
    /// Radio de búsqueda en metros
    pub radius: f64,
    pub transport_type: String,
}

/// Parámetros del cierre de renta
#[derive(Debug, Deserialize)]
pub struct EndParams {
    pub lat: f64,
    pub long: f64,
}

/// Parámetros del inicio de renta
#[derive(Debug, Deserialize)]
pub struct NewRentParams {
    pub rent_type: String,
}

fn coordinate_errors(lat: f64, long: f64) -> Result<(), AppError> {
    let mut errors = validator::ValidationErrors::new();
    if let Err(e) = validate_coordinates(lat, long) {
        errors.add("coordinates", e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Búsqueda pública de transportes rentables dentro de un radio.
///
/// El corte por distancia es inclusivo: un transporte exactamente a
/// `radius` metros entra en el resultado.
pub async fn search_transport(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<TransportResponse>>> {
    coordinate_errors(params.lat, params.long)?;

    let mut errors = validator::ValidationErrors::new();
    if let Err(e) = validate_non_negative(params.radius) {
        errors.add("radius", e);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let filter: TransportTypeFilter = params
        .transport_type
        .parse()
        .map_err(|_| AppError::BadRequest("Tipo de transporte desconocido".to_string()))?;

    let candidates = TransportRepository::new(state.pool.clone())
        .list_rentable_located(filter)
        .await?;

    let transports: Vec<TransportResponse> = candidates
        .into_iter()
        .filter(|t| match (t.latitude, t.longitude) {
            (Some(lat), Some(long)) => {
                geo::within_radius(params.lat, params.long, lat, long, params.radius)
            }
            _ => false,
        })
        .map(TransportResponse::from)
        .collect();

    Ok(Json(transports))
}

/// Detalle de una renta: solo el arrendatario o el dueño del transporte
pub async fn get_rent(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RentResponse>> {
    let rent = RentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Renta no encontrada".to_string()))?;

    let mut allowed = rent.renter_id == user.user_id;

    if !allowed {
        if let Some(transport_id) = rent.transport_id {
            if let Some(transport) = TransportRepository::new(state.pool.clone())
                .find_by_id(transport_id)
                .await?
            {
                allowed = transport.owner_id == user.user_id;
            }
        }
    }

    if !allowed {
        return Err(AppError::Forbidden(
            "Solo el arrendatario o el dueño del transporte pueden ver esta renta".to_string(),
        ));
    }

    Ok(Json(RentResponse::from(rent)))
}

/// Historial de rentas del usuario autenticado
pub async fn my_history(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RentResponse>>> {
    let rents = RentRepository::new(state.pool.clone())
        .list_by_renter(user.user_id)
        .await?;

    Ok(Json(rents.into_iter().map(RentResponse::from).collect()))
}

/// Historial de rentas de un transporte: solo su dueño
pub async fn transport_history(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<Vec<RentResponse>>> {
    let transport = TransportRepository::new(state.pool.clone())
        .find_by_id(transport_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    if transport.owner_id != user.user_id {
        return Err(AppError::Forbidden(
            "Solo el dueño puede ver el historial de este transporte".to_string(),
        ));
    }

    let rents = RentRepository::new(state.pool.clone())
        .list_by_transport(transport_id)
        .await?;

    Ok(Json(rents.into_iter().map(RentResponse::from).collect()))
}

/// Iniciar una renta sobre un transporte ajeno
pub async fn new_rent(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(transport_id): Path<Uuid>,
    Query(params): Query<NewRentParams>,
) -> AppResult<(StatusCode, Json<RentResponse>)> {
    let rent_type: RentType = params
        .rent_type
        .parse()
        .map_err(|_| AppError::BadRequest("Tipo de renta desconocido".to_string()))?;

    let rent = RentService::new(state.pool.clone())
        .start(user.user_id, transport_id, rent_type)
        .await?;

    Ok((StatusCode::CREATED, Json(RentResponse::from(rent))))
}

/// Terminar una renta propia dejando el transporte en las coordenadas dadas
pub async fn end_rent(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(rent_id): Path<Uuid>,
    Query(params): Query<EndParams>,
) -> AppResult<Json<RentResponse>> {
    coordinate_errors(params.lat, params.long)?;

    let rent = RentService::new(state.pool.clone())
        .end(rent_id, user.user_id, params.lat, params.long, true, false)
        .await?;

    Ok(Json(RentResponse::from(rent)))
}

/// Crear el router de rentas
pub fn create_rent_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/my-history", get(my_history))
        .route("/transport-history/:transport_id", get(transport_history))
        .route("/new/:transport_id", post(new_rent))
        .route("/end/:rent_id", post(end_rent))
        .route("/:id", get(get_rent))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/transport", get(search_transport))
        .merge(protected)
}
