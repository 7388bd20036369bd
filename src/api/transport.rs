//! Handlers de Transport
//!
//! Este módulo maneja las operaciones CRUD de transportes del lado del
//! dueño. El detalle es público; crear, editar y borrar requieren sesión
//! y la edición/borrado está limitada al dueño exacto.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::{auth_middleware, AuthenticatedUser},
    models::transport::{
        derived_can_be_rented, CreateTransportRequest, Transport, TransportResponse,
        UpdateTransportRequest,
    },
    repositories::transport_repository::{TransportRecord, TransportRepository},
    state::AppState,
    utils::errors::{conflict_error, validation_error, AppError, AppResult},
};

/// Las escrituras sobre un transporte en renta activa se rechazan: la
/// ubicación en NULL es el marcador de la renta y una reescritura la pisaría.
pub(crate) fn ensure_not_mid_rental(transport: &Transport) -> AppResult<()> {
    if transport.in_rental() {
        return Err(conflict_error("El transporte está en una renta activa"));
    }
    Ok(())
}

/// Obtener un transporte por ID (público)
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

/// Listar los transportes del dueño autenticado
pub async fn list_my_transports(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TransportResponse>>> {
    let transports = TransportRepository::new(state.pool.clone())
        .list_by_owner(user.user_id)
        .await?;

    Ok(Json(
        transports.into_iter().map(TransportResponse::from).collect(),
    ))
}

/// Crear un nuevo transporte; el dueño es el actor autenticado
pub async fn create_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(data): Json<CreateTransportRequest>,
) -> AppResult<(StatusCode, Json<TransportResponse>)> {
    data.validate().map_err(AppError::Validation)?;

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
            owner_id: user.user_id,
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

/// Actualizar un transporte propio
pub async fn update_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTransportRequest>,
) -> AppResult<Json<TransportResponse>> {
    data.validate().map_err(AppError::Validation)?;

    let transports = TransportRepository::new(state.pool.clone());

    let existing = transports
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    if existing.owner_id != user.user_id {
        return Err(AppError::Forbidden(
            "Solo el dueño puede editar este transporte".to_string(),
        ));
    }

    ensure_not_mid_rental(&existing)?;

    if transports.identifier_taken(&data.identifier, Some(id)).await? {
        return Err(validation_error("identifier", "identifier already in use"));
    }

    let can_be_rented =
        derived_can_be_rented(data.can_be_rented, &data.minute_price, &data.day_price);

    let transport = transports
        .update(
            id,
            TransportRecord {
                owner_id: existing.owner_id,
                transport_type: existing.transport_type,
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

/// Eliminar un transporte propio
pub async fn delete_transport(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let transports = TransportRepository::new(state.pool.clone());

    let existing = transports
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transporte no encontrado".to_string()))?;

    if existing.owner_id != user.user_id {
        return Err(AppError::Forbidden(
            "Solo el dueño puede eliminar este transporte".to_string(),
        ));
    }

    ensure_not_mid_rental(&existing)?;

    transports.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Crear el router de transportes
pub fn create_transport_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_my_transports))
        .route("/", post(create_transport))
        .route("/:id", put(update_transport))
        .route("/:id", delete(delete_transport))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/:id", get(get_transport))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transport::TransportType;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn parked_transport() -> Transport {
        Transport {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            transport_type: TransportType::Scooter,
            model: "Xiaomi M365".to_string(),
            color: "Negro".to_string(),
            identifier: "SC-0001".to_string(),
            description: None,
            latitude: Some(54.32),
            longitude: Some(48.39),
            minute_price: Some(Decimal::new(550, 2)),
            day_price: None,
            can_be_rented: true,
        }
    }

    #[test]
    fn test_mid_rental_transport_rejects_rewrite() {
        let mut transport = parked_transport();
        transport.latitude = None;
        transport.longitude = None;
        transport.can_be_rented = false;

        let result = ensure_not_mid_rental(&transport);
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_parked_transport_allows_rewrite() {
        assert!(ensure_not_mid_rental(&parked_transport()).is_ok());
    }
}
