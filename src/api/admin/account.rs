//! Handlers administrativos de cuentas

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bcrypt::{hash, DEFAULT_COST};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::admin::PageParams,
    models::user::{AdminAccountRequest, UserResponse},
    repositories::user_repository::UserRepository,
    state::AppState,
    utils::errors::{validation_error, AppError, AppResult},
};

/// Listado paginado de cuentas
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    page.validated()?;

    let users = UserRepository::new(state.pool.clone())
        .list(page.start, page.count)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Detalle de cualquier cuenta
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Alta de cuenta con balance y flag de administrador explícitos
pub async fn create_account(
    State(state): State<AppState>,
    Json(data): Json<AdminAccountRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    data.validate().map_err(AppError::Validation)?;

    let users = UserRepository::new(state.pool.clone());

    if users.username_taken(&data.username, None).await? {
        return Err(validation_error("username", "username already in use"));
    }

    let password_hash = hash(&data.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

    let user = users
        .create(
            &data.username,
            &password_hash,
            data.balance.unwrap_or(Decimal::ZERO),
            data.is_admin.unwrap_or(false),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Reescritura administrativa de una cuenta
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<AdminAccountRequest>,
) -> AppResult<Json<UserResponse>> {
    data.validate().map_err(AppError::Validation)?;

    let users = UserRepository::new(state.pool.clone());

    let existing = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    if users.username_taken(&data.username, Some(id)).await? {
        return Err(validation_error("username", "username already in use"));
    }

    let password_hash = hash(&data.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

    let user = users
        .update(
            id,
            &data.username,
            &password_hash,
            data.balance.unwrap_or(existing.balance),
            data.is_admin.unwrap_or(existing.is_admin),
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Borrado de cuenta; los transportes del dueño caen en cascada
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = UserRepository::new(state.pool.clone()).delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Usuario no encontrado".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub fn create_admin_account_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/", post(create_account))
        .route("/:id", get(get_account))
        .route("/:id", put(update_account))
        .route("/:id", delete(delete_account))
}
