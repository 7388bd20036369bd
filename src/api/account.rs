//! Handlers de cuenta
//!
//! Este módulo maneja registro, sign-in, rotación de refresh tokens,
//! sign-out y la cuenta propia.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    middleware::auth::{auth_middleware, AuthenticatedUser},
    models::user::{SignInRequest, SignUpRequest, UpdateAccountRequest, UserResponse},
    repositories::user_repository::UserRepository,
    services::token_service::TokenService,
    state::AppState,
    utils::errors::{validation_error, AppError, AppResult},
    utils::jwt::TokenPair,
};

/// Request para rotar el refresh token
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 10))]
    pub refresh_token: String,
}

/// Handler de registro
pub async fn sign_up(
    State(state): State<AppState>,
    Json(data): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    data.validate().map_err(AppError::Validation)?;

    let users = UserRepository::new(state.pool.clone());

    if users.username_taken(&data.username, None).await? {
        return Err(validation_error("username", "username already in use"));
    }

    let password_hash = hash(&data.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

    let user = users
        .create(&data.username, &password_hash, rust_decimal::Decimal::ZERO, false)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Handler de sign-in: emite el par access/refresh e invalida las
/// credenciales pendientes anteriores del usuario
pub async fn sign_in(
    State(state): State<AppState>,
    Json(data): Json<SignInRequest>,
) -> AppResult<Json<TokenPair>> {
    data.validate().map_err(AppError::Validation)?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_username(&data.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    let password_valid = verify(&data.password, &user.password_hash)
        .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

    if !password_valid {
        return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
    }

    let pair = TokenService::new(state.pool.clone(), state.jwt_config())
        .sign_in(&user)
        .await?;

    Ok(Json(pair))
}

/// Handler de rotación del refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(data): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    data.validate().map_err(AppError::Validation)?;

    let pair = TokenService::new(state.pool.clone(), state.jwt_config())
        .refresh(&data.refresh_token)
        .await?;

    Ok(Json(pair))
}

/// Handler de sign-out: retira las credenciales pendientes
pub async fn sign_out(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    TokenService::new(state.pool.clone(), state.jwt_config())
        .sign_out(user.user_id)
        .await?;

    Ok(Json(json!({ "message": "Sesión cerrada" })))
}

/// Handler para obtener la cuenta propia
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Handler de actualización de la cuenta propia
pub async fn update_account(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(data): Json<UpdateAccountRequest>,
) -> AppResult<Json<UserResponse>> {
    data.validate().map_err(AppError::Validation)?;

    let users = UserRepository::new(state.pool.clone());

    if users.username_taken(&data.username, Some(user.user_id)).await? {
        return Err(validation_error("username", "username already in use"));
    }

    let password_hash = hash(&data.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

    let updated = users
        .update_credentials(user.user_id, &data.username, &password_hash)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Crear el router de cuenta
pub fn create_account_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
        .route("/update", put(update_account))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-in/refresh", post(refresh))
        .merge(protected)
}
