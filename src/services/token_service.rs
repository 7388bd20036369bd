//! Servicio de emisión de credenciales
//!
//! Emite el par access/refresh y administra la tabla de refresh tokens
//! pendientes: sign-in invalida las credenciales anteriores del usuario,
//! refresh rota la credencial consumida y sign-out la retira.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::user::User;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{
    generate_access_token, generate_refresh_token, verify_refresh_token, JwtConfig, TokenPair,
};

pub struct TokenService {
    tokens: TokenRepository,
    users: UserRepository,
    jwt: JwtConfig,
}

impl TokenService {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            tokens: TokenRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Emite un par nuevo y registra el refresh como pendiente
    async fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let jti = Uuid::new_v4();
        let (refresh, expires_at) = generate_refresh_token(user.id, jti, &self.jwt)?;
        self.tokens.insert(jti, user.id, expires_at).await?;

        let access = generate_access_token(user.id, user.is_admin, &self.jwt)?;

        Ok(TokenPair { access, refresh })
    }

    /// Sign-in: invalida las credenciales pendientes previas (best-effort,
    /// que no hubiera ninguna o que falle la limpieza no corta el login)
    /// y emite un par nuevo.
    pub async fn sign_in(&self, user: &User) -> AppResult<TokenPair> {
        if let Err(e) = self.tokens.revoke_for_user(user.id).await {
            warn!("No se pudieron invalidar credenciales previas: {}", e);
        }

        self.issue_pair(user).await
    }

    /// Rotación: consume el refresh token presentado y emite un par nuevo.
    /// Un refresh ya consumido, expirado o de otro usuario se rechaza.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = verify_refresh_token(refresh_token, &self.jwt)?;

        let jti = Uuid::parse_str(&claims.jti)
            .map_err(|_| AppError::Jwt("jti inválido".to_string()))?;
        let subject = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Subject inválido".to_string()))?;

        let owner = self
            .tokens
            .consume(jti)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Refresh token no vigente".to_string()))?;

        if owner != subject {
            return Err(AppError::Unauthorized("Refresh token no vigente".to_string()));
        }

        let user = self
            .users
            .find_by_id(owner)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

        self.issue_pair(&user).await
    }

    /// Sign-out: retira las credenciales pendientes del usuario.
    /// La ausencia de una sesión previa no es un error.
    pub async fn sign_out(&self, user_id: Uuid) -> AppResult<()> {
        if let Err(e) = self.tokens.revoke_for_user(user_id).await {
            warn!("No se pudieron invalidar credenciales en sign-out: {}", e);
        }

        Ok(())
    }
}
