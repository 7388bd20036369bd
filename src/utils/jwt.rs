//! Utilidades JWT
//!
//! Este módulo contiene la generación y verificación del par de tokens
//! access/refresh. El refresh token lleva un `jti` que debe existir en la
//! tabla `refresh_tokens` para ser aceptado.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims del access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // user_id
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

/// Claims del refresh token
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String, // user_id
    pub jti: String, // id de la credencial pendiente en BD
    pub token_use: String,
    pub exp: usize,
    pub iat: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration: u64,
    pub refresh_expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration: config.jwt_access_expiration,
            refresh_expiration: config.jwt_refresh_expiration,
        }
    }
}

/// Par de tokens emitido en sign-in y refresh
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Generar el access token para un usuario
pub fn generate_access_token(
    user_id: Uuid,
    is_admin: bool,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.access_expiration as i64);

    let claims = AccessClaims {
        sub: user_id.to_string(),
        is_admin,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Generar el refresh token con el `jti` dado.
///
/// Devuelve el token y su instante de expiración, que se persiste junto al
/// `jti` en la tabla de credenciales pendientes.
pub fn generate_refresh_token(
    user_id: Uuid,
    jti: Uuid,
    config: &JwtConfig,
) -> Result<(String, DateTime<Utc>), AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.refresh_expiration as i64);

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        jti: jti.to_string(),
        token_use: "refresh".to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))?;

    Ok((token, expires_at))
}

/// Verificar y decodificar un access token
pub fn verify_access_token(token: &str, config: &JwtConfig) -> Result<AccessClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<AccessClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Verificar y decodificar un refresh token
pub fn verify_refresh_token(token: &str, config: &JwtConfig) -> Result<RefreshClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<RefreshClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    if token_data.claims.token_use != "refresh" {
        return Err(AppError::Jwt("El token no es un refresh token".to_string()));
    }

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Jwt("Header Authorization debe comenzar con 'Bearer '".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration: 900,
            refresh_expiration: 86400,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, true, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let (token, expires_at) = generate_refresh_token(user_id, jti, &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti, jti.to_string());
        assert_eq!(expires_at.timestamp() as usize, claims.exp);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = test_config();
        let token = generate_access_token(Uuid::new_v4(), false, &config).unwrap();

        assert!(verify_refresh_token(&token, &config).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            ..test_config()
        };

        let token = generate_access_token(Uuid::new_v4(), false, &config).unwrap();
        assert!(verify_access_token(&token, &other).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Token abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
