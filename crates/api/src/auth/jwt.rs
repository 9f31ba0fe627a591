//! JWT access-token validation.
//!
//! Session issuance lives in the identity service; this API only
//! validates HS256-signed tokens and trusts the claims they carry.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexforge_core::types::DbId;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// The tenant (law firm) the user belongs to.
    pub tenant_id: DbId,
    /// The user's email, recorded in audit entries.
    pub email: String,
    /// Role name (`firm_owner`, `firm_staff`, `client`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for token validation (and generation in tests/tools).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 30).
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;

impl JwtConfig {
    /// Load from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for the given identity.
pub fn generate_token(
    user_id: DbId,
    tenant_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        tenant_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::minutes(config.access_token_expiry_mins)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a token and return its claims. Expired or forged tokens fail.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            access_token_expiry_mins: 30,
        }
    }

    #[test]
    fn generate_validate_round_trip() {
        let config = test_config();
        let user = Uuid::new_v4();
        let tenant = Uuid::new_v4();

        let token =
            generate_token(user, tenant, "staff@firm.example", "firm_staff", &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user);
        assert_eq!(claims.tenant_id, tenant);
        assert_eq!(claims.email, "staff@firm.example");
        assert_eq!(claims.role, "firm_staff");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = generate_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "a@b.c",
            "firm_staff",
            &config,
        )
        .unwrap();

        let other = JwtConfig {
            secret: "different-secret".into(),
            access_token_expiry_mins: 30,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_token("not-a-token", &test_config()).is_err());
    }
}
