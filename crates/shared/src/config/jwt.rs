use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    pub fn new(user_id: i64, exp: usize, iat: usize, token_type: String) -> Self {
        Claims {
            user_id,
            exp,
            iat,
            token_type,
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }
}

/// The verified caller behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_any_role(&self, wanted: &[&str]) -> bool {
        self.roles.iter().any(|r| wanted.contains(&r.as_str()))
    }
}

/// Verifies access tokens issued by the auth service. Issuing tokens is not
/// this service's job, so only the decoding half lives here.
#[derive(Clone)]
pub struct JwtConfig {
    jwt_secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<Identity, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            })?;

        let current_time = Utc::now().timestamp() as usize;

        if token_data.claims.exp < current_time {
            return Err(ServiceError::TokenExpired);
        }

        if token_data.claims.token_type != expected_type {
            return Err(ServiceError::InvalidTokenType);
        }

        Ok(Identity {
            user_id: token_data.claims.user_id,
            roles: token_data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, user_id: i64, token_type: &str, ttl: Duration) -> String {
        token_with_roles(secret, user_id, token_type, ttl, Vec::new())
    }

    fn token_with_roles(
        secret: &str,
        user_id: i64,
        token_type: &str,
        ttl: Duration,
        roles: Vec<String>,
    ) -> String {
        let now = Utc::now();
        let claims = Claims::new(
            user_id,
            (now + ttl).timestamp() as usize,
            now.timestamp() as usize,
            token_type.to_string(),
        )
        .with_roles(roles);
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .expect("token should encode")
    }

    #[test]
    fn verifies_access_token() {
        let jwt = JwtConfig::new("secret");
        let token = token("secret", 42, "access", Duration::minutes(5));

        let identity = jwt.verify_token(&token, "access").unwrap();
        assert_eq!(identity.user_id, 42);
        assert!(identity.roles.is_empty());
    }

    #[test]
    fn carries_roles_from_the_token() {
        let jwt = JwtConfig::new("secret");
        let token = token_with_roles(
            "secret",
            7,
            "access",
            Duration::minutes(5),
            vec!["ROLE_ADMIN".into()],
        );

        let identity = jwt.verify_token(&token, "access").unwrap();
        assert!(identity.has_any_role(&["ROLE_ADMIN", "ROLE_MODERATOR"]));
        assert!(!identity.has_any_role(&["ROLE_MODERATOR"]));
    }

    #[test]
    fn rejects_refresh_token_for_access() {
        let jwt = JwtConfig::new("secret");
        let token = token("secret", 42, "refresh", Duration::minutes(5));

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::InvalidTokenType)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = JwtConfig::new("secret");
        let token = token("secret", 42, "access", Duration::minutes(-10));

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn rejects_foreign_signature() {
        let jwt = JwtConfig::new("secret");
        let token = token("other", 42, "access", Duration::minutes(5));

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::Jwt(_))
        ));
    }
}
