use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::guard::AuthError;
use crate::models::operator::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "operator" => Some(Role::Operator),
            _ => None,
        }
    }
}

// Claim names match the tokens the original server issued, so existing
// clients keep decoding them unchanged. `exp` and `role` are required
// fields: a token missing either fails deserialization outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userEmail")]
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenKeys {
    secret: String,
    ttl_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Reads JWT_SECRET (required) and TOKEN_TTL_HOURS (default 24).
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);
        Self::new(secret, ttl_hours)
    }

    pub fn issue(&self, operator: &Operator, role: Role) -> Result<String, AuthError> {
        let exp = (Utc::now() + Duration::hours(self.ttl_hours)).timestamp() as usize;
        let claims = Claims {
            user_id: operator.operator_id.to_string(),
            email: operator.email.clone(),
            role,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AuthError::MalformedToken)
    }

    /// Decodes and verifies the signature and claim shape. Expiry is checked
    /// by the guard, which needs "at or before now" semantics and a distinct
    /// expired outcome; jsonwebtoken's own exp validation (with its default
    /// leeway) is disabled here.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::MalformedToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new("test-secret-key-12345".to_string(), 24)
    }

    fn test_operator() -> Operator {
        Operator {
            operator_id: 7,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "08012345678".to_string(),
            role: "admin".to_string(),
            status: "active".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issue_and_decode_roundtrip() {
        let keys = test_keys();
        let token = keys.issue(&test_operator(), Role::Admin).unwrap();

        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.user_id, "7");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = test_keys().issue(&test_operator(), Role::Operator).unwrap();
        let other = TokenKeys::new("another-secret".to_string(), 24);
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(test_keys().decode("not.a.token").is_err());
    }

    #[test]
    fn token_missing_role_is_rejected() {
        let keys = test_keys();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let bare = serde_json::json!({ "userId": "1", "userEmail": "a@b.c", "exp": exp });
        let token = encode(
            &Header::default(),
            &bare,
            &EncodingKey::from_secret("test-secret-key-12345".as_bytes()),
        )
        .unwrap();
        assert!(keys.decode(&token).is_err());
    }

    #[test]
    fn token_missing_exp_is_rejected() {
        let keys = test_keys();
        let bare = serde_json::json!({ "userId": "1", "userEmail": "a@b.c", "role": "admin" });
        let token = encode(
            &Header::default(),
            &bare,
            &EncodingKey::from_secret("test-secret-key-12345".as_bytes()),
        )
        .unwrap();
        assert!(keys.decode(&token).is_err());
    }
}
