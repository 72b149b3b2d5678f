use actix_web::http::StatusCode;
use chrono::Utc;
use thiserror::Error;

use super::session::Session;
use super::token::{Claims, Role, TokenKeys};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization token")]
    MissingToken,
    #[error("invalid token")]
    MalformedToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("role not permitted")]
    WrongRole,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::WrongRole => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug)]
pub enum Access {
    Granted(Claims),
    Denied(AuthError),
}

/// Single-pass access decision for a role-restricted route.
///
/// Only the malformed and expired paths clear the session: those credentials
/// are dead everywhere. A wrong-role token is left in place, since it may
/// still be valid for other routes. Decode failures are absorbed here and
/// never propagate.
pub fn check_access(session: &mut Session, allowed: &[Role], keys: &TokenKeys) -> Access {
    let token = match session.token() {
        Some(token) => token.to_owned(),
        None => return Access::Denied(AuthError::MissingToken),
    };

    let claims = match keys.decode(&token) {
        Ok(claims) => claims,
        Err(_) => {
            session.clear();
            return Access::Denied(AuthError::MalformedToken);
        }
    };

    // Expired means exp at or before the current instant.
    if claims.exp as i64 <= Utc::now().timestamp() {
        session.clear();
        return Access::Denied(AuthError::ExpiredToken);
    }

    if !allowed.contains(&claims.role) {
        return Access::Denied(AuthError::WrongRole);
    }

    Access::Granted(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "guard-test-secret";

    fn keys() -> TokenKeys {
        TokenKeys::new(SECRET.to_string(), 24)
    }

    fn token_with(role: &str, exp: i64) -> String {
        let claims = serde_json::json!({
            "userId": "1",
            "userEmail": "admin@store.test",
            "role": role,
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn future() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn no_token_is_denied_and_store_stays_empty() {
        let mut session = Session::empty();
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::MissingToken)));
        assert!(session.is_empty());
        assert!(!session.was_cleared());
    }

    #[test]
    fn malformed_token_is_denied_and_cleared() {
        let mut session = Session::open("definitely-not-a-jwt", "admin");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::MalformedToken)));
        assert!(session.is_empty());
        assert!(session.was_cleared());
    }

    #[test]
    fn expired_token_is_denied_and_cleared_even_with_matching_role() {
        let token = token_with("admin", Utc::now().timestamp() - 1);
        let mut session = Session::open(token, "admin");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::ExpiredToken)));
        assert!(session.is_empty());
        assert!(session.was_cleared());
    }

    #[test]
    fn exp_equal_to_now_counts_as_expired() {
        let token = token_with("admin", Utc::now().timestamp());
        let mut session = Session::open(token, "admin");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::ExpiredToken)));
        assert!(session.was_cleared());
    }

    #[test]
    fn valid_token_with_allowed_role_is_admitted_store_untouched() {
        let token = token_with("admin", future());
        let mut session = Session::open(token, "admin");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        match access {
            Access::Granted(claims) => {
                assert_eq!(claims.role, Role::Admin);
                assert_eq!(claims.email, "admin@store.test");
            }
            other => panic!("expected Granted, got {:?}", other),
        }
        assert!(!session.is_empty());
        assert!(!session.was_cleared());
    }

    #[test]
    fn valid_token_with_wrong_role_is_denied_without_clearing() {
        let token = token_with("operator", future());
        let mut session = Session::open(token.clone(), "operator");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::WrongRole)));
        assert_eq!(session.token(), Some(token.as_str()));
        assert!(!session.was_cleared());
    }

    #[test]
    fn operator_is_admitted_where_operators_are_allowed() {
        let token = token_with("operator", future());
        let mut session = Session::open(token, "operator");
        let access = check_access(&mut session, &[Role::Admin, Role::Operator], &keys());

        assert!(matches!(access, Access::Granted(_)));
    }

    #[test]
    fn unknown_role_string_is_treated_as_malformed() {
        let token = token_with("superuser", future());
        let mut session = Session::open(token, "superuser");
        let access = check_access(&mut session, &[Role::Admin], &keys());

        assert!(matches!(access, Access::Denied(AuthError::MalformedToken)));
        assert!(session.was_cleared());
    }

    #[test]
    fn wrong_role_maps_to_forbidden_everything_else_unauthorized() {
        assert_eq!(AuthError::WrongRole.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::MalformedToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
    }
}
