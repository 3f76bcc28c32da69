use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use models::user;

use super::domain::Claims;
use super::errors::AuthError;

/// HS256 signer/verifier for session tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    pub fn issue(&self, user: &user::Model) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Sign a token as if issued at `now`.
    pub fn issue_at(&self, user: &user::Model, now: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = Duration::try_hours(self.ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::TokenError(format!("token lifetime of {} hours is out of range", self.ttl_hours)))?;
        let claims = Claims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Verify signature, algorithm and expiry (no leeway) and return the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;

    fn sample_user(role: Role) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id: 7,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "x".into(),
            role: role.as_str().into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let keys = TokenKeys::new("secret", 24);
        let token = keys.issue(&sample_user(Role::Admin)).unwrap();
        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("secret", 24);
        let issued = Utc::now() - Duration::hours(25);
        let token = keys.issue_at(&sample_user(Role::User), issued).unwrap();
        assert!(matches!(keys.validate(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenKeys::new("one", 1).issue(&sample_user(Role::User)).unwrap();
        assert!(matches!(TokenKeys::new("two", 1).validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let keys = TokenKeys::new("secret", 1);
        let now = Utc::now();
        let claims = Claims { user_id: 1, email: "a@b.co".into(), role: Role::User, iat: now.timestamp(), exp: (now + Duration::hours(1)).timestamp() };
        let token = encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert!(matches!(keys.validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        let keys = TokenKeys::new("secret", 10_000_000_000);
        assert!(matches!(keys.issue(&sample_user(Role::User)), Err(AuthError::TokenError(_))));
        let keys = TokenKeys::new("secret", i64::MAX);
        assert!(matches!(keys.issue(&sample_user(Role::User)), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = TokenKeys::new("secret", 1);
        assert!(matches!(keys.validate("not.a.token"), Err(AuthError::InvalidToken(_))));
        assert!(matches!(keys.validate(""), Err(AuthError::InvalidToken(_))));
    }
}
