use std::sync::Arc;

use tracing::{debug, info, instrument};

use models::user::{self, Role};

use super::credentials::{hash_password, verify_password};
use super::domain::{AuthSession, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::token::TokenKeys;
use crate::errors::ServiceError;
use crate::repository::UserRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Registration, login and token verification, independent of the web framework.
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    tokens: TokenKeys,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, tokens: TokenKeys::new(&cfg.jwt_secret, cfg.token_ttl_hours) }
    }

    pub fn tokens(&self) -> &TokenKeys { &self.tokens }

    /// Register a new regular user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, domain::RegisterInput};
    /// use service::repository::mock::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24 });
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_eq!(user.role, "user");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, ServiceError> {
        let email = user::normalize_email(&input.email);
        user::validate_name(&input.name)?;
        user::validate_email(&email)?;
        user::validate_password(&input.password)?;
        if self.repo.email_taken(&email, None).await? {
            debug!("email already registered");
            return Err(ServiceError::Conflict("user with this email already exists".into()));
        }

        let hash = hash_password(&input.password)?;
        let created = self.repo.create(&input.name, &email, hash, Role::User).await?;
        info!(user_id = created.id, email = %created.email, "user_registered");
        Ok(created)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, domain::{RegisterInput, LoginInput}};
    /// use service::repository::mock::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "Nia".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(svc.validate_token(&session.token).unwrap().user_id, session.user.id);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let email = user::normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(ServiceError::Validation("email and password are required".into()));
        }
        let user = self.repo.find_by_email(&email).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &user.password_hash) {
            debug!(user_id = user.id, "password mismatch");
            return Err(AuthError::Unauthorized.into());
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Claims of a valid, unexpired token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        Ok(self.tokens.validate(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MemoryStore;
    use chrono::{Duration, Utc};

    fn svc() -> AuthService<MemoryStore> {
        AuthService::new(Arc::new(MemoryStore::default()), AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 24 })
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput { name: "Test User".into(), email: email.into(), password: "Passw0rd!".into() }
    }

    #[tokio::test]
    async fn register_stores_hash_not_password() {
        let svc = svc();
        let u = svc.register(register_input("a@example.com")).await.unwrap();
        assert_ne!(u.password_hash, "Passw0rd!");
        assert!(verify_password("Passw0rd!", &u.password_hash));
        assert_eq!(u.role(), Role::User);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = svc();
        svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let svc = svc();
        let first = svc.register(register_input("Ann@Example.com")).await.unwrap();
        assert_eq!(first.email, "ann@example.com");
        let err = svc.register(register_input("ann@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let session = svc.login(LoginInput { email: "ANN@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        assert_eq!(session.user.id, first.id);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let svc = svc();
        let short = RegisterInput { password: "short".into(), ..register_input("s@example.com") };
        assert!(matches!(svc.register(short).await, Err(ServiceError::Validation(_))));
        let bad_email = register_input("not-an-email");
        assert!(matches!(svc.register(bad_email).await, Err(ServiceError::Validation(_))));
        let no_name = RegisterInput { name: " ".into(), ..register_input("n@example.com") };
        assert!(matches!(svc.register(no_name).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = svc();
        svc.register(register_input("l@example.com")).await.unwrap();
        let wrong_pw = svc.login(LoginInput { email: "l@example.com".into(), password: "nope-nope".into() }).await.unwrap_err();
        let unknown = svc.login(LoginInput { email: "ghost@example.com".into(), password: "Passw0rd!".into() }).await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert!(matches!(wrong_pw, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let svc = svc();
        let u = svc.register(register_input("t@example.com")).await.unwrap();
        let session = svc.login(LoginInput { email: "t@example.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        let claims = svc.validate_token(&session.token).unwrap();
        assert_eq!(claims.user_id, u.id);
        assert_eq!(claims.email, "t@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let svc = svc();
        let u = svc.register(register_input("e@example.com")).await.unwrap();
        let stale = svc.tokens().issue_at(&u, Utc::now() - Duration::hours(48)).unwrap();
        assert!(matches!(svc.validate_token(&stale), Err(ServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let svc = svc();
        let err = svc.login(LoginInput { email: "".into(), password: "x".into() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
