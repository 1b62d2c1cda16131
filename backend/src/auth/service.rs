//! Core business logic for the authentication system.

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::database::models::{PublicUser, User};
use crate::errors::{ServiceError, ServiceResult, validation_message};
use crate::repositories::{InsertUserOutcome, UserStore};
use crate::utils::jwt::{Claims, JwtUtils};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Authentication service for registration, login and current-user lookup.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtUtils>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtUtils>) -> Self {
        AuthService { users, jwt }
    }

    /// Registers a new user and returns the public view.
    ///
    /// Emails are normalized to lowercase here and at login, so lookup
    /// behavior is case-insensitive by construction.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<PublicUser> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let email = request.email.trim().to_lowercase();

        let password_hash = Self::hash_password(&request.password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: request.name,
            email: email.clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        match self.users.insert(user).await? {
            InsertUserOutcome::Inserted(user) => Ok(PublicUser::from(&user)),
            InsertUserOutcome::DuplicateEmail => {
                Err(ServiceError::already_exists("User", email))
            }
        }
    }

    /// Authenticates a user and issues a bearer token.
    ///
    /// Unknown email and wrong password both surface as the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let email = request.email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let matches = verify(&request.password, &user.password_hash)
            .map_err(|e| ServiceError::Internal {
                source: anyhow::anyhow!("password verification failed: {e}"),
            })?;
        if !matches {
            return Err(ServiceError::InvalidCredentials);
        }

        let access_token = self.jwt.generate_token(user.id, &user.email)?;

        Ok(LoginResponse {
            access_token,
            expires_in: self.jwt.expires_in_seconds(),
            user: PublicUser::from(&user),
        })
    }

    /// Resolves the user behind already-verified claims.
    pub async fn current_user(&self, claims: &Claims) -> ServiceResult<PublicUser> {
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", claims.sub.to_string()))?;

        Ok(PublicUser::from(&user))
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST).map_err(|e| ServiceError::Internal {
            source: anyhow::anyhow!("password hashing failed: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryStore;

    fn service() -> AuthService {
        let store = Arc::new(MemoryStore::new());
        let jwt = Arc::new(JwtUtils::new("test-secret", 7200));
        AuthService::new(store, jwt)
    }

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_never_returns_the_hash_and_login_roundtrips() {
        let auth = service();

        let user = auth
            .register(register_request("Demo User", "demo@user.com", "password123"))
            .await
            .unwrap();
        assert_eq!(user.email, "demo@user.com");

        let response = auth
            .login(login_request("demo@user.com", "password123"))
            .await
            .unwrap();
        assert_eq!(response.user, user);
        assert_eq!(response.expires_in, 7200);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_regardless_of_other_fields() {
        let auth = service();

        auth.register(register_request("Demo User", "demo@user.com", "password123"))
            .await
            .unwrap();

        let err = auth
            .register(register_request("Other Name", "demo@user.com", "different-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let auth = service();

        auth.register(register_request("Demo User", "demo@user.com", "password123"))
            .await
            .unwrap();

        let wrong_password = auth
            .login(login_request("demo@user.com", "password124"))
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(login_request("nobody@user.com", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let auth = service();

        auth.register(register_request("Demo User", "Demo@User.com", "password123"))
            .await
            .unwrap();

        let response = auth
            .login(login_request("demo@user.com", "password123"))
            .await
            .unwrap();
        assert_eq!(response.user.email, "demo@user.com");
    }

    #[tokio::test]
    async fn issued_token_resolves_to_the_user_that_logged_in() {
        let auth = service();

        auth.register(register_request("Demo User", "demo@user.com", "password123"))
            .await
            .unwrap();
        let response = auth
            .login(login_request("demo@user.com", "password123"))
            .await
            .unwrap();

        let claims = auth.jwt.validate_token(&response.access_token).unwrap();
        let resolved = auth.current_user(&claims).await.unwrap();
        assert_eq!(resolved, response.user);
    }

    #[tokio::test]
    async fn short_password_fails_validation() {
        let auth = service();

        let err = auth
            .register(register_request("Demo User", "demo@user.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }
}
