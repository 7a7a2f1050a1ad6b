use common::{LoginRequest, SignupRequest};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::User;
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;
use crate::security::{JwtService, PasswordHasher};
use crate::validation::validate_password_strength;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Signup and login.
#[derive(Clone)]
pub struct UserUsecase {
    repo: Arc<dyn UserRepository>,
    passwords: PasswordHasher,
    tokens: Arc<JwtService>,
}

impl UserUsecase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        passwords: PasswordHasher,
        tokens: Arc<JwtService>,
    ) -> Self {
        Self {
            repo,
            passwords,
            tokens,
        }
    }

    /// Registers a new user. Duplicate email or username surfaces as
    /// [`AppError::Conflict`] from the store.
    #[instrument(skip(self, request), fields(email = %request.email, username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> AppResult<User> {
        validate_password_strength(&request.password)?;

        let password_hash = self.passwords.hash(request.password).await?;
        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            username: request.username,
            password_hash,
        };

        let created = self.repo.create(&user).await?;
        info!(user_id = %created.id, "User registered");
        Ok(created)
    }

    /// Returns a signed token. Unknown email and wrong password fail the same way.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> AppResult<String> {
        let Some(user) = self.repo.find_by_email(&request.email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        if !self
            .passwords
            .verify(request.password, user.password_hash.clone())
            .await
        {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.generate_jwt(user.id, &user.email)?;
        debug!(user_id = %user.id, "Token issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::InMemoryUserRepository;
    use chrono::Duration;

    fn usecase() -> (UserUsecase, Arc<JwtService>) {
        let tokens = Arc::new(JwtService::new("usecase-test-secret", Duration::hours(1)));
        let usecase = UserUsecase::new(
            Arc::new(InMemoryUserRepository::default()),
            PasswordHasher::new(4),
            tokens.clone(),
        );
        (usecase, tokens)
    }

    fn signup_request(email: &str, username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
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
    async fn test_signup_then_login_returns_token_for_user() {
        let (usecase, tokens) = usecase();

        let user = usecase
            .signup(signup_request("neo@example.com", "neo", "Sup3r$ecret"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "Sup3r$ecret");

        let token = usecase
            .login(login_request("neo@example.com", "Sup3r$ecret"))
            .await
            .unwrap();
        let claims = tokens.parse_jwt(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, "neo@example.com");
    }

    #[tokio::test]
    async fn test_signup_rejects_weak_passwords() {
        let (usecase, _) = usecase();

        for password in ["short!A", "alllowercase1!", "ALLUPPERCASE1!", "NoSpecial123"] {
            let result = usecase
                .signup(signup_request("neo@example.com", "neo", password))
                .await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "{password} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_signup_duplicate_is_conflict() {
        let (usecase, _) = usecase();
        usecase
            .signup(signup_request("neo@example.com", "neo", "Sup3r$ecret"))
            .await
            .unwrap();

        let same_email = usecase
            .signup(signup_request("neo@example.com", "thomas", "Sup3r$ecret"))
            .await;
        let same_username = usecase
            .signup(signup_request("thomas@example.com", "neo", "Sup3r$ecret"))
            .await;

        assert!(matches!(same_email, Err(AppError::Conflict(_))));
        assert!(matches!(same_username, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (usecase, _) = usecase();
        usecase
            .signup(signup_request("neo@example.com", "neo", "Sup3r$ecret"))
            .await
            .unwrap();

        let wrong_password = usecase
            .login(login_request("neo@example.com", "Wr0ng$ecret"))
            .await
            .unwrap_err();
        let unknown_email = usecase
            .login(login_request("smith@example.com", "Sup3r$ecret"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Auth(ref m) if m == INVALID_CREDENTIALS));
    }
}
