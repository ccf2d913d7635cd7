use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::password::{validate_email, validate_user_name, PasswordPolicy};
use crate::auth::token::TokenIssuer;
use crate::db::{normalize_key, User, UserStore};
use crate::error::{AppError, AuthError, DatabaseError};

/// A successful login: the stored username and a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    passwords: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer, passwords: PasswordPolicy) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Unknown user and wrong password share one message; an unconfirmed
    /// email gets its own, which reveals that the account exists.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .users
            .find_user_by_name(&normalize_key(user_name))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.email_confirmed {
            warn!("Login refused for unconfirmed user {}", user.id);
            return Err(AuthError::EmailNotConfirmed.into());
        }

        let matches = user
            .password_hash
            .as_deref()
            .map(|hash| self.passwords.verify(password, hash))
            .unwrap_or(false);
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue_token(&user)?;
        Ok(LoginOutcome { user, token })
    }

    /// Registered accounts are marked confirmed straight away; there is no
    /// email verification flow.
    pub async fn register(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self
            .users
            .find_user_by_email(&normalize_key(email))
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "An account with the same email exists".to_string(),
            ));
        }

        let user = User::new(user_name.to_string(), Some(email.to_string()), true);
        self.create_with_password(user, password).await
    }

    async fn create_with_password(&self, mut user: User, password: &str) -> Result<User, AppError> {
        let mut errors = Vec::new();

        errors.extend(validate_user_name(&user.user_name));
        if self
            .users
            .find_user_by_name(&user.normalized_user_name)
            .await?
            .is_some()
        {
            errors.push(format!("Username '{}' is already taken.", user.user_name));
        }
        if let Some(email) = user.email.as_deref() {
            errors.extend(validate_email(email));
        }
        errors.extend(self.passwords.validate(password));

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        user.password_hash = Some(self.passwords.hash(password)?);

        match self.users.insert_user(&user).await {
            Ok(created) => {
                info!("Created user {} ({})", created.user_name, created.id);
                Ok(created)
            }
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => Err(AppError::BadRequest(
                "An account with the same username or email exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JwtSettings, PasswordSettings};
    use crate::db::{MemoryStore, MockUserStore};

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(JwtSettings {
            key: "unit-test-secret".to_string(),
            issuer: "store-test".to_string(),
            expires_in_days: "1".to_string(),
        })
    }

    fn passwords() -> PasswordPolicy {
        PasswordPolicy::new(PasswordSettings {
            required_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
            required_unique_chars: 1,
            hash_cost: 4,
        })
    }

    fn service(store: Arc<dyn UserStore>) -> AuthService {
        AuthService::new(store, tokens(), passwords())
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service(Arc::new(MemoryStore::new()));

        let user = auth.register("ivy", "ivy@example.com", "Secr3t!").await.unwrap();
        assert!(user.email_confirmed);
        assert!(user.password_hash.is_some());

        let outcome = auth.login("IVY", "Secr3t!").await.unwrap();
        let claims = auth.tokens().verify_token(&outcome.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "ivy@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_alike() {
        let auth = service(Arc::new(MemoryStore::new()));
        auth.register("jack", "jack@example.com", "Secr3t!").await.unwrap();

        let wrong = auth.login("jack", "Wr0ng!!").await.unwrap_err();
        let unknown = auth.login("nobody", "Secr3t!").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::AuthError(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unconfirmed_user_cannot_login() {
        let store = Arc::new(MemoryStore::new());
        let mut user = User::new("kate".to_string(), Some("kate@example.com".to_string()), false);
        user.password_hash = Some(passwords().hash("Secr3t!").unwrap());
        store.insert_user(&user).await.unwrap();

        let result = service(store).login("kate", "Secr3t!").await;
        assert!(matches!(result, Err(AppError::AuthError(AuthError::EmailNotConfirmed))));
    }

    #[tokio::test]
    async fn test_user_without_password_cannot_login() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_user(&User::new("liam".to_string(), None, true))
            .await
            .unwrap();

        let result = service(store).login("liam", "").await;
        assert!(matches!(result, Err(AppError::AuthError(AuthError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_case_insensitively() {
        let auth = service(Arc::new(MemoryStore::new()));
        auth.register("mia", "mia@example.com", "Secr3t!").await.unwrap();

        let result = auth.register("mia2", "MIA@Example.com", "Secr3t!").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_duplicate_user_name_is_validation_error() {
        let auth = service(Arc::new(MemoryStore::new()));
        auth.register("noah", "noah@example.com", "Secr3t!").await.unwrap();

        match auth.register("Noah", "other@example.com", "Secr3t!").await {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors, vec!["Username 'Noah' is already taken.".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_weak_password_lists_policy_errors() {
        let auth = service(Arc::new(MemoryStore::new()));

        match auth.register("olga", "olga@example.com", "short").await {
            Err(AppError::Validation(errors)) => assert!(errors.len() >= 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockUserStore::new();
        store.expect_find_user_by_name().returning(|_| {
            Err(DatabaseError::ConnectionError("pool closed".to_string()).into())
        });

        let result = service(Arc::new(store)).login("pete", "Secr3t!").await;
        assert!(matches!(
            result,
            Err(AppError::DatabaseError(DatabaseError::ConnectionError(_)))
        ));
    }

    #[tokio::test]
    async fn test_insert_race_maps_to_bad_request() {
        let mut store = MockUserStore::new();
        store.expect_find_user_by_email().returning(|_| Ok(None));
        store.expect_find_user_by_name().returning(|_| Ok(None));
        store
            .expect_insert_user()
            .times(1)
            .returning(|_| Err(DatabaseError::Duplicate.into()));

        let result = service(Arc::new(store))
            .register("quinn", "quinn@example.com", "Secr3t!")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
