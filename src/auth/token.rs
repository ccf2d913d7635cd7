use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::JwtSettings;
use crate::db::User;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,         // User ID
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Builds and checks HS256 bearer tokens from the configured signing settings.
pub struct TokenIssuer {
    settings: JwtSettings,
}

impl TokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let key = self.signing_key()?;
        let days = self.expires_in_days()?;

        let email = user
            .email
            .clone()
            .ok_or_else(|| AppError::InternalError(format!("user {} has no email", user.id)))?;

        let now = Utc::now();
        let exp = Duration::try_days(days)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                AppError::ConfigError(format!("jwt.expires_in_days out of range: {}", days))
            })?
            .timestamp();

        let claims = Claims {
            sub: user.id.to_string(),
            email,
            given_name: user.user_name.clone(),
            family_name: user.user_name.clone(),
            iss: self.settings.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp,
        };

        debug!("Issuing token for user {} ({}), expires in {}d", user.user_name, user.id, days);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("failed to sign token: {}", e)))?;

        Ok(token)
    }

    /// Checks signature, issuer and expiry with no clock leeway.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let key = self.signing_key()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.settings.issuer.as_str()]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(key.as_bytes()),
            &validation,
        )?;

        Ok(data.claims)
    }

    fn signing_key(&self) -> Result<&str, AppError> {
        let key = self.settings.key.as_str();
        if key.is_empty() {
            return Err(AppError::ConfigError("jwt.key is not set".to_string()));
        }
        Ok(key)
    }

    fn expires_in_days(&self) -> Result<i64, AppError> {
        let raw = self.settings.expires_in_days.trim();
        raw.parse::<i64>().map_err(|_| {
            AppError::ConfigError(format!("jwt.expires_in_days is not an integer: {:?}", raw))
        })
    }
}
