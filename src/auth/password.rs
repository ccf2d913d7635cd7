use std::collections::HashSet;
use tracing::warn;

use crate::config::PasswordSettings;
use crate::error::AppError;

const ALLOWED_USER_NAME_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@+";

/// Password policy checks plus bcrypt hashing and verification.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    settings: PasswordSettings,
}

impl PasswordPolicy {
    pub fn new(settings: PasswordSettings) -> Self {
        Self { settings }
    }

    /// Every rule the password breaks, in a stable order. Empty means acceptable.
    pub fn validate(&self, password: &str) -> Vec<String> {
        let s = &self.settings;
        let mut errors = Vec::new();

        if password.chars().count() < s.required_length {
            errors.push(format!(
                "Passwords must be at least {} characters.",
                s.required_length
            ));
        }
        if s.require_non_alphanumeric && password.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push("Passwords must have at least one non alphanumeric character.".to_string());
        }
        if s.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }
        if s.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }
        if s.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
        }
        if s.required_unique_chars > 1 {
            let distinct = password.chars().collect::<HashSet<_>>().len();
            if distinct < s.required_unique_chars {
                errors.push(format!(
                    "Passwords must use at least {} different characters.",
                    s.required_unique_chars
                ));
            }
        }

        errors
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.settings.hash_cost)?)
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        match bcrypt::verify(password, password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Stored password hash could not be verified: {}", e);
                false
            }
        }
    }
}

pub fn validate_user_name(user_name: &str) -> Option<String> {
    if user_name.is_empty() || !user_name.chars().all(|c| ALLOWED_USER_NAME_CHARS.contains(c)) {
        return Some(format!(
            "Username '{}' is invalid, can only contain letters or digits.",
            user_name
        ));
    }
    None
}

pub fn validate_email(email: &str) -> Option<String> {
    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    };
    if plausible {
        None
    } else {
        Some(format!("Email '{}' is invalid.", email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
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

    #[test]
    fn test_strong_password_accepted() {
        assert!(policy().validate("Passw0rd!").is_empty());
    }

    #[test]
    fn test_weak_password_reports_every_rule() {
        let errors = policy().validate("abc");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("at least 6 characters"));
        assert!(errors.iter().any(|e| e.contains("non alphanumeric")));
        assert!(errors.iter().any(|e| e.contains("digit")));
        assert!(errors.iter().any(|e| e.contains("uppercase")));
    }

    #[test]
    fn test_unique_chars_rule() {
        let mut settings = policy().settings;
        settings.required_unique_chars = 4;
        let errors = PasswordPolicy::new(settings).validate("Aa1!Aa1!");
        assert_eq!(errors.len(), 0);

        let mut settings = policy().settings;
        settings.required_unique_chars = 5;
        let errors = PasswordPolicy::new(settings).validate("Aa1!Aa1!");
        assert_eq!(errors, vec!["Passwords must use at least 5 different characters.".to_string()]);
    }

    #[test]
    fn test_hash_and_verify() {
        let policy = policy();
        let hash = policy.hash("Passw0rd!").unwrap();
        assert_ne!(hash, "Passw0rd!");
        assert!(policy.verify("Passw0rd!", &hash));
        assert!(!policy.verify("passw0rd!", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!policy().verify("Passw0rd!", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_user_name_rules() {
        assert!(validate_user_name("jane.doe+shop@x").is_none());
        assert!(validate_user_name("").is_some());
        assert!(validate_user_name("jane doe").is_some());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("jane@example.com").is_none());
        assert!(validate_email("jane").is_some());
        assert!(validate_email("@example.com").is_some());
        assert!(validate_email("a@b@c").is_some());
    }
}
