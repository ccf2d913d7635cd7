use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lookup key for case-insensitive uniqueness of usernames and emails.
///
/// Upper-cases one character at a time; characters whose upper case is
/// more than one character (`ß` -> `SS`) are kept as they are.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    #[serde(skip)]
    pub normalized_user_name: String,
    pub email: Option<String>,
    #[serde(skip)]
    pub normalized_email: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: String, email: Option<String>, email_confirmed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            normalized_user_name: normalize_key(&user_name),
            user_name,
            normalized_email: email.as_deref().map(normalize_key),
            email,
            password_hash: None,
            email_confirmed,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, description: Option<String>, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            price,
            created_at: Utc::now(),
        }
    }
}
