//! Persistence for the Store server
//!
//! Domain records, the store traits the handlers depend on, and the
//! Postgres and in-memory implementations behind them.

pub mod memory;
pub mod models;
pub mod operations;

pub use memory::MemoryStore;
pub use models::{normalize_key, Product, User};
pub use operations::PgStore;

use crate::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Identity records. Lookups by name and email take normalized keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_name(&self, normalized_user_name: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, normalized_email: &str) -> Result<Option<User>>;
    /// Fails with `DatabaseError::Duplicate` when the name or email is taken.
    async fn insert_user(&self, user: &User) -> Result<User>;
    /// Returns false when no such user existed.
    async fn delete_user(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn find_product_by_id(&self, id: Uuid) -> Result<Option<Product>>;
    async fn insert_product(&self, product: &Product) -> Result<Product>;
    async fn delete_product(&self, id: Uuid) -> Result<bool>;
}
