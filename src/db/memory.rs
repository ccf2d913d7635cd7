use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Product, User};
use crate::db::{ProductStore, UserStore};
use crate::error::DatabaseError;
use crate::Result;

/// In-process store with the same uniqueness rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(sorted(users.values().cloned().collect(), |u: &User| (u.created_at, u.id)))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_name(&self, normalized_user_name: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.normalized_user_name == normalized_user_name)
            .cloned())
    }

    async fn find_user_by_email(&self, normalized_email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.normalized_email.as_deref() == Some(normalized_email))
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;

        let clash = users.values().any(|existing| {
            existing.id == user.id
                || existing.normalized_user_name == user.normalized_user_name
                || (user.normalized_email.is_some()
                    && existing.normalized_email == user.normalized_email)
        });
        if clash {
            return Err(DatabaseError::Duplicate.into());
        }

        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        Ok(sorted(products.values().cloned().collect(), |p: &Product| (p.created_at, p.id)))
    }

    async fn find_product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn insert_product(&self, product: &Product) -> Result<Product> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(DatabaseError::Duplicate.into());
        }
        products.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}
