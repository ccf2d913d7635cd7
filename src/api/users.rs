//! User resource endpoints.
//!
//! Plain pass-through to the store. None of these check a bearer token:
//! any caller may list or delete any user.

use actix_web::{http::header, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::User;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddUserRequest {
    pub name: String,
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .users
        .find_user_by_id(path.into_inner())
        .await?
        .ok_or(DatabaseError::NotFound)?;

    Ok(HttpResponse::Ok().json(user))
}

/// Adds a bare account: no email, no password, unconfirmed.
pub async fn create_user(
    req: web::Json<AddUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let payload = req.into_inner();
    let user = state
        .users
        .insert_user(&User::new(payload.name.clone(), None, false))
        .await?;
    info!("Added user {} ({})", user.user_name, user.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/users/{}", user.id)))
        .json(payload))
}

pub async fn delete_user(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.users.delete_user(id).await? {
        return Err(DatabaseError::NotFound.into());
    }
    info!("Deleted user {}", id);

    Ok(HttpResponse::NoContent().finish())
}
