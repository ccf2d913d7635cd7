use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::error::AppError;
use tracing::{info, warn, error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for user: {}", req.user_name);
    match state.auth_service.login(&req.user_name, &req.password).await {
        Ok(outcome) => {
            info!("Login successful for user: {}", req.user_name);
            Ok(HttpResponse::Ok().json(LoginResponse {
                username: outcome.user.user_name,
                token: outcome.token,
            }))
        }
        Err(e) if e.is_server_error() => {
            error!("Login failed for user: {}: {}", req.user_name, e);
            Err(e)
        }
        Err(e) => {
            warn!("Login rejected for user: {}: {}", req.user_name, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for user: {}", req.user_name);

    match state
        .auth_service
        .register(&req.user_name, &req.email, &req.password)
        .await
    {
        Ok(user) => {
            info!("Registration successful for user: {} ({})", user.user_name, user.id);
            Ok(HttpResponse::Ok().finish())
        }
        Err(e) if e.is_server_error() => {
            error!("Registration failed for user: {}: {}", req.user_name, e);
            Err(e)
        }
        Err(e) => {
            warn!("Registration rejected for user: {}: {}", req.user_name, e);
            Err(e)
        }
    }
}
