use actix_web::{http::header, web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::Product;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = state.products.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let product = state
        .products
        .find_product_by_id(path.into_inner())
        .await?
        .ok_or(DatabaseError::NotFound)?;

    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    req: web::Json<AddProductRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AddProductRequest { name, description, price } = req.into_inner();
    let product = state
        .products
        .insert_product(&Product::new(name, description, price))
        .await?;
    info!("Added product {} ({})", product.name, product.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/products/{}", product.id)))
        .json(product))
}

pub async fn delete_product(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.products.delete_product(id).await? {
        return Err(DatabaseError::NotFound.into());
    }
    info!("Deleted product {}", id);

    Ok(HttpResponse::NoContent().finish())
}
