//! HTTP routing for the REST API.

pub mod products;
pub mod users;

use actix_web::web;

use crate::auth::handlers::{login, register};

/// Mounts every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("/login", web::post().to(login))
            .route("/register", web::post().to(register))
            .route("", web::get().to(users::list_users))
            .route("", web::post().to(users::create_user))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::delete().to(users::delete_user)),
    )
    .service(
        web::scope("/api/products")
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    );
}
