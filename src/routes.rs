use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::admin_handlers;
use crate::booking_handlers;
use crate::error::ApiError;
use crate::user_handlers;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "success" }))
}

/// Simple health check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Browser access for the configured frontends; `*` opens it to any origin.
pub fn cors(origins: &[String]) -> Cors {
    let cors = if origins.iter().any(|origin| origin == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

/// Registers every route on an `App` that already carries `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::validation(err.to_string()).into());

    cfg.app_data(json)
        .service(index)
        .service(health)
        .service(
            web::scope("/api")
                .service(user_handlers::signup)
                .service(user_handlers::login)
                .service(user_handlers::check)
                .service(user_handlers::fetch_travel_locations)
                .service(booking_handlers::create_booking)
                .service(booking_handlers::list_bookings)
                .service(booking_handlers::cancel_booking)
                .service(admin_handlers::list_locations)
                .service(admin_handlers::create_location)
                .service(admin_handlers::upload_image)
                .service(admin_handlers::list_all_bookings)
                .service(admin_handlers::update_booking_status)
                .service(admin_handlers::delete_location),
        );
}
